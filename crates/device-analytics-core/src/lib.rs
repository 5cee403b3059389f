pub mod assumptions;
pub mod calendar;
pub mod depreciation;
pub mod device;
pub mod error;
pub mod types;
pub mod warranty;

#[cfg(feature = "portfolio")]
pub mod portfolio;

pub use assumptions::AnalyticsAssumptions;
pub use device::{compute_device_analytics, DeviceAnalytics};
pub use error::AnalyticsError;
pub use types::*;

#[cfg(feature = "portfolio")]
pub use portfolio::{analyze_portfolio, PortfolioAnalytics};

/// Standard result type for all device-analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
