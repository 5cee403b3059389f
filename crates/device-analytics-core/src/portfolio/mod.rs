pub mod categories;
pub mod engine;
pub mod timeline;
pub mod trend;

pub use categories::{aggregate_categories, CategoryBreakdown};
pub use engine::{
    analyze_portfolio, analyze_portfolio_with, calculate_portfolio_analytics, PortfolioAnalytics,
    PortfolioInput,
};
pub use timeline::{project_warranty_timeline, WarrantyTimelineItem};
pub use trend::{simulate_depreciation_trend, DepreciationTrendItem};
