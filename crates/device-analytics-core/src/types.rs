use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;
use crate::AnalyticsResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.25 = 25%). Never as percentages.
pub type Rate = Decimal;

/// Percentages expressed on a 0-100 scale.
pub type Percent = Decimal;

// ---------------------------------------------------------------------------
// Device inputs
// ---------------------------------------------------------------------------

/// Device category. Any value not in this list deserializes as `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceCategory {
    Laptop,
    Smartphone,
    Tablet,
    Smartwatch,
    Headphones,
    Camera,
    GamingConsole,
    Tv,
    #[default]
    #[serde(other)]
    Other,
}

impl DeviceCategory {
    pub const ALL: [DeviceCategory; 9] = [
        DeviceCategory::Laptop,
        DeviceCategory::Smartphone,
        DeviceCategory::Tablet,
        DeviceCategory::Smartwatch,
        DeviceCategory::Headphones,
        DeviceCategory::Camera,
        DeviceCategory::GamingConsole,
        DeviceCategory::Tv,
        DeviceCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::Laptop => "laptop",
            DeviceCategory::Smartphone => "smartphone",
            DeviceCategory::Tablet => "tablet",
            DeviceCategory::Smartwatch => "smartwatch",
            DeviceCategory::Headphones => "headphones",
            DeviceCategory::Camera => "camera",
            DeviceCategory::GamingConsole => "gaming-console",
            DeviceCategory::Tv => "tv",
            DeviceCategory::Other => "other",
        }
    }

    /// Exact kebab-case lookup; `None` for anything unrecognised.
    pub fn from_name(name: &str) -> Option<Self> {
        DeviceCategory::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCategory {
    type Err = std::convert::Infallible;

    /// Lenient parse: unknown names fall back to `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        Ok(DeviceCategory::from_name(&needle).unwrap_or(DeviceCategory::Other))
    }
}

/// A tracked device as supplied by the device registry. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: DeviceCategory,
    /// Missing prices are treated as zero (gifts, free units)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Money>,
    pub purchase_date: NaiveDate,
    pub warranty_expires: NaiveDate,
}

impl DeviceRecord {
    pub fn price(&self) -> Money {
        self.purchase_price.unwrap_or(Decimal::ZERO)
    }
}

/// Warranty coverage state relative to the evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarrantyStatus {
    Active,
    ExpiringSoon,
    Expired,
}

impl WarrantyStatus {
    /// Coverage is still live (active or expiring soon).
    pub fn is_covered(&self) -> bool {
        !matches!(self, WarrantyStatus::Expired)
    }
}

impl fmt::Display for WarrantyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarrantyStatus::Active => write!(f, "active"),
            WarrantyStatus::ExpiringSoon => write!(f, "expiring-soon"),
            WarrantyStatus::Expired => write!(f, "expired"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round to the nearest whole currency unit, halves away from zero.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to one decimal place, halves away from zero.
pub fn round_one_dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / total * 100`, zero when `total` is zero.
pub fn percentage_of(part: Decimal, total: Decimal) -> Percent {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        part / total * Decimal::ONE_HUNDRED
    }
}

// ---------------------------------------------------------------------------
// Checked money arithmetic
// ---------------------------------------------------------------------------

fn overflow(field: &str) -> AnalyticsError {
    AnalyticsError::invalid(field, "exceeds the representable monetary range")
}

/// `a + b`, or an input error naming `field` on overflow.
pub(crate) fn money_add(field: &str, a: Money, b: Money) -> AnalyticsResult<Money> {
    a.checked_add(b).ok_or_else(|| overflow(field))
}

/// `a * b`, or an input error naming `field` on overflow.
pub(crate) fn money_mul(field: &str, a: Money, b: Decimal) -> AnalyticsResult<Money> {
    a.checked_mul(b).ok_or_else(|| overflow(field))
}

/// Sum of `values`, or an input error naming `field` on overflow.
pub(crate) fn money_total(
    field: &str,
    values: impl IntoIterator<Item = Money>,
) -> AnalyticsResult<Money> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| money_add(field, acc, v))
}

// ---------------------------------------------------------------------------
// Output envelope
// ---------------------------------------------------------------------------

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    as_of: Option<NaiveDate>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
            as_of,
        },
    }
}
