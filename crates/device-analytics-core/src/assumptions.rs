//! Tunable valuation assumptions.
//!
//! Every field has a default, so an empty JSON object (or a missing
//! `assumptions` key) reproduces the standard rate table and warranty
//! heuristics.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::AnalyticsError;
use crate::types::{DeviceCategory, Rate};
use crate::AnalyticsResult;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_WARRANTY_ACCRUAL_RATE: Decimal = dec!(0.01);
pub const DEFAULT_REPAIR_COST_RATE: Decimal = dec!(0.20);
pub const DEFAULT_EXPIRING_SOON_DAYS: i64 = 30;
pub const DEFAULT_DAYS_PER_MONTH: Decimal = dec!(30);
pub const DEFAULT_TIMELINE_MONTHS: usize = 12;

/// Length of the backward-looking depreciation trend. Fixed contract.
pub const TREND_MONTHS: u32 = 24;

/// Standard annual depreciation rate for a category.
pub fn default_annual_rate(category: DeviceCategory) -> Rate {
    match category {
        DeviceCategory::Laptop => dec!(0.25),
        DeviceCategory::Smartphone => dec!(0.35),
        DeviceCategory::Tablet => dec!(0.30),
        DeviceCategory::Smartwatch => dec!(0.30),
        DeviceCategory::Headphones => dec!(0.20),
        DeviceCategory::Camera => dec!(0.20),
        DeviceCategory::GamingConsole => dec!(0.15),
        DeviceCategory::Tv => dec!(0.15),
        DeviceCategory::Other => dec!(0.20),
    }
}

// ---------------------------------------------------------------------------
// Assumptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsAssumptions {
    /// Per-category overrides of the annual depreciation rate
    #[serde(
        skip_serializing_if = "HashMap::is_empty",
        deserialize_with = "strict_category_rates"
    )]
    pub depreciation_rates: HashMap<DeviceCategory, Rate>,
    /// Share of purchase price accrued per remaining warranty month
    pub warranty_accrual_rate: Rate,
    /// Share of purchase price assumed for a typical repair
    pub repair_cost_rate: Rate,
    /// Days-until-expiry at or below which a warranty is expiring soon
    pub expiring_soon_days: i64,
    /// Day count that makes up one warranty month
    pub days_per_month: Decimal,
    /// Maximum number of month buckets in the warranty timeline
    pub timeline_months: usize,
}

/// Override keys must name a category exactly. The lenient `other`
/// fallback used for device records does not apply here.
fn strict_category_rates<'de, D>(
    deserializer: D,
) -> Result<HashMap<DeviceCategory, Rate>, D::Error>
where
    D: Deserializer<'de>,
{
    HashMap::<String, Rate>::deserialize(deserializer)?
        .into_iter()
        .map(|(name, rate)| {
            DeviceCategory::from_name(&name)
                .map(|category| (category, rate))
                .ok_or_else(|| {
                    de::Error::custom(format!(
                        "unknown device category `{}` in depreciation_rates",
                        name
                    ))
                })
        })
        .collect()
}

impl Default for AnalyticsAssumptions {
    fn default() -> Self {
        Self {
            depreciation_rates: HashMap::new(),
            warranty_accrual_rate: DEFAULT_WARRANTY_ACCRUAL_RATE,
            repair_cost_rate: DEFAULT_REPAIR_COST_RATE,
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
            days_per_month: DEFAULT_DAYS_PER_MONTH,
            timeline_months: DEFAULT_TIMELINE_MONTHS,
        }
    }
}

impl AnalyticsAssumptions {
    /// Annual depreciation rate for `category`, honouring overrides.
    pub fn annual_rate(&self, category: DeviceCategory) -> Rate {
        self.depreciation_rates
            .get(&category)
            .copied()
            .unwrap_or_else(|| default_annual_rate(category))
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        for (category, rate) in &self.depreciation_rates {
            if *rate < Decimal::ZERO || *rate >= Decimal::ONE {
                return Err(AnalyticsError::invalid(
                    format!("depreciation_rates.{}", category),
                    "annual rate must be in [0, 1)",
                ));
            }
        }
        if self.warranty_accrual_rate < Decimal::ZERO {
            return Err(AnalyticsError::invalid(
                "warranty_accrual_rate",
                "must be non-negative",
            ));
        }
        if self.repair_cost_rate < Decimal::ZERO {
            return Err(AnalyticsError::invalid(
                "repair_cost_rate",
                "must be non-negative",
            ));
        }
        if self.expiring_soon_days < 0 {
            return Err(AnalyticsError::invalid(
                "expiring_soon_days",
                "must be non-negative",
            ));
        }
        if self.days_per_month <= Decimal::ZERO {
            return Err(AnalyticsError::invalid(
                "days_per_month",
                "must be positive",
            ));
        }
        if self.timeline_months == 0 {
            return Err(AnalyticsError::invalid(
                "timeline_months",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
