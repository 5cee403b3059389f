//! Portfolio orchestration: per-device analytics, totals, and the three
//! structured breakdowns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use super::categories::{aggregate_categories, CategoryBreakdown};
use super::timeline::{project_warranty_timeline, WarrantyTimelineItem};
use super::trend::{simulate_depreciation_trend, DepreciationTrendItem};
use crate::assumptions::AnalyticsAssumptions;
use crate::device::{compute_device_analytics_with, DeviceAnalytics};
use crate::types::*;
use crate::AnalyticsResult;

/// Portfolio-level analytics for one user's devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioAnalytics {
    pub total_devices: usize,
    pub total_purchase_value: Money,
    pub total_current_value: Money,
    pub total_depreciation: Money,
    pub total_depreciation_percentage: Percent,
    pub total_warranty_value: Money,
    pub total_protection_value: Money,
    pub active_warranties: usize,
    pub expiring_warranties: usize,
    pub expired_warranties: usize,
    /// Mean whole-month age, one decimal
    pub average_device_age: Decimal,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub warranty_timeline: Vec<WarrantyTimelineItem>,
    /// Always 24 entries, oldest first
    pub depreciation_trend: Vec<DepreciationTrendItem>,
}

/// Analyze a portfolio with the standard assumptions.
pub fn analyze_portfolio(
    devices: &[DeviceRecord],
    today: NaiveDate,
) -> AnalyticsResult<PortfolioAnalytics> {
    analyze_portfolio_with(devices, today, &AnalyticsAssumptions::default())
}

/// Analyze a portfolio. A single invalid device aborts the whole run.
pub fn analyze_portfolio_with(
    devices: &[DeviceRecord],
    today: NaiveDate,
    assumptions: &AnalyticsAssumptions,
) -> AnalyticsResult<PortfolioAnalytics> {
    assumptions.validate()?;
    tracing::debug!(devices = devices.len(), %today, "analyzing device portfolio");

    let analytics = devices
        .iter()
        .map(|d| compute_device_analytics_with(d, today, assumptions))
        .collect::<AnalyticsResult<Vec<DeviceAnalytics>>>()?;

    let total_purchase_value =
        money_total("total_purchase_value", analytics.iter().map(|a| a.purchase_price))?;
    let total_current_value =
        money_total("total_current_value", analytics.iter().map(|a| a.current_value))?;
    let total_depreciation =
        money_total("total_depreciation", analytics.iter().map(|a| a.depreciation_amount))?;
    let total_warranty_value =
        money_total("total_warranty_value", analytics.iter().map(|a| a.warranty_value))?;
    let total_protection_value =
        money_total("total_protection_value", analytics.iter().map(|a| a.protection_value))?;

    let count_status = |status: WarrantyStatus| {
        analytics
            .iter()
            .filter(|a| a.warranty_status == status)
            .count()
    };

    let average_device_age = if analytics.is_empty() {
        Decimal::ZERO
    } else {
        let months: i64 = analytics.iter().map(|a| i64::from(a.age_months)).sum();
        round_one_dp(Decimal::from(months) / Decimal::from(analytics.len() as i64))
    };

    let result = PortfolioAnalytics {
        total_devices: analytics.len(),
        total_purchase_value,
        total_current_value,
        total_depreciation,
        total_depreciation_percentage: round_one_dp(percentage_of(
            total_depreciation,
            total_purchase_value,
        )),
        total_warranty_value,
        total_protection_value,
        active_warranties: count_status(WarrantyStatus::Active),
        expiring_warranties: count_status(WarrantyStatus::ExpiringSoon),
        expired_warranties: count_status(WarrantyStatus::Expired),
        average_device_age,
        category_breakdown: aggregate_categories(&analytics)?,
        warranty_timeline: project_warranty_timeline(
            devices,
            &analytics,
            today,
            assumptions.timeline_months,
        )?,
        depreciation_trend: simulate_depreciation_trend(devices, today, assumptions)?,
    };

    tracing::debug!(
        total_current_value = %result.total_current_value,
        categories = result.category_breakdown.len(),
        timeline_months = result.warranty_timeline.len(),
        "portfolio analysis complete"
    );
    Ok(result)
}

// ---------------------------------------------------------------------------
// Standalone calculation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
    /// Evaluation date
    pub as_of: NaiveDate,
    #[serde(default)]
    pub assumptions: AnalyticsAssumptions,
}

/// Full portfolio analytics wrapped in the computation envelope, with
/// data-quality warnings for valid but suspicious records.
pub fn calculate_portfolio_analytics(
    input: &PortfolioInput,
) -> AnalyticsResult<ComputationOutput<PortfolioAnalytics>> {
    let start = Instant::now();
    let warnings = data_quality_warnings(&input.devices, input.as_of);
    for w in &warnings {
        tracing::warn!("{}", w);
    }

    let result = analyze_portfolio_with(&input.devices, input.as_of, &input.assumptions)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Device portfolio analytics (exponential depreciation, warranty protection value, 12-month expiry timeline, 24-month trend)",
        &input.assumptions,
        warnings,
        Some(input.as_of),
        elapsed,
        result,
    ))
}

fn data_quality_warnings(devices: &[DeviceRecord], as_of: NaiveDate) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for d in devices {
        if !seen.insert(d.id.as_str()) {
            warnings.push(format!("Duplicate device id '{}'", d.id));
        }
        if d.purchase_date > as_of {
            warnings.push(format!(
                "Device '{}' has a purchase date after {}; age treated as zero",
                d.name, as_of
            ));
        }
        if d.warranty_expires < d.purchase_date {
            warnings.push(format!(
                "Device '{}' warranty expires before it was purchased",
                d.name
            ));
        }
        if d.price().is_zero() {
            warnings.push(format!(
                "Device '{}' has no purchase price; valued at zero",
                d.name
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn device(id: &str, category: DeviceCategory, price: Decimal, bought: NaiveDate) -> DeviceRecord {
        DeviceRecord {
            id: id.into(),
            name: format!("Device {}", id),
            category,
            purchase_price: Some(price),
            purchase_date: bought,
            warranty_expires: date(2026, 1, 1),
        }
    }

    #[test]
    fn test_empty_portfolio() {
        let out = analyze_portfolio(&[], date(2025, 5, 5)).unwrap();
        assert_eq!(out.total_devices, 0);
        assert_eq!(out.total_purchase_value, Decimal::ZERO);
        assert_eq!(out.total_depreciation_percentage, Decimal::ZERO);
        assert_eq!(out.average_device_age, Decimal::ZERO);
        assert!(out.category_breakdown.is_empty());
        assert!(out.warranty_timeline.is_empty());
        assert_eq!(out.depreciation_trend.len(), 24);
    }

    #[test]
    fn test_totals_and_status_counts() {
        let today = date(2025, 1, 1);
        let mut expired = device("c", DeviceCategory::Camera, dec!(400), date(2022, 1, 1));
        expired.warranty_expires = date(2024, 1, 1);
        let mut soon = device("b", DeviceCategory::Tablet, dec!(600), date(2024, 1, 1));
        soon.warranty_expires = date(2025, 1, 20);
        let devices = vec![
            device("a", DeviceCategory::Laptop, dec!(2000), date(2024, 1, 1)),
            soon,
            expired,
        ];

        let out = analyze_portfolio(&devices, today).unwrap();
        assert_eq!(out.total_devices, 3);
        assert_eq!(out.total_purchase_value, dec!(3000));
        assert_eq!(out.active_warranties, 1);
        assert_eq!(out.expiring_warranties, 1);
        assert_eq!(out.expired_warranties, 1);
        assert_eq!(
            out.total_current_value + out.total_depreciation,
            out.total_purchase_value
        );
        // ages 12, 12, 36
        assert_eq!(out.average_device_age, dec!(20.0));
    }

    #[test]
    fn test_invalid_device_aborts_analysis() {
        let devices = vec![
            device("a", DeviceCategory::Laptop, dec!(2000), date(2024, 1, 1)),
            device("b", DeviceCategory::Laptop, dec!(-10), date(2024, 1, 1)),
        ];
        assert!(analyze_portfolio(&devices, date(2025, 1, 1)).is_err());
    }

    #[test]
    fn test_invalid_assumptions_rejected() {
        let assumptions = AnalyticsAssumptions {
            timeline_months: 0,
            ..Default::default()
        };
        assert!(analyze_portfolio_with(&[], date(2025, 1, 1), &assumptions).is_err());
    }

    #[test]
    fn test_repeatable_for_same_inputs() {
        let devices = vec![
            device("a", DeviceCategory::Smartwatch, dec!(399), date(2023, 9, 14)),
            device("b", DeviceCategory::Headphones, dec!(249), date(2024, 11, 2)),
        ];
        let first = analyze_portfolio(&devices, date(2025, 2, 2)).unwrap();
        let second = analyze_portfolio(&devices, date(2025, 2, 2)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_calculate_portfolio_analytics_warnings() {
        let mut free = device("a", DeviceCategory::Other, Decimal::ZERO, date(2024, 1, 1));
        free.purchase_price = None;
        let input = PortfolioInput {
            devices: vec![
                free,
                device("a", DeviceCategory::Tv, dec!(800), date(2025, 6, 1)),
            ],
            as_of: date(2025, 1, 1),
            assumptions: AnalyticsAssumptions::default(),
        };
        let out = calculate_portfolio_analytics(&input).unwrap();
        assert_eq!(out.warnings.len(), 3);
        assert_eq!(out.metadata.as_of, Some(date(2025, 1, 1)));
        assert_eq!(out.result.total_devices, 2);
    }
}
