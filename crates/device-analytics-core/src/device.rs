//! Per-device analytics: depreciation and warranty valuation combined.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::AnalyticsAssumptions;
use crate::calendar::months_between;
use crate::depreciation::decayed_value;
use crate::error::AnalyticsError;
use crate::types::*;
use crate::warranty::evaluate_warranty;
use crate::AnalyticsResult;

/// Derived analytics for one device at an evaluation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAnalytics {
    pub device_id: String,
    pub device_name: String,
    pub category: DeviceCategory,
    pub purchase_price: Money,
    /// Whole calendar months owned, zero for future purchase dates
    pub age_months: i32,
    pub current_value: Money,
    pub depreciation_amount: Money,
    pub depreciation_percentage: Percent,
    pub warranty_value: Money,
    pub warranty_status: WarrantyStatus,
    pub days_until_expiry: i64,
    pub estimated_repair_cost: Money,
    pub protection_value: Money,
}

/// Reject data that cannot describe a real purchase.
pub(crate) fn validate_device(device: &DeviceRecord) -> AnalyticsResult<()> {
    if let Some(price) = device.purchase_price {
        if price < Decimal::ZERO {
            return Err(AnalyticsError::invalid(
                format!("devices[{}].purchase_price", device.id),
                format!("must be non-negative, got {}", price),
            ));
        }
    }
    Ok(())
}

/// Compute analytics for a single device using the standard assumptions.
pub fn compute_device_analytics(
    device: &DeviceRecord,
    today: NaiveDate,
) -> AnalyticsResult<DeviceAnalytics> {
    compute_device_analytics_with(device, today, &AnalyticsAssumptions::default())
}

/// Compute analytics for a single device. Assumptions are expected to be
/// validated by the caller.
pub fn compute_device_analytics_with(
    device: &DeviceRecord,
    today: NaiveDate,
    assumptions: &AnalyticsAssumptions,
) -> AnalyticsResult<DeviceAnalytics> {
    validate_device(device)?;
    let price = device.price();

    let age_months = months_between(device.purchase_date, today).max(0);
    let value = decayed_value(price, assumptions.annual_rate(device.category), age_months);
    let current_value = round_whole(value).clamp(Decimal::ZERO, price);
    let depreciation_amount = price - current_value;

    let warranty = evaluate_warranty(price, device.warranty_expires, today, assumptions)?.rounded();

    Ok(DeviceAnalytics {
        device_id: device.id.clone(),
        device_name: device.name.clone(),
        category: device.category,
        purchase_price: price,
        age_months,
        current_value,
        depreciation_amount,
        depreciation_percentage: round_one_dp(percentage_of(depreciation_amount, price)),
        warranty_value: warranty.warranty_value,
        warranty_status: warranty.status,
        days_until_expiry: warranty.days_until_expiry,
        estimated_repair_cost: warranty.estimated_repair_cost,
        protection_value: warranty.protection_value,
    })
}

// ---------------------------------------------------------------------------
// Standalone calculation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInput {
    pub device: DeviceRecord,
    /// Evaluation date
    pub as_of: NaiveDate,
    #[serde(default)]
    pub assumptions: AnalyticsAssumptions,
}

pub fn calculate_device_analytics(
    input: &DeviceInput,
) -> AnalyticsResult<ComputationOutput<DeviceAnalytics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.assumptions.validate()?;
    let analytics = compute_device_analytics_with(&input.device, input.as_of, &input.assumptions)?;

    if input.device.purchase_date > input.as_of {
        warnings.push(format!(
            "Purchase date {} is after the evaluation date; age treated as zero",
            input.device.purchase_date
        ));
    }
    if input.device.warranty_expires < input.device.purchase_date {
        warnings.push("Warranty expires before the purchase date".to_string());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Device analytics: exponential depreciation plus warranty protection value",
        &input.assumptions,
        warnings,
        Some(input.as_of),
        elapsed,
        analytics,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn device(category: DeviceCategory, price: Option<Decimal>) -> DeviceRecord {
        DeviceRecord {
            id: "dev-1".into(),
            name: "Work laptop".into(),
            category,
            purchase_price: price,
            purchase_date: date(2024, 3, 20),
            warranty_expires: date(2026, 3, 20),
        }
    }

    #[test]
    fn test_laptop_after_one_year() {
        let a = compute_device_analytics(
            &device(DeviceCategory::Laptop, Some(dec!(100000))),
            date(2025, 3, 1),
        )
        .unwrap();
        assert_eq!(a.age_months, 12);
        assert_eq!(a.current_value, dec!(75000));
        assert_eq!(a.depreciation_amount, dec!(25000));
        assert_eq!(a.depreciation_percentage, dec!(25.0));
        assert_eq!(a.warranty_status, WarrantyStatus::Active);
        assert_eq!(a.estimated_repair_cost, dec!(20000));
    }

    #[test]
    fn test_missing_price_is_zero() {
        let a = compute_device_analytics(&device(DeviceCategory::Tablet, None), date(2025, 3, 1))
            .unwrap();
        assert_eq!(a.purchase_price, Decimal::ZERO);
        assert_eq!(a.current_value, Decimal::ZERO);
        assert_eq!(a.depreciation_percentage, Decimal::ZERO);
        assert_eq!(a.protection_value, Decimal::ZERO);
    }

    #[test]
    fn test_negative_price_fails_fast() {
        let err = compute_device_analytics(
            &device(DeviceCategory::Tablet, Some(dec!(-5))),
            date(2025, 3, 1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("purchase_price"));
    }

    #[test]
    fn test_price_out_of_range_is_an_error() {
        let price = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        let mut d = device(DeviceCategory::Laptop, Some(price));
        d.warranty_expires = date(9999, 1, 1);
        let err = compute_device_analytics(&d, date(2025, 3, 1)).unwrap_err();
        assert!(err.to_string().contains("warranty_value"));
    }

    #[test]
    fn test_future_purchase_is_not_appreciated() {
        let a = compute_device_analytics(
            &device(DeviceCategory::Smartphone, Some(dec!(900))),
            date(2024, 1, 1),
        )
        .unwrap();
        assert_eq!(a.age_months, 0);
        assert_eq!(a.current_value, dec!(900));
        assert_eq!(a.depreciation_amount, Decimal::ZERO);
    }

    #[test]
    fn test_expired_device_loses_repair_component() {
        let a = compute_device_analytics(
            &device(DeviceCategory::Camera, Some(dec!(1000))),
            date(2026, 4, 1),
        )
        .unwrap();
        assert_eq!(a.warranty_status, WarrantyStatus::Expired);
        assert!(a.days_until_expiry < 0);
        assert_eq!(a.warranty_value, Decimal::ZERO);
        assert_eq!(a.protection_value, Decimal::ZERO);
    }

    #[test]
    fn test_calculate_device_analytics_warnings() {
        let mut d = device(DeviceCategory::Tv, Some(dec!(1500)));
        d.warranty_expires = date(2023, 1, 1);
        let input = DeviceInput {
            device: d,
            as_of: date(2024, 1, 1),
            assumptions: AnalyticsAssumptions::default(),
        };
        let out = calculate_device_analytics(&input).unwrap();
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.result.warranty_status, WarrantyStatus::Expired);
    }
}
