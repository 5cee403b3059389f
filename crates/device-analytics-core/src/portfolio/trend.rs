//! Backward-looking depreciation trend.
//!
//! Each month is valued from scratch as of its first day: only devices
//! already purchased by then count, each depreciated by its whole-month
//! age at that date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::{AnalyticsAssumptions, TREND_MONTHS};
use crate::calendar::{month_key, month_start_before, months_between};
use crate::depreciation::decayed_value;
use crate::device::validate_device;
use crate::types::{money_add, round_whole, DeviceRecord, Money};
use crate::AnalyticsResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationTrendItem {
    /// "YYYY-MM"
    pub month: String,
    /// First day of the month the values are measured at
    pub reference_date: NaiveDate,
    pub portfolio_value: Money,
    pub cumulative_depreciation: Money,
}

/// Portfolio value and cumulative depreciation for each of the last 24
/// calendar months, oldest first, ending with the month of `today`.
pub fn simulate_depreciation_trend(
    devices: &[DeviceRecord],
    today: NaiveDate,
    assumptions: &AnalyticsAssumptions,
) -> AnalyticsResult<Vec<DepreciationTrendItem>> {
    for device in devices {
        validate_device(device)?;
    }

    let mut trend = Vec::with_capacity(TREND_MONTHS as usize);
    for months_back in (0..TREND_MONTHS).rev() {
        let reference_date = month_start_before(today, months_back)?;

        let mut portfolio_value = Decimal::ZERO;
        let mut cumulative_depreciation = Decimal::ZERO;
        for device in devices {
            if device.purchase_date > reference_date {
                continue;
            }
            let price = device.price();
            let age = months_between(device.purchase_date, reference_date);
            let value = decayed_value(price, assumptions.annual_rate(device.category), age);
            portfolio_value = money_add("portfolio_value", portfolio_value, value)?;
            cumulative_depreciation =
                money_add("cumulative_depreciation", cumulative_depreciation, price - value)?;
        }

        trend.push(DepreciationTrendItem {
            month: month_key(reference_date),
            reference_date,
            portfolio_value: round_whole(portfolio_value),
            cumulative_depreciation: round_whole(cumulative_depreciation),
        });
    }

    Ok(trend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceCategory;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn laptop(purchased: NaiveDate, price: Decimal) -> DeviceRecord {
        DeviceRecord {
            id: "lp".into(),
            name: "Laptop".into(),
            category: DeviceCategory::Laptop,
            purchase_price: Some(price),
            purchase_date: purchased,
            warranty_expires: date(2030, 1, 1),
        }
    }

    #[test]
    fn test_always_24_months_oldest_first() {
        let trend =
            simulate_depreciation_trend(&[], date(2025, 3, 18), &AnalyticsAssumptions::default())
                .unwrap();
        assert_eq!(trend.len(), 24);
        assert_eq!(trend[0].month, "2023-04");
        assert_eq!(trend[23].month, "2025-03");
        assert_eq!(trend[23].reference_date, date(2025, 3, 1));
        assert!(trend
            .iter()
            .all(|t| t.portfolio_value.is_zero() && t.cumulative_depreciation.is_zero()));
    }

    #[test]
    fn test_device_appears_from_first_month_start_after_purchase() {
        let devices = vec![laptop(date(2024, 6, 1), dec!(1000))];
        let trend =
            simulate_depreciation_trend(&devices, date(2025, 3, 18), &AnalyticsAssumptions::default())
                .unwrap();
        let may = trend.iter().find(|t| t.month == "2024-05").unwrap();
        let june = trend.iter().find(|t| t.month == "2024-06").unwrap();
        assert_eq!(may.portfolio_value, Decimal::ZERO);
        assert_eq!(june.portfolio_value, dec!(1000));
        assert_eq!(june.cumulative_depreciation, Decimal::ZERO);
    }

    #[test]
    fn test_mid_month_purchase_waits_for_next_month() {
        let devices = vec![laptop(date(2025, 3, 10), dec!(1000))];
        let trend =
            simulate_depreciation_trend(&devices, date(2025, 3, 18), &AnalyticsAssumptions::default())
                .unwrap();
        assert!(trend.iter().all(|t| t.portfolio_value.is_zero()));
    }

    #[test]
    fn test_value_after_one_year() {
        let devices = vec![laptop(date(2023, 1, 20), dec!(100000))];
        let trend =
            simulate_depreciation_trend(&devices, date(2024, 1, 5), &AnalyticsAssumptions::default())
                .unwrap();
        let last = trend.last().unwrap();
        assert_eq!(last.portfolio_value, dec!(75000));
        assert_eq!(last.cumulative_depreciation, dec!(25000));
    }

    #[test]
    fn test_value_and_depreciation_sum_to_cost() {
        let devices = vec![
            laptop(date(2022, 2, 1), dec!(1499.99)),
            laptop(date(2023, 8, 1), dec!(899)),
        ];
        let trend =
            simulate_depreciation_trend(&devices, date(2024, 12, 1), &AnalyticsAssumptions::default())
                .unwrap();
        let last = trend.last().unwrap();
        let total = last.portfolio_value + last.cumulative_depreciation;
        assert!((total - dec!(2398.99)).abs() <= Decimal::ONE);
    }

    #[test]
    fn test_negative_price_rejected() {
        let devices = vec![laptop(date(2024, 1, 1), dec!(-1))];
        assert!(
            simulate_depreciation_trend(&devices, date(2025, 1, 1), &AnalyticsAssumptions::default())
                .is_err()
        );
    }
}
