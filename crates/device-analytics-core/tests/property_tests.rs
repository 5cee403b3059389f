//! Property-based tests for the valuation models and portfolio engine.

use chrono::{Duration, NaiveDate};
use device_analytics_core::depreciation::current_value;
use device_analytics_core::portfolio::{analyze_portfolio, simulate_depreciation_trend};
use device_analytics_core::{
    compute_device_analytics, AnalyticsAssumptions, DeviceCategory, DeviceRecord, WarrantyStatus,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;

// =============================================================================
// Generators
// =============================================================================

fn arb_category() -> impl Strategy<Value = DeviceCategory> {
    prop::sample::select(DeviceCategory::ALL.to_vec())
}

/// Prices in cents up to 50,000.00
fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
}

fn arb_device() -> impl Strategy<Value = DeviceRecord> {
    (
        "[a-z]{3,12}",
        arb_category(),
        proptest::option::of(arb_price()),
        0i64..3000,  // days owned
        -900i64..1500, // days of warranty left
    )
        .prop_map(|(name, category, price, owned, left)| DeviceRecord {
            id: name.clone(),
            name,
            category,
            purchase_price: price,
            purchase_date: today() - Duration::days(owned),
            warranty_expires: today() + Duration::days(left),
        })
}

// =============================================================================
// Depreciation
// =============================================================================

proptest! {
    #[test]
    fn zero_age_is_identity(price in arb_price(), category in arb_category()) {
        prop_assert_eq!(current_value(price, category, 0), price);
    }

    #[test]
    fn value_never_increases_with_age(
        price in arb_price(),
        category in arb_category(),
        age in 0i32..240,
    ) {
        let now = current_value(price, category, age);
        let later = current_value(price, category, age + 1);
        prop_assert!(later <= now, "{} -> {}", now, later);
    }

    #[test]
    fn value_is_bounded(price in arb_price(), category in arb_category(), age in 0i32..240) {
        let v = current_value(price, category, age);
        prop_assert!(v >= Decimal::ZERO);
        prop_assert!(v <= price);
    }
}

// =============================================================================
// Portfolio
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn trend_always_has_24_months(devices in proptest::collection::vec(arb_device(), 0..40)) {
        let trend =
            simulate_depreciation_trend(&devices, today(), &AnalyticsAssumptions::default()).unwrap();
        prop_assert_eq!(trend.len(), 24);
    }

    #[test]
    fn breakdown_covers_every_device(devices in proptest::collection::vec(arb_device(), 0..40)) {
        let out = analyze_portfolio(&devices, today()).unwrap();
        let count: usize = out.category_breakdown.iter().map(|r| r.device_count).sum();
        let total: Decimal = out.category_breakdown.iter().map(|r| r.total_value).sum();
        prop_assert_eq!(count, out.total_devices);
        prop_assert_eq!(total, out.total_purchase_value);
        prop_assert_eq!(
            out.active_warranties + out.expiring_warranties + out.expired_warranties,
            out.total_devices
        );
    }

    #[test]
    fn timeline_never_lists_expired_devices(
        devices in proptest::collection::vec(arb_device(), 0..40),
    ) {
        // Unique names so every timeline entry maps back to one device
        let devices: Vec<DeviceRecord> = devices
            .into_iter()
            .enumerate()
            .map(|(i, d)| DeviceRecord { name: format!("{}-{}", d.name, i), ..d })
            .collect();
        let out = analyze_portfolio(&devices, today()).unwrap();

        let mut expired = HashSet::new();
        let mut live = 0usize;
        for d in &devices {
            let a = compute_device_analytics(d, today()).unwrap();
            if a.warranty_status == WarrantyStatus::Expired {
                expired.insert(d.name.clone());
            } else {
                live += 1;
            }
        }

        let listed: usize = out.warranty_timeline.iter().map(|t| t.expiring_count).sum();
        prop_assert!(listed <= live);
        prop_assert!(out.warranty_timeline.len() <= 12);
        for item in &out.warranty_timeline {
            prop_assert_eq!(item.expiring_count, item.device_names.len());
            for name in &item.device_names {
                prop_assert!(
                    !expired.contains(name),
                    "expired device {} listed in {}",
                    name,
                    item.month
                );
            }
        }
    }

    #[test]
    fn protection_drops_when_warranty_lapses(price in arb_price()) {
        let on_last_day = DeviceRecord {
            id: "x".into(),
            name: "x".into(),
            category: DeviceCategory::Camera,
            purchase_price: Some(price),
            purchase_date: today() - Duration::days(300),
            warranty_expires: today(),
        };
        let lapsed = DeviceRecord {
            warranty_expires: today() - Duration::days(1),
            ..on_last_day.clone()
        };
        let before = device_analytics_core::compute_device_analytics(&on_last_day, today()).unwrap();
        let after = device_analytics_core::compute_device_analytics(&lapsed, today()).unwrap();
        prop_assert_eq!(before.warranty_status, WarrantyStatus::ExpiringSoon);
        prop_assert_eq!(after.warranty_status, WarrantyStatus::Expired);
        prop_assert_eq!(before.protection_value - after.protection_value, before.estimated_repair_cost);
        if before.estimated_repair_cost > Decimal::ZERO {
            prop_assert!(after.protection_value < before.protection_value);
        }
    }
}
