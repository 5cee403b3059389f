use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::month_key;
use crate::device::DeviceAnalytics;
use crate::error::AnalyticsError;
use crate::types::{money_add, DeviceRecord, Money, WarrantyStatus};
use crate::AnalyticsResult;

/// Warranties lapsing within one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyTimelineItem {
    /// "YYYY-MM"
    pub month: String,
    pub expiring_count: usize,
    /// Sum of remaining warranty value
    pub expiring_value: Money,
    pub device_names: Vec<String>,
}

/// Bucket live warranties by expiry month, earliest first, keeping at
/// most `max_months` buckets.
///
/// `devices` and `analytics` must be parallel slices (same order, as
/// produced by mapping the devices through the calculator).
pub fn project_warranty_timeline(
    devices: &[DeviceRecord],
    analytics: &[DeviceAnalytics],
    today: NaiveDate,
    max_months: usize,
) -> AnalyticsResult<Vec<WarrantyTimelineItem>> {
    if devices.len() != analytics.len() {
        return Err(AnalyticsError::invalid(
            "analytics",
            format!(
                "expected {} entries to match devices, got {}",
                devices.len(),
                analytics.len()
            ),
        ));
    }

    let mut buckets: BTreeMap<String, WarrantyTimelineItem> = BTreeMap::new();

    for (device, a) in devices.iter().zip(analytics) {
        if a.warranty_status == WarrantyStatus::Expired {
            continue;
        }
        // Checked on the raw date as well as the derived status.
        if device.warranty_expires < today {
            continue;
        }

        let key = month_key(device.warranty_expires);
        let item = buckets
            .entry(key.clone())
            .or_insert_with(|| WarrantyTimelineItem {
                month: key,
                expiring_count: 0,
                expiring_value: Decimal::ZERO,
                device_names: Vec::new(),
            });
        item.expiring_count += 1;
        item.expiring_value =
            money_add("expiring_value", item.expiring_value, a.warranty_value)?;
        item.device_names.push(a.device_name.clone());
    }

    Ok(buckets.into_values().take(max_months).collect())
}
