use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::device::DeviceAnalytics;
use crate::types::{money_add, DeviceCategory, Money};
use crate::AnalyticsResult;

/// Totals for one device category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: DeviceCategory,
    pub device_count: usize,
    /// Sum of purchase prices
    pub total_value: Money,
    pub current_value: Money,
    pub depreciation_amount: Money,
    pub warranty_value: Money,
}

impl CategoryBreakdown {
    fn empty(category: DeviceCategory) -> Self {
        Self {
            category,
            device_count: 0,
            total_value: Decimal::ZERO,
            current_value: Decimal::ZERO,
            depreciation_amount: Decimal::ZERO,
            warranty_value: Decimal::ZERO,
        }
    }
}

/// Group device analytics by category, largest purchase value first.
/// Categories with equal totals keep first-seen order.
pub fn aggregate_categories(
    analytics: &[DeviceAnalytics],
) -> AnalyticsResult<Vec<CategoryBreakdown>> {
    let mut rows: Vec<CategoryBreakdown> = Vec::new();
    let mut index: HashMap<DeviceCategory, usize> = HashMap::new();

    for a in analytics {
        let slot = *index.entry(a.category).or_insert_with(|| {
            rows.push(CategoryBreakdown::empty(a.category));
            rows.len() - 1
        });
        let row = &mut rows[slot];
        row.device_count += 1;
        row.total_value = money_add("total_value", row.total_value, a.purchase_price)?;
        row.current_value = money_add("current_value", row.current_value, a.current_value)?;
        row.depreciation_amount = money_add(
            "depreciation_amount",
            row.depreciation_amount,
            a.depreciation_amount,
        )?;
        row.warranty_value = money_add("warranty_value", row.warranty_value, a.warranty_value)?;
    }

    // sort_by is stable
    rows.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    Ok(rows)
}
