//! Warranty status and protection valuation.
//!
//! Remaining coverage accrues a fixed share of the purchase price per
//! warranty month; a flat repair-cost estimate counts towards protection
//! only until the warranty lapses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::AnalyticsAssumptions;
use crate::error::AnalyticsError;
use crate::types::*;
use crate::AnalyticsResult;

/// Valuation of one warranty at an evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyValuation {
    pub status: WarrantyStatus,
    /// Signed: negative once the warranty has expired
    pub days_until_expiry: i64,
    pub warranty_value: Money,
    pub estimated_repair_cost: Money,
    pub protection_value: Money,
}

impl WarrantyValuation {
    /// Whole-unit rounding of every monetary field.
    pub fn rounded(&self) -> Self {
        Self {
            warranty_value: round_whole(self.warranty_value),
            estimated_repair_cost: round_whole(self.estimated_repair_cost),
            protection_value: round_whole(self.protection_value),
            ..*self
        }
    }
}

/// Classify days remaining. Negative is expired; up to and including
/// `expiring_soon_days` is expiring soon.
pub fn warranty_status(days_until_expiry: i64, expiring_soon_days: i64) -> WarrantyStatus {
    if days_until_expiry < 0 {
        WarrantyStatus::Expired
    } else if days_until_expiry <= expiring_soon_days {
        WarrantyStatus::ExpiringSoon
    } else {
        WarrantyStatus::Active
    }
}

/// Unrounded warranty valuation of a device bought for `purchase_price`.
/// Fails when the valuation leaves the representable monetary range.
pub fn evaluate_warranty(
    purchase_price: Money,
    warranty_expires: NaiveDate,
    today: NaiveDate,
    assumptions: &AnalyticsAssumptions,
) -> AnalyticsResult<WarrantyValuation> {
    // Calendar dates differ by whole days, so the ceiling is exact.
    let days_until_expiry = (warranty_expires - today).num_days();
    let status = warranty_status(days_until_expiry, assumptions.expiring_soon_days);

    let monthly_value = money_mul(
        "warranty_value",
        purchase_price,
        assumptions.warranty_accrual_rate,
    )?;
    let remaining_months = Decimal::from(days_until_expiry)
        .checked_div(assumptions.days_per_month)
        .ok_or_else(|| {
            AnalyticsError::invalid("days_per_month", "remaining warranty months overflow")
        })?
        .max(Decimal::ZERO);
    let warranty_value = money_mul("warranty_value", monthly_value, remaining_months)?;

    let estimated_repair_cost = money_mul(
        "estimated_repair_cost",
        purchase_price,
        assumptions.repair_cost_rate,
    )?;
    let protection_value = if status.is_covered() {
        money_add("protection_value", warranty_value, estimated_repair_cost)?
    } else {
        warranty_value
    };

    Ok(WarrantyValuation {
        status,
        days_until_expiry,
        warranty_value,
        estimated_repair_cost,
        protection_value,
    })
}

// ---------------------------------------------------------------------------
// Standalone calculation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarrantyInput {
    #[serde(default)]
    pub purchase_price: Option<Money>,
    pub warranty_expires: NaiveDate,
    /// Evaluation date
    pub as_of: NaiveDate,
    #[serde(default)]
    pub assumptions: AnalyticsAssumptions,
}

/// Rounded warranty valuation wrapped in the computation envelope.
pub fn calculate_warranty(
    input: &WarrantyInput,
) -> AnalyticsResult<ComputationOutput<WarrantyValuation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let price = input.purchase_price.unwrap_or(Decimal::ZERO);
    if price < Decimal::ZERO {
        return Err(AnalyticsError::invalid(
            "purchase_price",
            "must be non-negative",
        ));
    }
    input.assumptions.validate()?;

    let valuation = evaluate_warranty(
        price,
        input.warranty_expires,
        input.as_of,
        &input.assumptions,
    )?
    .rounded();

    if valuation.status == WarrantyStatus::ExpiringSoon {
        warnings.push(format!(
            "Warranty lapses in {} days",
            valuation.days_until_expiry
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Warranty accrual: price × accrual rate × remaining months; repair cost counted while covered",
        &input.assumptions,
        warnings,
        Some(input.as_of),
        elapsed,
        valuation,
    ))
}
