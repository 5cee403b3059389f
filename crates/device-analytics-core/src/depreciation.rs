//! Category-based exponential depreciation.
//!
//! `value = price × (1 − r)^(age / 12)` with `r` the annual rate for the
//! device category and `age` in whole calendar months.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::{default_annual_rate, AnalyticsAssumptions};
use crate::error::AnalyticsError;
use crate::types::*;
use crate::AnalyticsResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Unrounded value of a device after `age_in_months`, using the standard
/// rate table. A negative age (purchase in the future) gives a value
/// above the purchase price; callers that need decay must clamp.
pub fn current_value(purchase_price: Money, category: DeviceCategory, age_in_months: i32) -> Money {
    decayed_value(purchase_price, default_annual_rate(category), age_in_months)
}

/// Exponential decay at `annual_rate` over `age_in_months`.
pub fn decayed_value(purchase_price: Money, annual_rate: Rate, age_in_months: i32) -> Money {
    let years = Decimal::from(age_in_months) / MONTHS_PER_YEAR;
    let retention = Decimal::ONE - annual_rate;
    match retention.checked_powd(years) {
        Some(factor) => purchase_price * factor,
        // Only reachable for extreme ages: the factor under/overflows.
        None if age_in_months > 0 => Decimal::ZERO,
        None => purchase_price,
    }
}

// ---------------------------------------------------------------------------
// Standalone calculation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationInput {
    pub purchase_price: Money,
    #[serde(default)]
    pub category: DeviceCategory,
    /// Whole calendar months since purchase
    pub age_in_months: i32,
    #[serde(default)]
    pub assumptions: AnalyticsAssumptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationOutput {
    pub category: DeviceCategory,
    pub annual_rate: Rate,
    pub age_in_months: i32,
    pub purchase_price: Money,
    pub current_value: Money,
    pub depreciation_amount: Money,
    pub depreciation_percentage: Percent,
}

/// Value a single purchase after a given age.
pub fn calculate_depreciation(
    input: &DepreciationInput,
) -> AnalyticsResult<ComputationOutput<DepreciationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.purchase_price < Decimal::ZERO {
        return Err(AnalyticsError::invalid(
            "purchase_price",
            "must be non-negative",
        ));
    }
    input.assumptions.validate()?;

    let age = if input.age_in_months < 0 {
        warnings.push(format!(
            "Negative age of {} months treated as zero",
            input.age_in_months
        ));
        0
    } else {
        input.age_in_months
    };

    let annual_rate = input.assumptions.annual_rate(input.category);
    let value = round_whole(decayed_value(input.purchase_price, annual_rate, age))
        .min(input.purchase_price);
    let depreciation_amount = input.purchase_price - value;

    let output = DepreciationOutput {
        category: input.category,
        annual_rate,
        age_in_months: age,
        purchase_price: input.purchase_price,
        current_value: value,
        depreciation_amount,
        depreciation_percentage: round_one_dp(percentage_of(
            depreciation_amount,
            input.purchase_price,
        )),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exponential category depreciation: price × (1 − r)^(months / 12)",
        &serde_json::json!({
            "category": input.category.as_str(),
            "annual_rate": annual_rate.to_string(),
            "age_basis": "whole calendar months, day of month ignored",
        }),
        warnings,
        None,
        elapsed,
        output,
    ))
}
