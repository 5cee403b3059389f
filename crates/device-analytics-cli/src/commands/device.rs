use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use device_analytics_core::depreciation::{self, DepreciationInput};
use device_analytics_core::device::{self as device_calc, DeviceInput};
use device_analytics_core::warranty::{self, WarrantyInput};
use device_analytics_core::{AnalyticsAssumptions, DeviceCategory, DeviceRecord};

use super::portfolio::resolve_as_of;
use crate::input::{self, RawInput};

/// Arguments for single-device analytics
#[derive(Args)]
pub struct DeviceArgs {
    /// Path to a JSON file holding one device (or {"device": ..., "as_of": ...})
    #[arg(long)]
    pub input: Option<String>,

    /// Evaluation date (YYYY-MM-DD); defaults to the input's as_of, then today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Path to a JSON file of valuation assumptions
    #[arg(long)]
    pub assumptions: Option<String>,
}

/// Arguments for a depreciation calculation
#[derive(Args)]
pub struct DepreciationArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Decimal,

    /// Device category (laptop, smartphone, tablet, smartwatch, headphones,
    /// camera, gaming-console, tv, other)
    #[arg(long, default_value = "other")]
    pub category: String,

    /// Whole calendar months since purchase
    #[arg(long, allow_hyphen_values = true)]
    pub age_months: i32,

    /// Override the annual depreciation rate for the category (e.g. 0.25)
    #[arg(long)]
    pub rate: Option<Decimal>,
}

/// Arguments for a warranty valuation
#[derive(Args)]
pub struct WarrantyArgs {
    /// Purchase price (omit for gifted or free devices)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Warranty expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub expires: NaiveDate,

    /// Evaluation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct DeviceFile {
    device: DeviceRecord,
    #[serde(default)]
    as_of: Option<NaiveDate>,
    #[serde(default)]
    assumptions: Option<AnalyticsAssumptions>,
}

pub fn run_device(args: DeviceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = input::read_raw(args.input.as_deref())?
        .ok_or("--input <device.json> or stdin required for device analytics")?;

    let file = match raw {
        RawInput::Json(value) if value.get("device").is_some() => {
            serde_json::from_value::<DeviceFile>(value)?
        }
        RawInput::Json(value) => DeviceFile {
            device: serde_json::from_value(value)?,
            as_of: None,
            assumptions: None,
        },
        RawInput::Devices(mut devices) => {
            if devices.len() != 1 {
                return Err(format!(
                    "device analytics expects exactly one CSV row, got {}",
                    devices.len()
                )
                .into());
            }
            DeviceFile {
                device: devices.remove(0),
                as_of: None,
                assumptions: None,
            }
        }
    };

    let assumptions = match &args.assumptions {
        Some(path) => input::file::read_json(path)?,
        None => file.assumptions.unwrap_or_default(),
    };
    let device_input = DeviceInput {
        device: file.device,
        as_of: resolve_as_of(args.as_of, file.as_of),
        assumptions,
    };
    let result = device_calc::calculate_device_analytics(&device_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_depreciation(args: DepreciationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let category: DeviceCategory = args.category.parse()?;
    let mut assumptions = AnalyticsAssumptions::default();
    if let Some(rate) = args.rate {
        assumptions.depreciation_rates.insert(category, rate);
    }
    let input = DepreciationInput {
        purchase_price: args.price,
        category,
        age_in_months: args.age_months,
        assumptions,
    };
    let result = depreciation::calculate_depreciation(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_warranty(args: WarrantyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = WarrantyInput {
        purchase_price: args.price,
        warranty_expires: args.expires,
        as_of: resolve_as_of(args.as_of, None),
        assumptions: AnalyticsAssumptions::default(),
    };
    let result = warranty::calculate_warranty(&input)?;
    Ok(serde_json::to_value(result)?)
}
