use chrono::NaiveDate;
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use device_analytics_core::portfolio::{calculate_portfolio_analytics, PortfolioInput};
use device_analytics_core::{AnalyticsAssumptions, ComputationOutput, DeviceRecord};

use crate::input::{self, RawInput};

/// Arguments shared by every portfolio-level command
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to a JSON (portfolio object or device array) or CSV device file
    #[arg(long)]
    pub input: Option<String>,

    /// Evaluation date (YYYY-MM-DD); defaults to the input's as_of, then today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Path to a JSON file of valuation assumptions
    #[arg(long)]
    pub assumptions: Option<String>,
}

/// Resolve the evaluation date: explicit flag, then input, then the local date.
pub fn resolve_as_of(flag: Option<NaiveDate>, from_input: Option<NaiveDate>) -> NaiveDate {
    flag.or(from_input)
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// Portfolio JSON as accepted on the command line; `as_of` may be omitted.
#[derive(Default, Deserialize)]
struct PortfolioFile {
    #[serde(default)]
    devices: Vec<DeviceRecord>,
    #[serde(default)]
    as_of: Option<NaiveDate>,
    #[serde(default)]
    assumptions: Option<AnalyticsAssumptions>,
}

fn load_portfolio(args: &PortfolioArgs) -> Result<PortfolioInput, Box<dyn std::error::Error>> {
    let raw = input::read_raw(args.input.as_deref())?.ok_or(
        "--input <devices.json|devices.csv> or stdin required for portfolio analytics",
    )?;

    let file: PortfolioFile = match raw {
        RawInput::Devices(devices) => PortfolioFile {
            devices,
            ..Default::default()
        },
        RawInput::Json(value @ Value::Array(_)) => PortfolioFile {
            devices: serde_json::from_value(value)?,
            ..Default::default()
        },
        RawInput::Json(value) => serde_json::from_value(value)?,
    };
    let PortfolioFile {
        devices,
        as_of,
        assumptions,
    } = file;

    let assumptions = match &args.assumptions {
        Some(path) => input::file::read_json(path)?,
        None => assumptions.unwrap_or_default(),
    };

    let as_of = resolve_as_of(args.as_of, as_of);
    tracing::debug!(devices = devices.len(), %as_of, "loaded portfolio");
    Ok(PortfolioInput {
        devices,
        as_of,
        assumptions,
    })
}

/// Re-wrap one section of the portfolio result in the same envelope.
fn section<T: Serialize, U: Serialize>(
    output: ComputationOutput<T>,
    pick: impl FnOnce(T) -> U,
) -> ComputationOutput<U> {
    ComputationOutput {
        result: pick(output.result),
        methodology: output.methodology,
        assumptions: output.assumptions,
        warnings: output.warnings,
        metadata: output.metadata,
    }
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_portfolio(&args)?;
    let result = calculate_portfolio_analytics(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_categories(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_portfolio(&args)?;
    let result = calculate_portfolio_analytics(&input)?;
    Ok(serde_json::to_value(section(result, |r| r.category_breakdown))?)
}

pub fn run_timeline(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_portfolio(&args)?;
    let result = calculate_portfolio_analytics(&input)?;
    Ok(serde_json::to_value(section(result, |r| r.warranty_timeline))?)
}

pub fn run_trend(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_portfolio(&args)?;
    let result = calculate_portfolio_analytics(&input)?;
    Ok(serde_json::to_value(section(result, |r| r.depreciation_trend))?)
}
