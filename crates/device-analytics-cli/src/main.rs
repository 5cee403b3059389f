mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::device::{DepreciationArgs, DeviceArgs, WarrantyArgs};
use commands::portfolio::PortfolioArgs;
use output::OutputFormat;

/// Depreciation, warranty and portfolio analytics for consumer devices
#[derive(Parser)]
#[command(
    name = "dva",
    version,
    about = "Depreciation, warranty and portfolio analytics for consumer devices",
    long_about = "A CLI for valuing a portfolio of owned devices with decimal precision. \
                  Computes per-device depreciation and warranty protection value, \
                  category breakdowns, a warranty expiry timeline and a 24-month \
                  depreciation trend."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug detail to stderr (overrides DEVICE_ANALYTICS_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full portfolio analytics (totals, categories, timeline, trend)
    Portfolio(PortfolioArgs),
    /// Category breakdown only
    Categories(PortfolioArgs),
    /// Upcoming warranty expirations by month
    Timeline(PortfolioArgs),
    /// Portfolio value over the last 24 months
    Trend(PortfolioArgs),
    /// Analytics for a single device
    Device(DeviceArgs),
    /// Depreciated value of a single purchase
    Depreciation(DepreciationArgs),
    /// Warranty status and protection value
    Warranty(WarrantyArgs),
    /// Print version information
    Version,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("DEVICE_ANALYTICS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Categories(args) => commands::portfolio::run_categories(args),
        Commands::Timeline(args) => commands::portfolio::run_timeline(args),
        Commands::Trend(args) => commands::portfolio::run_trend(args),
        Commands::Device(args) => commands::device::run_device(args),
        Commands::Depreciation(args) => commands::device::run_depreciation(args),
        Commands::Warranty(args) => commands::device::run_warranty(args),
        Commands::Version => {
            println!("dva {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
