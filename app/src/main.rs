// In app/src/main.rs

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use market_data::MarketClient;
use tracing_subscriber::prelude::*;

mod evaluator;

use crate::evaluator::{compose_report, evaluate_pair, should_notify};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A grid-bot range and momentum monitor.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs one evaluation cycle over the configured pairs.
    Run {
        /// Print the composed report instead of delivering it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Loads and validates the configuration, then prints the watchlist.
    CheckConfig,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new().with_default(tracing::Level::INFO),
    );
    tracing_subscriber::registry().with(fmt_layer).init();

    // Parse command-line arguments.
    let cli = Cli::parse();

    tracing::info!("Starting gridwatch");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Run { dry_run } => {
            run_cycle(dry_run).await?;
        }
        Commands::CheckConfig => {
            handle_check_config()?;
        }
    }

    tracing::info!("gridwatch has finished successfully.");

    Ok(())
}

// --- "Run" Subcommand Logic ---

/// One batch evaluation: fetch, classify, recommend, deliver at most one
/// notification. Fetch and data errors abort the run with a non-zero exit
/// status; a failed delivery does not.
async fn run_cycle(dry_run: bool) -> Result<()> {
    // --- 1. Initialization ---
    let settings = app_config::load_settings()?;
    let grids = settings.grid_configs()?;
    let thresholds = settings.rsi_thresholds();
    let soft_outside_pct = settings.soft_outside_pct();
    let lookback_days = settings.lookback_days();

    let client = MarketClient::new(&settings.provider);
    let notifier = notifier::from_settings(settings.telegram.as_ref());
    tracing::info!(
        pairs = grids.len(),
        channel = notifier.name(),
        "Evaluation cycle starting"
    );

    // --- 2. Sequential per-pair evaluation, in configured order ---
    let mut reports = Vec::with_capacity(grids.len());
    for grid in &grids {
        let price = client.current_price(&grid.symbol).await?;
        let klines = client.daily_klines(&grid.symbol, lookback_days).await?;

        let report = evaluate_pair(grid, price, &klines, &thresholds, soft_outside_pct);
        tracing::info!(
            symbol = %grid.symbol,
            price = %price,
            state = ?report.state,
            "Pair evaluated"
        );
        reports.push(report);
    }

    // --- 3. Alert decision and delivery ---
    if !should_notify(&reports, &thresholds) {
        tracing::info!("All pairs inside their ranges with neutral momentum, nothing to send");
        return Ok(());
    }

    let now = Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
    let text = compose_report(&now, &reports, &thresholds);

    if dry_run {
        println!("{text}");
        return Ok(());
    }

    // A failed delivery is logged by the notifier; it never fails the run.
    if !notifier.send(&text).await {
        tracing::warn!("Report could not be delivered, see notifier logs");
    }

    Ok(())
}

// --- "CheckConfig" Subcommand Logic ---

fn handle_check_config() -> Result<()> {
    let settings = app_config::load_settings()?;
    let grids = settings.grid_configs()?;
    let thresholds = settings.rsi_thresholds();

    for grid in &grids {
        tracing::info!(
            symbol = %grid.symbol,
            lower = %grid.lower,
            upper = %grid.upper,
            near_pct = %grid.near_pct,
            outside_tol_pct = %grid.outside_tol_pct,
            "Watching grid"
        );
    }
    tracing::info!(
        overbought = %thresholds.overbought,
        oversold = %thresholds.oversold,
        lookback_days = settings.lookback_days(),
        "Monitor settings"
    );

    Ok(())
}
