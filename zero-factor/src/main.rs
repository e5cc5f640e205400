//! Zero Factor - factor and IC evaluation for a single A-share.
//!
//! Fetches forward-adjusted daily bars, computes the rank-volume correlation
//! factor and prints its IC report.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use serde::Serialize;

use zero_common::config::Config;
use zero_common::logging::init_logging_with_exclusions;
use zero_common::Error;
use zero_factor::chart::{CandleChart, IcScatter};
use zero_factor::{EastmoneyAdapter, FactorError, FactorPipeline, Symbol};

/// Zero Factor - rank-volume correlation factor and IC report for one A-share.
#[derive(Parser, Debug)]
#[command(name = "zero-factor")]
#[command(author = "theonlyhennygod")]
#[command(version)]
#[command(about = "Evaluate the rank-volume correlation factor on one A-share.", long_about = None)]
struct Cli {
    /// Stock symbol (000001.SZ, sh600000, 600000); defaults to factor.symbol
    symbol: Option<String>,

    /// First date to fetch (YYYY-MM-DD); defaults to --days before the end date
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last date to fetch (YYYY-MM-DD); defaults to today
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Calendar days of history when --start is not given
    #[arg(long)]
    days: Option<u32>,

    /// Forward return horizon in trading days
    #[arg(long)]
    horizon: Option<usize>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write chart data (IC scatter, candles with moving averages) as JSON
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Config file (default: ~/.codecoder/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct ChartData<'a> {
    title: String,
    scatter: Option<&'a IcScatter>,
    candles: &'a CandleChart,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "zero-factor failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    tracing::info!("Zero Factor v{}", env!("CARGO_PKG_VERSION"));

    let symbol = Symbol::parse(&config.factor.symbol)
        .map_err(|e| Error::InvalidInput(e.to_string()))?;

    let end = cli.end.unwrap_or_else(|| Local::now().date_naive());
    let start = cli
        .start
        .unwrap_or_else(|| end - Duration::days(i64::from(config.factor.lookback_days)));
    if start > end {
        return Err(Error::InvalidInput(format!("start date {} is after end date {}", start, end)).into());
    }

    let pipeline = FactorPipeline::from_config(&config.factor)?;
    let provider = EastmoneyAdapter::from_config(&config.data_source);

    tracing::info!(
        factor = pipeline.factor().name(),
        formula = %pipeline.factor().description(),
        horizon = pipeline.horizon(),
        %start,
        %end,
        "Evaluating {}",
        symbol
    );

    let output = pipeline
        .evaluate(&provider, &symbol, start, end)
        .await
        .map_err(|e| ingestion_error(e, &symbol))?;
    let report = &output.report;

    if let Some(significant) = report.significant_at(config.factor.significance_level) {
        tracing::info!(
            alpha = config.factor.significance_level,
            significant,
            "Monthly IC t-test"
        );
    }

    if let Some(path) = &cli.chart {
        let chart = ChartData {
            title: IcScatter::title(&output.symbol, report.rank_ic, report.pearson_ic),
            scatter: output.scatter.as_ref(),
            candles: &output.candles,
        };
        let content = serde_json::to_string_pretty(&chart)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write chart data to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Chart data written");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.text_report());
    }

    Ok(())
}

/// Config file, then `ZERO_*` environment overrides, then CLI flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| Error::Config(format!("{:#}", e)))?;

    config.apply_env_overrides();

    if let Some(symbol) = &cli.symbol {
        config.factor.symbol = symbol.clone();
    }
    if let Some(horizon) = cli.horizon {
        config.factor.horizon = horizon;
    }
    if let Some(days) = cli.days {
        config.factor.lookback_days = days;
    }

    config.validate().map_err(Error::from)?;
    Ok(config)
}

/// Ingestion failures become `Error::External`; core errors pass through.
fn ingestion_error(err: FactorError, symbol: &Symbol) -> anyhow::Error {
    if !err.is_ingestion() {
        return err.into();
    }
    Error::External(err.to_string())
        .with_context(format!("fetching daily bars for {}", symbol))
        .into()
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<Error>() {
        return u8::try_from(e.exit_code()).unwrap_or(1);
    }
    match err.downcast_ref::<FactorError>() {
        Some(_) => 65,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zero_factor::ProviderError;

    fn symbol() -> Symbol {
        Symbol::parse("000001.SZ").unwrap()
    }

    #[test]
    fn test_ingestion_failure_exits_unavailable() {
        let err = ingestion_error(
            FactorError::Provider(ProviderError::Network("timeout".into())),
            &symbol(),
        );
        assert_eq!(exit_code(&err), 69);
        assert!(err.to_string().starts_with("fetching daily bars for 000001.SZ"));
    }

    #[test]
    fn test_core_error_exit_code() {
        let err = ingestion_error(FactorError::InvalidWindow(0), &symbol());
        assert_eq!(exit_code(&err), 65);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: anyhow::Error = Error::Config("bad json".into()).into();
        assert_eq!(exit_code(&err), 78);
    }
}
