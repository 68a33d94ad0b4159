mod config;
mod engine;
mod ingest;
mod models;
mod report;
mod types;

use std::fs::{self, File};
use std::io::{stderr, stdout, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::SettlementConfig;
use crate::engine::SettlementEngine;
use crate::ingest::CsvRecordSource;
use crate::models::SettlementReport;
use crate::report::{write_summary_export, HtmlReport, Logo};

/// Aggregates merchant settlement data into a payout, reserve and repayment report.
#[derive(Debug, Parser)]
#[command(name = "settlement-report", version)]
struct Cli {
    /// Settlement data CSV, one row per transaction
    input: PathBuf,

    /// Annual interest rate for the repayment projection, as a fraction
    #[arg(long, env = "SETTLEMENT_INTEREST_RATE", default_value = "0.07")]
    interest_rate: Decimal,

    /// Approved credit limit per merchant
    #[arg(long, env = "SETTLEMENT_CREDIT_LIMIT", default_value = "250000")]
    credit_limit: Decimal,

    /// Number of monthly periods in the repayment projection
    #[arg(long, env = "SETTLEMENT_PERIODS", default_value_t = 60, allow_negative_numbers = true)]
    periods: i64,

    /// Where the HTML report is written
    #[arg(long, default_value = "BackofficeReport.html")]
    html: PathBuf,

    /// Where the summary CSV is written (stdout when omitted)
    #[arg(long)]
    export: Option<PathBuf>,

    /// Logo image shown in the report header
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Request payout for every Ready row before aggregation
    #[arg(long)]
    execute: bool,

    /// Available log levels: error, warn, info, debug, trace
    #[arg(long, default_value = "error", value_parser = parse_log_level)]
    log_level: LevelFilter
}

impl Cli {
    fn settlement_config(&self) -> SettlementConfig {
        SettlementConfig {
            annual_interest_rate: self.interest_rate,
            credit_limit: self.credit_limit,
            period_count: self.periods
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level);

    let engine = SettlementEngine::new(cli.settlement_config())?
        .with_payout_execution(cli.execute);

    info!("Running settlement with {:?}", engine.config());

    let timer = Instant::now();
    let report = engine.run(CsvRecordSource::new(&cli.input)).await?;
    let duration = timer.elapsed();

    info!("Computed settlement report in: {duration:?}");

    let logo = Logo::resolve(cli.logo.as_deref());
    write_html_report(&cli.html, &report, &logo)?;
    write_export(cli.export.as_deref(), &report)?;

    eprintln!("Report written to {}", cli.html.display());

    Ok(())
}

fn parse_log_level(level: &str) -> Result<LevelFilter, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(format!("invalid log level '{level}'"))
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout may carry the CSV export, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_html_report(path: &Path, report: &SettlementReport, logo: &Logo) -> Result<()> {
    let html = HtmlReport::new(report, logo).render();

    fs::write(path, html)
        .with_context(|| format!("Error writing the HTML report to {}", path.display()))?;

    info!("HTML report saved to {}", path.display());

    Ok(())
}

fn write_export(path: Option<&Path>, report: &SettlementReport) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Error creating the summary export at {}", path.display()))?;

            write_summary_export(BufWriter::new(file), report)
                .with_context(|| format!("Error writing the summary export to {}", path.display()))?;

            info!("Summary saved to {}", path.display());
        }
        None => {
            write_summary_export(BufWriter::new(stdout().lock()), report)
                .context("Error writing the summary export to stdout")?;
        }
    }

    Ok(())
}
