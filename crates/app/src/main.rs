use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod report;

use config::{Overrides, ReconConfig, RunSettings};

/// Reconcile ledger transactions against one or more bank statements.
#[derive(Debug, Parser)]
#[command(name = "recon", version, about)]
struct Cli {
    /// System (ledger) transactions CSV
    #[arg(long)]
    system: Option<PathBuf>,

    /// Bank statement CSV; repeat for several statements
    #[arg(long = "bank")]
    banks: Vec<PathBuf>,

    /// First day to reconcile, YYYY-MM-DD (inclusive)
    #[arg(long)]
    start: NaiveDate,

    /// Last day to reconcile, YYYY-MM-DD (inclusive)
    #[arg(long)]
    end: NaiveDate,

    /// IANA timezone used to derive calendar dates [default: UTC]
    #[arg(long)]
    tz: Option<String>,

    /// Days of slack allowed between ledger and bank dates [default: 0]
    #[arg(long = "date-window")]
    date_window: Option<u32>,

    /// TOML file with defaults for the options above
    #[arg(long, env = "RECON_CONFIG")]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ReconConfig::load(cli.config.as_deref())?;
    let settings = RunSettings::resolve(
        Overrides {
            system: cli.system,
            banks: cli.banks,
            start: Some(cli.start),
            end: Some(cli.end),
            timezone: cli.tz,
            date_window: cli.date_window,
        },
        config,
    )?;

    let report = commands::run_reconcile(&settings)?;

    match cli.output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("creating report {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            report.write_json(&mut writer)?;
            writer.flush()?;
            tracing::info!("report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            report.write_json(stdout.lock())?;
        }
    }

    Ok(())
}
