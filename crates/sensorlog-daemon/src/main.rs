//! sensorlog daemon
//!
//! Samples hardware sensors at a fixed interval and appends them to a CSV log
//! for offline diagnosis.

mod collector;
mod config;
mod log_writer;
mod record;
mod resolver;
mod scheduler;

use anyhow::{Context, Result};
use clap::Parser;
use sensorlog_hw::{HwmonProvider, ProviderSettings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use config::{Config, Overrides};
use scheduler::{describe_interval, Scheduler};

const RULE: &str = "======================================================================";

#[derive(Parser, Debug)]
#[command(name = "sensorlogd")]
#[command(about = "Log hardware sensor readings to CSV for crash diagnosis")]
#[command(version)]
struct Cli {
    /// Logging interval in seconds (overrides the config file)
    #[arg(short, long, value_name = "SECONDS", allow_negative_numbers = true)]
    interval: Option<i64>,

    /// Output directory for log files (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to the TOML configuration file (default: ./sensorlog.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// hwmon class directory to read sensors from
    #[arg(long, value_name = "DIR")]
    hwmon_root: Option<PathBuf>,

    /// Stop after this many samples instead of running until interrupted
    #[arg(long, value_name = "N")]
    cycles: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            logging_interval: self.interval,
            output_directory: self.output.clone(),
            hwmon_root: self.hwmon_root.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let working_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let mut config = Config::discover(cli.config.as_deref(), &working_dir)?;
    config.apply(&cli.overrides());
    config.validate()?;

    warn_if_unprivileged();

    let provider = HwmonProvider::open(ProviderSettings::from(&config.provider))
        .context("Could not connect to the hardware monitor")?;

    info!("{}", RULE);
    info!("Sensor logger started");
    info!("{}", RULE);
    info!("Logging interval: {}", describe_interval(config.interval()));
    info!(
        "Output directory: {}",
        absolute(&config.output_directory).display()
    );
    info!("Hardware monitor: {}", provider.settings().hwmon_root.display());
    info!("Press Ctrl+C to stop logging");

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down");
            }
        }
        let _ = shutdown_tx.send(());
    });

    let mut scheduler = Scheduler::start(provider, &config.output_directory, config.interval())
        .context("Cannot create the sensor log")?
        .with_cycle_limit(cli.cycles);

    let result = scheduler.run(shutdown_rx).await;
    let log_path = absolute(scheduler.log_path());

    let summary = result.with_context(|| format!("Failed to close {}", log_path.display()))?;
    debug!("Scheduler finished in state {:?}", scheduler.state());
    info!("{}", RULE);
    info!("Logging stopped");
    info!(
        "{} rows in {} cycles ({} without data, {} failed)",
        summary.rows_written, summary.cycles, summary.empty_cycles, summary.failed_cycles
    );
    info!("{}", RULE);
    info!("Log file saved: {}", log_path.display());

    Ok(())
}

/// Some sensors (SMART drive temperatures, some Super I/O chips) are only
/// readable by root.
fn warn_if_unprivileged() {
    // SAFETY: geteuid has no preconditions and cannot fail
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        warn!("Not running as root; some sensors may be unreadable");
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
