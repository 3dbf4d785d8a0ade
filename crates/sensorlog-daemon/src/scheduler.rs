//! Sampling loop.
//!
//! One cycle acquires a snapshot and appends it to the session log. Cycles run
//! back to back with a fixed sleep in between until the shutdown channel
//! fires or the optional cycle limit is reached.

use anyhow::{Context, Result};
use sensorlog_hw::{SensorCategory, SensorProvider};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::collector::SampleCollector;
use crate::log_writer::LogSession;
use crate::record::{capture_time, NormalizedRecord, TIMESTAMP_FORMAT};

/// Temperatures listed in the per-cycle console summary.
const SUMMARY_TEMPERATURES: usize = 5;

/// Lifecycle of a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Initializing,
    Running,
    Stopped,
    Failed,
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub log_path: PathBuf,
    pub cycles: u64,
    /// Cycles that produced no records.
    pub empty_cycles: u64,
    /// Cycles whose records could not be written.
    pub failed_cycles: u64,
    pub rows_written: u64,
}

/// Result of a single cycle that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleOutcome {
    Logged,
    Empty,
}

/// Drives sampling cycles into one log session.
pub struct Scheduler<P> {
    collector: SampleCollector<P>,
    session: LogSession,
    interval: Duration,
    max_cycles: Option<u64>,
    state: SchedulerState,
}

impl<P: SensorProvider> Scheduler<P> {
    /// Opens the log session in `output_dir`.
    ///
    /// Fails if the directory or the log file cannot be created; the loop is
    /// never entered in that case.
    pub fn start(provider: P, output_dir: &Path, interval: Duration) -> Result<Self> {
        let session = LogSession::open(output_dir, capture_time())?;
        Ok(Self {
            collector: SampleCollector::new(provider),
            session,
            interval,
            max_cycles: None,
            state: SchedulerState::Initializing,
        })
    }

    /// Stops after `cycles` cycles instead of waiting for shutdown.
    pub fn with_cycle_limit(mut self, cycles: Option<u64>) -> Self {
        self.max_cycles = cycles;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn log_path(&self) -> &Path {
        self.session.path()
    }

    /// Runs cycles until `shutdown` changes (or its sender is dropped).
    ///
    /// Cycle failures are logged and never end the run. On return the session
    /// has been flushed and closed.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<()>) -> Result<RunSummary> {
        self.state = SchedulerState::Running;
        let mut summary = RunSummary {
            log_path: self.session.path().to_path_buf(),
            cycles: 0,
            empty_cycles: 0,
            failed_cycles: 0,
            rows_written: 0,
        };

        loop {
            if shutdown.has_changed().unwrap_or(true) {
                info!("Shutdown requested, stopping");
                break;
            }

            match self.cycle() {
                Ok(CycleOutcome::Logged) => {}
                Ok(CycleOutcome::Empty) => summary.empty_cycles += 1,
                Err(e) => {
                    summary.failed_cycles += 1;
                    warn!("Cycle error: {:#}", e);
                }
            }
            summary.cycles += 1;

            if self.max_cycles.is_some_and(|max| summary.cycles >= max) {
                info!("Completed {} cycles, stopping", summary.cycles);
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    info!("Shutdown requested, stopping");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        summary.rows_written = self.session.rows_written();
        if let Err(e) = self.session.close() {
            self.state = SchedulerState::Failed;
            return Err(e);
        }
        self.state = SchedulerState::Stopped;
        Ok(summary)
    }

    /// Runs one acquisition and append.
    fn cycle(&mut self) -> Result<CycleOutcome> {
        let records = self.collector.acquire();
        let timestamp = records
            .first()
            .map(|r| r.timestamp)
            .unwrap_or_else(capture_time);
        let stamp = timestamp.format(TIMESTAMP_FORMAT);

        if records.is_empty() {
            warn!("[{}] WARNING: No sensor data available!", stamp);
            return Ok(CycleOutcome::Empty);
        }

        self.session
            .append(&records)
            .with_context(|| format!("[{}] Failed to log {} sensors", stamp, records.len()))?;

        info!("[{}] {}", stamp, cycle_summary(&records));
        Ok(CycleOutcome::Logged)
    }
}

/// One-line console summary of a logged cycle.
pub fn cycle_summary(records: &[NormalizedRecord]) -> String {
    let temperatures: Vec<&NormalizedRecord> = records
        .iter()
        .filter(|r| r.sensor_category == SensorCategory::Temperature)
        .collect();

    if temperatures.is_empty() {
        return format!("Logged {} sensors", records.len());
    }

    let listed: Vec<String> = temperatures
        .iter()
        .take(SUMMARY_TEMPERATURES)
        .map(|r| {
            let value = r
                .value
                .map(|v| format!("{:.1}{}", v, r.unit))
                .unwrap_or_else(|| "n/a".to_string());
            format!("{}: {}", r.sensor_name, value)
        })
        .collect();

    format!(
        "Logged {} sensors ({} temperatures) - {}",
        records.len(),
        temperatures.len(),
        listed.join(", ")
    )
}

/// Formats a duration given in whole seconds for the startup banner.
pub fn describe_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs == 1 {
        "1 second".to_string()
    } else {
        format!("{} seconds", secs)
    }
}
