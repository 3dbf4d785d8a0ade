//! CSV sensor log.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::record::{NormalizedRecord, HEADER};

/// File name timestamp format (`temp_log_20240501_134509.csv`).
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Returns the log file name for a session started at `started`.
pub fn log_file_name(started: NaiveDateTime) -> String {
    format!("temp_log_{}.csv", started.format(FILE_STAMP_FORMAT))
}

/// An open sensor log.
///
/// Rows use CRLF line endings and quote fields only when needed.
///
/// Every row is flushed to the file before [`LogSession::append`] returns, so
/// a crash loses at most the cycle being written.
#[derive(Debug)]
pub struct LogSession {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    rows_written: u64,
}

impl LogSession {
    /// Creates `dir` if needed and starts a new log file with its header.
    pub fn open(dir: &Path, started: NaiveDateTime) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let path = dir.join(log_file_name(started));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);
        writer
            .write_record(HEADER)
            .with_context(|| format!("Failed to write header to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;

        info!("Created log file: {}", path.display());
        Ok(Self {
            path,
            writer: Some(writer),
            rows_written: 0,
        })
    }

    /// Appends one row per record and flushes.
    pub fn append(&mut self, records: &[NormalizedRecord]) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .with_context(|| format!("Log file {} is closed", self.path.display()))?;

        for record in records {
            writer
                .write_record(record.fields())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
            self.rows_written += 1;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;

        debug!("Appended {} rows to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Flushes and releases the file. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Returns the path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
