//! Error types for the sensorlog hardware library.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when querying a sensor provider.
#[derive(Error, Debug)]
pub enum Error {
    /// The hardware monitor interface is missing or could not be opened.
    #[error(
        "hardware monitor not available at {path}: {source} \
         (ensure the hwmon drivers are loaded and sysfs is mounted)"
    )]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The process may not read the hardware monitor interface.
    #[error("permission denied reading {0} (try running with elevated privileges)")]
    PermissionDenied(PathBuf),

    /// Any other I/O failure while querying the provider.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A sensor category name that is not recognised.
    #[error("Invalid sensor category: {0}")]
    InvalidCategory(String),

    /// Provider-reported query failure.
    #[error("Sensor query failed: {0}")]
    Query(String),
}

impl Error {
    /// Classifies an I/O error raised while reading `path`.
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Error::Unavailable {
                path: path.to_path_buf(),
                source,
            },
            _ => Error::Io(source),
        }
    }
}
