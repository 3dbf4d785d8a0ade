//! Configuration management.
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags, the TOML config file, built-in defaults.

use anyhow::{bail, Context, Result};
use sensorlog_hw::hwmon::{DEFAULT_HWMON_ROOT, DEFAULT_PROC_ROOT};
use sensorlog_hw::ProviderSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "sensorlog.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seconds between two samples (at least 1)
    #[serde(default = "default_interval")]
    pub logging_interval: i64,

    /// Directory receiving the log files
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// Sensor provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Hardware monitor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// hwmon class directory
    #[serde(default = "default_hwmon_root")]
    pub hwmon_root: PathBuf,

    /// procfs mount point, used for CPU load and model
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,

    /// Log CPU load computed from /proc/stat
    #[serde(default = "default_cpu_load")]
    pub cpu_load: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hwmon_root: default_hwmon_root(),
            proc_root: default_proc_root(),
            cpu_load: default_cpu_load(),
        }
    }
}

impl From<&ProviderConfig> for ProviderSettings {
    fn from(config: &ProviderConfig) -> Self {
        ProviderSettings {
            hwmon_root: config.hwmon_root.clone(),
            proc_root: config.proc_root.clone(),
            cpu_load: config.cpu_load,
        }
    }
}

/// Values given on the command line; `None` keeps the lower layers.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub logging_interval: Option<i64>,
    pub output_directory: Option<PathBuf>,
    pub hwmon_root: Option<PathBuf>,
}

// Default value functions
fn default_interval() -> i64 {
    10
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_hwmon_root() -> PathBuf {
    PathBuf::from(DEFAULT_HWMON_ROOT)
}

fn default_proc_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROC_ROOT)
}

fn default_cpu_load() -> bool {
    true
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Finds the configuration for this run.
    ///
    /// An explicit path must load. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used if present; a broken default file is reported and ignored.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::load(path)
                .with_context(|| format!("Cannot use config file {}", path.display()))?;
            info!("Loaded configuration from: {}", path.display());
            return Ok(config);
        }

        let path = working_dir.join(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded configuration from: {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!(
                    "Could not read config file {}: {:#}. Using default settings",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Applies command-line values on top of this configuration.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(interval) = overrides.logging_interval {
            self.logging_interval = interval;
        }
        if let Some(dir) = &overrides.output_directory {
            self.output_directory = dir.clone();
        }
        if let Some(root) = &overrides.hwmon_root {
            self.provider.hwmon_root = root.clone();
        }
    }

    /// Rejects settings the logger cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.logging_interval < 1 {
            bail!(
                "Interval must be at least 1 second (got {})",
                self.logging_interval
            );
        }
        if self.output_directory.as_os_str().is_empty() {
            bail!("Output directory must not be empty");
        }
        Ok(())
    }

    /// Returns the sampling interval, never shorter than one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.logging_interval.max(1).unsigned_abs())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging_interval: default_interval(),
            output_directory: default_output_directory(),
            provider: ProviderConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.logging_interval, 10);
        assert_eq!(config.output_directory, PathBuf::from("logs"));
        assert_eq!(config.provider.hwmon_root, PathBuf::from("/sys/class/hwmon"));
        assert!(config.provider.cpu_load);
        assert_eq!(config.interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("logging_interval = 30\n").unwrap();
        assert_eq!(config.logging_interval, 30);
        assert_eq!(config.output_directory, PathBuf::from("logs"));
        assert_eq!(config.provider.proc_root, PathBuf::from("/proc"));
    }

    #[test]
    fn test_provider_table() {
        let config: Config = toml::from_str(
            "output_directory = \"/var/log/sensors\"\n\
             [provider]\n\
             hwmon_root = \"/tmp/hwmon\"\n\
             cpu_load = false\n",
        )
        .unwrap();
        assert_eq!(config.output_directory, PathBuf::from("/var/log/sensors"));
        let settings = ProviderSettings::from(&config.provider);
        assert_eq!(settings.hwmon_root, PathBuf::from("/tmp/hwmon"));
        assert!(!settings.cpu_load);
    }

    #[test]
    fn test_command_line_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "logging_interval = 30\noutput_directory = \"from_file\"\n",
        )
        .unwrap();

        let mut config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.logging_interval, 30);

        config.apply(&Overrides {
            logging_interval: Some(5),
            ..Overrides::default()
        });
        assert_eq!(config.logging_interval, 5);
        assert_eq!(config.output_directory, PathBuf::from("from_file"));
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.logging_interval, 10);
    }

    #[test]
    fn test_broken_default_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "logging_interval = \"soon\"").unwrap();
        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.logging_interval, 10);
    }

    #[test]
    fn test_negative_interval_in_default_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "logging_interval = -5\noutput_directory = \"from_file\"\n",
        )
        .unwrap();

        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.logging_interval, -5);
        assert_eq!(config.output_directory, PathBuf::from("from_file"));

        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Interval must be at least 1 second (got -5)");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(Config::discover(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_validate_interval() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.logging_interval = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least 1 second"));

        config.apply(&Overrides {
            logging_interval: Some(-3),
            ..Overrides::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_output_directory() {
        let mut config = Config::default();
        config.apply(&Overrides {
            output_directory: Some(PathBuf::new()),
            ..Overrides::default()
        });
        assert!(config.validate().is_err());
    }
}
