//! Linux hwmon provider.
//!
//! Reads chips and channels from `/sys/class/hwmon` and CPU load from
//! `/proc/stat`.

mod channel;
mod chip;
mod provider;

pub use provider::{
    HwmonProvider, ProviderSettings, CPU_IDENTIFIER, DEFAULT_HWMON_ROOT, DEFAULT_PROC_ROOT,
};
