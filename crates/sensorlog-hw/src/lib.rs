//! sensorlog hardware library
//!
//! Provides read-only access to hardware sensors (temperature, load, clock,
//! fan, power) through the [`SensorProvider`] trait, with a Linux hwmon
//! implementation.

mod cpu;
pub mod category;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod fake;
pub mod hwmon;
pub mod provider;

pub use category::SensorCategory;
pub use error::{Error, Result};
pub use hwmon::{HwmonProvider, ProviderSettings};
pub use provider::{HardwareComponent, SensorProvider, SensorReading};
