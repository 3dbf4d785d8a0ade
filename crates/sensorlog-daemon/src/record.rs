//! Normalized sensor records.

use chrono::{Local, NaiveDateTime, Timelike};
use sensorlog_hw::SensorCategory;

/// Row timestamp format (`2024-05-01 13:45:09`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column names of the sensor log, in row order.
pub const HEADER: [&str; 6] = [
    "Timestamp",
    "Hardware_Device",
    "Sensor_Name",
    "Sensor_Type",
    "Value",
    "Unit",
];

/// One sensor sample in the shape persisted to the log.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub timestamp: NaiveDateTime,
    pub hardware_device: String,
    pub sensor_name: String,
    pub sensor_category: SensorCategory,
    pub value: Option<f64>,
    pub unit: &'static str,
}

impl NormalizedRecord {
    /// Returns the row fields in [`HEADER`] order.
    pub fn fields(&self) -> [String; 6] {
        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.hardware_device.clone(),
            self.sensor_name.clone(),
            self.sensor_category.to_string(),
            self.value.map(format_value).unwrap_or_default(),
            self.unit.to_string(),
        ]
    }
}

/// Returns the current local time truncated to whole seconds.
pub fn capture_time() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Formats a value in natural decimal form.
///
/// Integral values keep one decimal place (`45.0`), everything else uses the
/// shortest representation that round-trips (`45.25`).
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
