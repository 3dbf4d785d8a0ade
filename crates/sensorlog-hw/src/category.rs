//! Sensor categories.
//!
//! Providers expose many kinds of sensors. Only five of them end up in the
//! log; the rest are visible to callers but filtered out before persistence.

use crate::{Error, Result};
use std::str::FromStr;

/// Category of a hardware sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorCategory {
    Temperature,
    Load,
    Clock,
    Fan,
    Power,
    Voltage,
    Current,
    Energy,
    Humidity,
    Flow,
    Control,
    Level,
}

impl SensorCategory {
    /// Categories written to the sensor log.
    pub const LOGGED: [SensorCategory; 5] = [
        SensorCategory::Temperature,
        SensorCategory::Load,
        SensorCategory::Clock,
        SensorCategory::Fan,
        SensorCategory::Power,
    ];

    /// Returns true if readings of this category belong in the log.
    pub fn is_logged(&self) -> bool {
        Self::LOGGED.contains(self)
    }

    /// Returns the unit recorded next to values of this category.
    ///
    /// Categories that are never logged have no unit.
    pub fn unit(&self) -> &'static str {
        match self {
            SensorCategory::Temperature => "°C",
            SensorCategory::Load => "%",
            SensorCategory::Clock => "MHz",
            SensorCategory::Fan => "RPM",
            SensorCategory::Power => "W",
            _ => "",
        }
    }

    /// Returns the category name as written in the log.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorCategory::Temperature => "Temperature",
            SensorCategory::Load => "Load",
            SensorCategory::Clock => "Clock",
            SensorCategory::Fan => "Fan",
            SensorCategory::Power => "Power",
            SensorCategory::Voltage => "Voltage",
            SensorCategory::Current => "Current",
            SensorCategory::Energy => "Energy",
            SensorCategory::Humidity => "Humidity",
            SensorCategory::Flow => "Flow",
            SensorCategory::Control => "Control",
            SensorCategory::Level => "Level",
        }
    }
}

impl FromStr for SensorCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "temperature" => Ok(SensorCategory::Temperature),
            "load" => Ok(SensorCategory::Load),
            "clock" => Ok(SensorCategory::Clock),
            "fan" => Ok(SensorCategory::Fan),
            "power" => Ok(SensorCategory::Power),
            "voltage" => Ok(SensorCategory::Voltage),
            "current" => Ok(SensorCategory::Current),
            "energy" => Ok(SensorCategory::Energy),
            "humidity" => Ok(SensorCategory::Humidity),
            "flow" => Ok(SensorCategory::Flow),
            "control" => Ok(SensorCategory::Control),
            "level" => Ok(SensorCategory::Level),
            _ => Err(Error::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for SensorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(SensorCategory::Temperature.unit(), "°C");
        assert_eq!(SensorCategory::Load.unit(), "%");
        assert_eq!(SensorCategory::Clock.unit(), "MHz");
        assert_eq!(SensorCategory::Fan.unit(), "RPM");
        assert_eq!(SensorCategory::Power.unit(), "W");
        assert_eq!(SensorCategory::Voltage.unit(), "");
        assert_eq!(SensorCategory::Humidity.unit(), "");
    }

    #[test]
    fn test_is_logged() {
        for category in SensorCategory::LOGGED {
            assert!(category.is_logged());
            assert!(!category.unit().is_empty());
        }
        assert!(!SensorCategory::Voltage.is_logged());
        assert!(!SensorCategory::Current.is_logged());
        assert!(!SensorCategory::Control.is_logged());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "Temperature".parse::<SensorCategory>().unwrap(),
            SensorCategory::Temperature
        );
        assert_eq!("fan".parse::<SensorCategory>().unwrap(), SensorCategory::Fan);
        assert!("SmallData".parse::<SensorCategory>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(SensorCategory::Clock.to_string(), "Clock");
        assert_eq!(SensorCategory::Power.to_string(), "Power");
    }
}
