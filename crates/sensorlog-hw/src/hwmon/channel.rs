//! hwmon channel attributes.
//!
//! See <https://www.kernel.org/doc/Documentation/hwmon/sysfs-interface> for
//! the attribute naming scheme and fixed-point units.

use crate::SensorCategory;

/// Channel families exposed through hwmon attribute files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum ChannelKind {
    Temp,
    Fan,
    Power,
    Freq,
    In,
    Curr,
    Energy,
    Humidity,
}

impl ChannelKind {
    const ALL: [ChannelKind; 8] = [
        ChannelKind::Temp,
        ChannelKind::Fan,
        ChannelKind::Power,
        ChannelKind::Freq,
        ChannelKind::In,
        ChannelKind::Curr,
        ChannelKind::Energy,
        ChannelKind::Humidity,
    ];

    fn prefix(&self) -> &'static str {
        match self {
            ChannelKind::Temp => "temp",
            ChannelKind::Fan => "fan",
            ChannelKind::Power => "power",
            ChannelKind::Freq => "freq",
            ChannelKind::In => "in",
            ChannelKind::Curr => "curr",
            ChannelKind::Energy => "energy",
            ChannelKind::Humidity => "humidity",
        }
    }

    pub(crate) fn category(&self) -> SensorCategory {
        match self {
            ChannelKind::Temp => SensorCategory::Temperature,
            ChannelKind::Fan => SensorCategory::Fan,
            ChannelKind::Power => SensorCategory::Power,
            ChannelKind::Freq => SensorCategory::Clock,
            ChannelKind::In => SensorCategory::Voltage,
            ChannelKind::Curr => SensorCategory::Current,
            ChannelKind::Energy => SensorCategory::Energy,
            ChannelKind::Humidity => SensorCategory::Humidity,
        }
    }

    /// Divisor from the raw sysfs value to the logged unit.
    fn divisor(&self) -> f64 {
        match self {
            // millidegree Celsius
            ChannelKind::Temp => 1_000.0,
            ChannelKind::Fan => 1.0,
            // microwatt
            ChannelKind::Power => 1_000_000.0,
            // Hz to MHz
            ChannelKind::Freq => 1_000_000.0,
            // millivolt, milliampere, milli-percent RH
            ChannelKind::In | ChannelKind::Curr | ChannelKind::Humidity => 1_000.0,
            // microjoule
            ChannelKind::Energy => 1_000_000.0,
        }
    }
}

/// Attribute holding the value of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueAttribute {
    Input,
    /// Only used by power channels that expose no `_input`.
    Average,
}

impl ValueAttribute {
    fn suffix(&self) -> &'static str {
        match self {
            ValueAttribute::Input => "input",
            ValueAttribute::Average => "average",
        }
    }
}

/// A single channel such as `temp1` or `fan2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Channel {
    pub kind: ChannelKind,
    pub index: u32,
}

impl Channel {
    /// Parses a value attribute file name such as `temp1_input`.
    ///
    /// Returns `None` for limits, alarms, labels and unrelated files.
    pub(crate) fn parse(file_name: &str) -> Option<(Channel, ValueAttribute)> {
        let (stem, attribute) = file_name.split_once('_')?;
        let attribute = match attribute {
            "input" => ValueAttribute::Input,
            "average" => ValueAttribute::Average,
            _ => return None,
        };

        ChannelKind::ALL.iter().find_map(|&kind| {
            let digits = stem.strip_prefix(kind.prefix())?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            if attribute == ValueAttribute::Average && kind != ChannelKind::Power {
                return None;
            }
            let index = digits.parse().ok()?;
            Some((Channel { kind, index }, attribute))
        })
    }

    /// Returns the attribute stem, e.g. `temp1`.
    pub(crate) fn stem(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.index)
    }

    pub(crate) fn value_file(&self, attribute: ValueAttribute) -> String {
        format!("{}_{}", self.stem(), attribute.suffix())
    }

    pub(crate) fn label_file(&self) -> String {
        format!("{}_label", self.stem())
    }

    /// Name used when the driver provides no label, e.g. `Fan #2`.
    pub(crate) fn default_name(&self) -> String {
        format!("{} #{}", self.kind.category(), self.index)
    }

    /// Converts the raw attribute contents to the logged unit.
    pub(crate) fn scale(&self, raw: &str) -> Option<f64> {
        let value: f64 = raw.trim().parse().ok()?;
        Some(value / self.kind.divisor())
    }
}
