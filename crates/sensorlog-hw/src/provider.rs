//! Sensor provider interface.

use crate::{Result, SensorCategory};

/// A raw sensor reading as reported by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Display name (not unique across the machine).
    pub name: String,
    pub category: SensorCategory,
    /// Current value, `None` when the sensor produced nothing this time.
    pub value: Option<f64>,
    /// Identifier unique within the provider, e.g. `/amdgpu/0/temperature/1`.
    pub identifier: String,
    /// Identifier of the owning hardware component, e.g. `/amdgpu/0`.
    pub parent: String,
}

/// A hardware component that owns sensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareComponent {
    pub identifier: String,
    pub name: String,
}

impl HardwareComponent {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
        }
    }
}

/// Read-only access to a hardware monitoring provider.
///
/// Both queries reflect the provider's state at call time and may fail
/// transiently; callers decide how to degrade.
pub trait SensorProvider: Send + Sync {
    /// Returns every sensor currently exposed by the provider.
    fn list_sensors(&self) -> Result<Vec<SensorReading>>;

    /// Returns the hardware components currently known to the provider.
    fn list_hardware(&self) -> Result<Vec<HardwareComponent>>;
}

impl<P: SensorProvider + ?Sized> SensorProvider for &P {
    fn list_sensors(&self) -> Result<Vec<SensorReading>> {
        (**self).list_sensors()
    }

    fn list_hardware(&self) -> Result<Vec<HardwareComponent>> {
        (**self).list_hardware()
    }
}
