//! Scripted in-memory provider for tests.

use crate::{Error, HardwareComponent, Result, SensorCategory, SensorProvider, SensorReading};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Provider that replays queued responses.
///
/// Each `list_sensors` call pops the next scripted response; an exhausted
/// script reports a query failure. The hardware listing is fixed unless
/// [`FakeProvider::fail_hardware`] was set.
#[derive(Debug, Default)]
pub struct FakeProvider {
    sensors: Mutex<VecDeque<std::result::Result<Vec<SensorReading>, String>>>,
    hardware: Vec<HardwareComponent>,
    hardware_fails: bool,
    sensor_queries: AtomicUsize,
    hardware_queries: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hardware listing.
    pub fn with_hardware(mut self, hardware: Vec<HardwareComponent>) -> Self {
        self.hardware = hardware;
        self
    }

    /// Makes every hardware listing fail.
    pub fn fail_hardware(mut self) -> Self {
        self.hardware_fails = true;
        self
    }

    /// Queues a successful sensor snapshot.
    pub fn push_sensors(&self, readings: Vec<SensorReading>) -> &Self {
        self.script().push_back(Ok(readings));
        self
    }

    /// Queues a failing sensor query.
    pub fn push_failure(&self, message: &str) -> &Self {
        self.script().push_back(Err(message.to_string()));
        self
    }

    /// Number of `list_sensors` calls so far.
    pub fn sensor_queries(&self) -> usize {
        self.sensor_queries.load(Ordering::SeqCst)
    }

    /// Number of `list_hardware` calls so far.
    pub fn hardware_queries(&self) -> usize {
        self.hardware_queries.load(Ordering::SeqCst)
    }

    fn script(
        &self,
    ) -> std::sync::MutexGuard<'_, VecDeque<std::result::Result<Vec<SensorReading>, String>>> {
        self.sensors.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SensorProvider for FakeProvider {
    fn list_sensors(&self) -> Result<Vec<SensorReading>> {
        self.sensor_queries.fetch_add(1, Ordering::SeqCst);
        match self.script().pop_front() {
            Some(Ok(readings)) => Ok(readings),
            Some(Err(message)) => Err(Error::Query(message)),
            None => Err(Error::Query("no scripted response".to_string())),
        }
    }

    fn list_hardware(&self) -> Result<Vec<HardwareComponent>> {
        self.hardware_queries.fetch_add(1, Ordering::SeqCst);
        if self.hardware_fails {
            return Err(Error::Query("hardware listing unavailable".to_string()));
        }
        Ok(self.hardware.clone())
    }
}

/// Builds a reading whose identifier is derived from its parent and name.
pub fn reading(
    name: &str,
    category: SensorCategory,
    value: Option<f64>,
    parent: &str,
) -> SensorReading {
    SensorReading {
        name: name.to_string(),
        category,
        value,
        identifier: format!(
            "{}/{}/{}",
            parent,
            category.as_str().to_lowercase(),
            name.to_lowercase().replace(' ', "_")
        ),
        parent: parent.to_string(),
    }
}
