//! Sample acquisition.

use chrono::NaiveDateTime;
use sensorlog_hw::SensorProvider;
use tracing::{debug, warn};

use crate::record::{capture_time, NormalizedRecord};
use crate::resolver::DeviceNames;

/// Queries a provider and normalizes its readings into log records.
pub struct SampleCollector<P> {
    provider: P,
}

impl<P: SensorProvider> SampleCollector<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Acquires one cycle of records stamped with the current time.
    pub fn acquire(&self) -> Vec<NormalizedRecord> {
        self.acquire_at(capture_time())
    }

    /// Acquires one cycle of records stamped with `timestamp`.
    ///
    /// Never fails: a provider error is logged and yields no records.
    /// Readings outside the logged categories are dropped; readings without
    /// a value are kept.
    pub fn acquire_at(&self, timestamp: NaiveDateTime) -> Vec<NormalizedRecord> {
        let readings = match self.provider.list_sensors() {
            Ok(readings) => readings,
            Err(e) => {
                warn!("Error reading sensors: {}", e);
                return Vec::new();
            }
        };
        let total = readings.len();

        let mut names = DeviceNames::new(&self.provider);
        let records: Vec<NormalizedRecord> = readings
            .into_iter()
            .filter(|reading| reading.category.is_logged())
            .map(|reading| NormalizedRecord {
                timestamp,
                hardware_device: names.resolve(&reading.parent),
                unit: reading.category.unit(),
                sensor_category: reading.category,
                sensor_name: reading.name,
                value: reading.value,
            })
            .collect();

        debug!("Acquired {} of {} sensors", records.len(), total);
        records
    }
}
