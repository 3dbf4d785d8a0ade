//! Hardware device name resolution.
//!
//! Sensors only carry the identifier of the component they belong to. The
//! provider's hardware listing maps identifiers to declared names; when that
//! fails the identifier itself is decoded.

use sensorlog_hw::{HardwareComponent, SensorProvider};
use tracing::warn;

/// Device name used when nothing better is known.
pub const UNKNOWN_DEVICE: &str = "Unknown";

/// Readable names for hardware tokens found in identifiers.
const HARDWARE_NAMES: [(&str, &str); 8] = [
    ("amdgpu", "AMD GPU"),
    ("nvidiagpu", "NVIDIA GPU"),
    ("intelcpu", "Intel CPU"),
    ("amdcpu", "AMD CPU"),
    ("mainboard", "Motherboard"),
    ("ram", "Memory"),
    ("hdd", "Hard Drive"),
    ("nvme", "NVMe SSD"),
];

/// Derives a device name from an identifier like `/amdgpu/0`.
///
/// Unknown hardware tokens are returned upper-cased.
pub fn fallback_name(parent: &str) -> String {
    let Some(token) = parent.split('/').find(|s| !s.is_empty()) else {
        return UNKNOWN_DEVICE.to_string();
    };
    let token = token.to_lowercase();
    HARDWARE_NAMES
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| token.to_uppercase())
}

/// Resolves parent identifiers to device names for one sampling cycle.
///
/// The hardware listing is fetched on first use and kept until the resolver
/// is dropped, so a resolver must not outlive its cycle.
pub struct DeviceNames<'a, P: ?Sized> {
    provider: &'a P,
    listing: Option<Option<Vec<HardwareComponent>>>,
}

impl<'a, P: SensorProvider + ?Sized> DeviceNames<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            listing: None,
        }
    }

    /// Returns the device name owning `parent`. Never fails.
    pub fn resolve(&mut self, parent: &str) -> String {
        if parent.is_empty() {
            return UNKNOWN_DEVICE.to_string();
        }

        self.listing()
            .and_then(|components| components.iter().find(|c| c.identifier == parent))
            .map(|component| component.name.clone())
            .unwrap_or_else(|| fallback_name(parent))
    }

    fn listing(&mut self) -> Option<&[HardwareComponent]> {
        let provider = self.provider;
        self.listing
            .get_or_insert_with(|| match provider.list_hardware() {
                Ok(components) => Some(components),
                Err(e) => {
                    warn!("Hardware listing failed, using identifier names: {}", e);
                    None
                }
            })
            .as_deref()
    }
}
