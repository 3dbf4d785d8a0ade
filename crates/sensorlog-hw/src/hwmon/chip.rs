//! hwmon chip discovery.

use super::channel::{Channel, ValueAttribute};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A `hwmonN` directory and the hardware component it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct Chip {
    pub path: PathBuf,
    /// Driver name from the `name` attribute, e.g. `k10temp`.
    pub driver: String,
    /// Component identifier, e.g. `/amdcpu/0`.
    pub identifier: String,
    /// Model declared by the device, if any.
    pub model: Option<String>,
}

impl Chip {
    /// Returns true for chips that report CPU package sensors.
    pub(crate) fn is_cpu(&self) -> bool {
        matches!(hardware_token(&self.driver).as_str(), "intelcpu" | "amdcpu")
    }

    /// Lists the value attribute of every channel on this chip.
    ///
    /// When a power channel exposes both `_input` and `_average`, the
    /// instantaneous `_input` wins.
    pub(crate) fn channels(&self) -> Result<BTreeMap<Channel, ValueAttribute>> {
        let entries = fs::read_dir(&self.path).map_err(|e| Error::from_io(&self.path, e))?;

        let mut channels = BTreeMap::new();
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some((channel, attribute)) = Channel::parse(&file_name.to_string_lossy()) else {
                continue;
            };
            match attribute {
                ValueAttribute::Input => {
                    channels.insert(channel, attribute);
                }
                ValueAttribute::Average => {
                    channels.entry(channel).or_insert(attribute);
                }
            }
        }
        Ok(channels)
    }

    /// Reads and scales the current value of a channel.
    pub(crate) fn read_value(&self, channel: &Channel, attribute: ValueAttribute) -> Option<f64> {
        let path = self.path.join(channel.value_file(attribute));
        match fs::read_to_string(&path) {
            Ok(raw) => channel.scale(&raw),
            Err(e) => {
                // Offline sensors commonly fail reads with ENODATA or EIO.
                debug!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Returns the driver-provided label of a channel, or its default name.
    pub(crate) fn channel_name(&self, channel: &Channel) -> String {
        read_trimmed(&self.path.join(channel.label_file()))
            .unwrap_or_else(|| channel.default_name())
    }
}

/// Maps a hwmon driver name to the hardware token used in identifiers.
pub(crate) fn hardware_token(driver: &str) -> String {
    let driver = driver.to_lowercase();
    let token = match driver.as_str() {
        "coretemp" => "intelcpu",
        "k10temp" | "zenpower" | "fam15h_power" => "amdcpu",
        "amdgpu" | "radeon" => "amdgpu",
        "nouveau" | "nvidia" => "nvidiagpu",
        "nvme" => "nvme",
        "drivetemp" => "hdd",
        "jc42" | "spd5118" => "ram",
        "it87" | "gigabyte_wmi" => "mainboard",
        d if d.starts_with("nct") || d.starts_with("asus") => "mainboard",
        _ => return driver,
    };
    token.to_string()
}

/// Discovers all chips below `root`, ordered by `hwmonN` index.
pub(crate) fn discover(root: &Path) -> Result<Vec<Chip>> {
    let entries = fs::read_dir(root).map_err(|e| Error::from_io(root, e))?;

    let mut dirs: Vec<(u32, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            let index = name.strip_prefix("hwmon")?.parse().ok()?;
            Some((index, entry.path()))
        })
        .collect();
    dirs.sort();

    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut chips = Vec::with_capacity(dirs.len());
    for (_, path) in dirs {
        let Some(driver) = read_trimmed(&path.join("name")) else {
            debug!("Skipping {} without a name attribute", path.display());
            continue;
        };
        let token = hardware_token(&driver);
        let counter = counters.entry(token.clone()).or_insert(0);
        let identifier = format!("/{}/{}", token, counter);
        *counter += 1;

        let model = read_trimmed(&path.join("device").join("model"));
        chips.push(Chip {
            path,
            driver,
            identifier,
            model,
        });
    }

    Ok(chips)
}

/// Reads a sysfs attribute, returning `None` when missing or blank.
fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn add_chip(root: &Path, dir: &str, driver: &str) -> PathBuf {
        let path = root.join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("name"), format!("{}\n", driver)).unwrap();
        path
    }

    #[test]
    fn test_hardware_token() {
        assert_eq!(hardware_token("coretemp"), "intelcpu");
        assert_eq!(hardware_token("k10temp"), "amdcpu");
        assert_eq!(hardware_token("amdgpu"), "amdgpu");
        assert_eq!(hardware_token("nct6798"), "mainboard");
        assert_eq!(hardware_token("drivetemp"), "hdd");
        assert_eq!(hardware_token("acpitz"), "acpitz");
    }

    #[test]
    fn test_discover_orders_and_numbers_chips() {
        let root = TempDir::new().unwrap();
        add_chip(root.path(), "hwmon10", "nvme");
        add_chip(root.path(), "hwmon2", "nvme");
        add_chip(root.path(), "hwmon0", "k10temp");
        fs::create_dir_all(root.path().join("hwmon5")).unwrap();
        fs::write(root.path().join("unrelated"), "x").unwrap();

        let chips = discover(root.path()).unwrap();
        let ids: Vec<&str> = chips.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(ids, ["/amdcpu/0", "/nvme/0", "/nvme/1"]);
        assert!(chips[2].path.ends_with("hwmon10"));
        assert!(chips[0].is_cpu());
        assert!(!chips[1].is_cpu());
    }

    #[test]
    fn test_discover_reads_model() {
        let root = TempDir::new().unwrap();
        let path = add_chip(root.path(), "hwmon0", "nvme");
        fs::create_dir_all(path.join("device")).unwrap();
        fs::write(path.join("device/model"), "Samsung SSD 980 PRO 1TB  \n").unwrap();

        let chips = discover(root.path()).unwrap();
        assert_eq!(chips[0].model.as_deref(), Some("Samsung SSD 980 PRO 1TB"));
    }

    #[test]
    fn test_discover_missing_root() {
        let root = TempDir::new().unwrap();
        let err = discover(&root.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::Unavailable { .. }));
    }

    #[test]
    fn test_channels_prefer_input() {
        let root = TempDir::new().unwrap();
        let path = add_chip(root.path(), "hwmon0", "amdgpu");
        for file in ["temp1_input", "temp1_crit", "power1_average", "power1_input", "power2_average"] {
            fs::write(path.join(file), "1").unwrap();
        }

        let chip = discover(root.path()).unwrap().remove(0);
        let channels: Vec<_> = chip.channels().unwrap().into_iter().collect();
        assert_eq!(channels.len(), 3);
        assert_eq!(channels[1].0.stem(), "power1");
        assert_eq!(channels[1].1, ValueAttribute::Input);
        assert_eq!(channels[2].0.stem(), "power2");
        assert_eq!(channels[2].1, ValueAttribute::Average);
    }
}
