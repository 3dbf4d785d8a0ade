//! Sensor provider backed by the Linux hwmon sysfs interface.

use super::chip::{self, Chip};
use crate::cpu::{self, CpuLoad};
use crate::{HardwareComponent, Result, SensorCategory, SensorProvider, SensorReading};
use std::path::PathBuf;
use tracing::{debug, info};

/// Default location of the hwmon class directory.
pub const DEFAULT_HWMON_ROOT: &str = "/sys/class/hwmon";

/// Default procfs mount point.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Identifier of the CPU component owning the load sensors.
pub const CPU_IDENTIFIER: &str = "/cpu/0";

/// Where the provider reads from.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub hwmon_root: PathBuf,
    pub proc_root: PathBuf,
    /// Report CPU load sensors computed from `/proc/stat`.
    pub cpu_load: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            hwmon_root: PathBuf::from(DEFAULT_HWMON_ROOT),
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            cpu_load: true,
        }
    }
}

/// Hardware monitor reading `/sys/class/hwmon`.
///
/// Chips are rescanned on every query so hot-plugged devices appear and
/// disappear without a restart.
pub struct HwmonProvider {
    settings: ProviderSettings,
    cpu_model: Option<String>,
    cpu_load: Option<CpuLoad>,
}

impl HwmonProvider {
    /// Opens the provider, failing if the hwmon root cannot be read.
    pub fn open(settings: ProviderSettings) -> Result<Self> {
        let root = &settings.hwmon_root;
        let chips = chip::discover(root)?;
        info!(
            "Hardware monitor opened at {} ({} chips)",
            root.display(),
            chips.len()
        );

        let cpu_model = cpu::read_cpu_model(&settings.proc_root);
        let cpu_load = settings
            .cpu_load
            .then(|| CpuLoad::new(&settings.proc_root));
        if let Some(model) = &cpu_model {
            debug!("CPU model: {}", model);
        }

        Ok(Self {
            settings,
            cpu_model,
            cpu_load,
        })
    }

    /// Returns the provider settings.
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn chip_readings(&self, chip: &Chip, readings: &mut Vec<SensorReading>) {
        let channels = match chip.channels() {
            Ok(channels) => channels,
            Err(e) => {
                // The chip may have been removed between discovery and now.
                debug!("Skipping chip {}: {}", chip.path.display(), e);
                return;
            }
        };

        for (channel, attribute) in channels {
            let category = channel.kind.category();
            readings.push(SensorReading {
                name: chip.channel_name(&channel),
                category,
                value: chip.read_value(&channel, attribute),
                identifier: format!(
                    "{}/{}/{}",
                    chip.identifier,
                    category.as_str().to_lowercase(),
                    channel.index
                ),
                parent: chip.identifier.clone(),
            });
        }
    }

    fn load_readings(&self, readings: &mut Vec<SensorReading>) {
        let Some(cpu_load) = &self.cpu_load else {
            return;
        };
        let Some(samples) = cpu_load.sample() else {
            debug!(
                "CPU load unavailable: cannot read {}",
                self.settings.proc_root.join("stat").display()
            );
            return;
        };

        for sample in samples {
            let slot = sample.index.map(|n| n + 1).unwrap_or(0);
            readings.push(SensorReading {
                name: sample.name,
                category: SensorCategory::Load,
                value: sample.load,
                identifier: format!("{}/load/{}", CPU_IDENTIFIER, slot),
                parent: CPU_IDENTIFIER.to_string(),
            });
        }
    }
}

impl SensorProvider for HwmonProvider {
    fn list_sensors(&self) -> Result<Vec<SensorReading>> {
        let chips = chip::discover(&self.settings.hwmon_root)?;

        let mut readings = Vec::new();
        for chip in &chips {
            self.chip_readings(chip, &mut readings);
        }
        self.load_readings(&mut readings);

        Ok(readings)
    }

    fn list_hardware(&self) -> Result<Vec<HardwareComponent>> {
        let chips = chip::discover(&self.settings.hwmon_root)?;

        let mut components: Vec<HardwareComponent> = chips
            .into_iter()
            .filter_map(|chip| {
                let name = match &chip.model {
                    Some(model) => Some(model.clone()),
                    None if chip.is_cpu() => self.cpu_model.clone(),
                    None => None,
                }?;
                Some(HardwareComponent::new(chip.identifier, name))
            })
            .collect();

        if self.cpu_load.is_some() {
            if let Some(model) = &self.cpu_model {
                components.push(HardwareComponent::new(CPU_IDENTIFIER, model.clone()));
            }
        }

        Ok(components)
    }
}

impl std::fmt::Debug for HwmonProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HwmonProvider")
            .field("settings", &self.settings)
            .field("cpu_model", &self.cpu_model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct FakeSysfs {
        dir: TempDir,
    }

    impl FakeSysfs {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("hwmon")).unwrap();
            fs::create_dir_all(dir.path().join("proc")).unwrap();
            Self { dir }
        }

        fn chip(&self, name: &str, driver: &str, files: &[(&str, &str)]) -> PathBuf {
            let path = self.dir.path().join("hwmon").join(name);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join("name"), driver).unwrap();
            for (file, contents) in files {
                let file = path.join(file);
                fs::create_dir_all(file.parent().unwrap()).unwrap();
                fs::write(file, contents).unwrap();
            }
            path
        }

        fn proc_file(&self, name: &str, contents: &str) {
            fs::write(self.dir.path().join("proc").join(name), contents).unwrap();
        }

        fn settings(&self, cpu_load: bool) -> ProviderSettings {
            ProviderSettings {
                hwmon_root: self.dir.path().join("hwmon"),
                proc_root: self.dir.path().join("proc"),
                cpu_load,
            }
        }
    }

    fn find<'a>(readings: &'a [SensorReading], identifier: &str) -> &'a SensorReading {
        readings
            .iter()
            .find(|r| r.identifier == identifier)
            .unwrap_or_else(|| panic!("no reading {}", identifier))
    }

    #[test]
    fn test_open_missing_root() {
        let err = HwmonProvider::open(ProviderSettings {
            hwmon_root: PathBuf::from("/nonexistent/hwmon"),
            ..ProviderSettings::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("hardware monitor not available"));
    }

    #[test]
    fn test_list_sensors() {
        let sysfs = FakeSysfs::new();
        sysfs.chip(
            "hwmon0",
            "amdgpu",
            &[
                ("temp1_input", "45000\n"),
                ("temp1_label", "edge\n"),
                ("fan1_input", "1200\n"),
                ("power1_average", "35000000\n"),
                ("freq1_input", "1800000000\n"),
                ("in0_input", "850\n"),
            ],
        );
        sysfs.chip("hwmon1", "nvme", &[("temp1_input", "38850")]);

        let provider = HwmonProvider::open(sysfs.settings(false)).unwrap();
        let readings = provider.list_sensors().unwrap();
        assert_eq!(readings.len(), 6);

        let edge = find(&readings, "/amdgpu/0/temperature/1");
        assert_eq!(edge.name, "edge");
        assert_eq!(edge.category, SensorCategory::Temperature);
        assert_eq!(edge.value, Some(45.0));
        assert_eq!(edge.parent, "/amdgpu/0");

        let fan = find(&readings, "/amdgpu/0/fan/1");
        assert_eq!(fan.name, "Fan #1");
        assert_eq!(fan.value, Some(1200.0));

        assert_eq!(find(&readings, "/amdgpu/0/power/1").value, Some(35.0));
        assert_eq!(find(&readings, "/amdgpu/0/clock/1").value, Some(1800.0));
        assert_eq!(
            find(&readings, "/amdgpu/0/voltage/0").category,
            SensorCategory::Voltage
        );
        assert_eq!(find(&readings, "/nvme/0/temperature/1").value, Some(38.85));
    }

    #[test]
    fn test_unreadable_value_is_none() {
        let sysfs = FakeSysfs::new();
        sysfs.chip("hwmon0", "drivetemp", &[("temp1_input", "")]);

        let provider = HwmonProvider::open(sysfs.settings(false)).unwrap();
        let readings = provider.list_sensors().unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].value, None);
        assert_eq!(readings[0].parent, "/hdd/0");
    }

    #[test]
    fn test_root_removed_after_open() {
        let sysfs = FakeSysfs::new();
        let provider = HwmonProvider::open(sysfs.settings(false)).unwrap();
        fs::remove_dir_all(sysfs.dir.path().join("hwmon")).unwrap();
        assert!(provider.list_sensors().is_err());
        assert!(provider.list_hardware().is_err());
    }

    #[test]
    fn test_cpu_load_readings() {
        let sysfs = FakeSysfs::new();
        sysfs.proc_file("stat", "cpu  1 0 1 8 0 0 0 0 0 0\ncpu0 1 0 1 8 0 0 0 0 0 0\n");

        let provider = HwmonProvider::open(sysfs.settings(true)).unwrap();
        let readings = provider.list_sensors().unwrap();
        assert_eq!(readings.len(), 2);
        let total = find(&readings, "/cpu/0/load/0");
        assert_eq!(total.name, "CPU Total");
        assert_eq!(total.category, SensorCategory::Load);
        assert_eq!(total.value, None);
        assert_eq!(find(&readings, "/cpu/0/load/1").name, "CPU Core #1");
    }

    #[test]
    fn test_list_hardware() {
        let sysfs = FakeSysfs::new();
        sysfs.proc_file("cpuinfo", "model name\t: Intel(R) Core(TM) i7-12700K\n");
        sysfs.chip("hwmon0", "coretemp", &[("temp1_input", "50000")]);
        sysfs.chip(
            "hwmon1",
            "nvme",
            &[("temp1_input", "40000"), ("device/model", "WD Black SN850\n")],
        );
        sysfs.chip("hwmon2", "acpitz", &[("temp1_input", "27800")]);

        let provider = HwmonProvider::open(sysfs.settings(true)).unwrap();
        let hardware = provider.list_hardware().unwrap();
        assert_eq!(
            hardware,
            vec![
                HardwareComponent::new("/intelcpu/0", "Intel(R) Core(TM) i7-12700K"),
                HardwareComponent::new("/nvme/0", "WD Black SN850"),
                HardwareComponent::new(CPU_IDENTIFIER, "Intel(R) Core(TM) i7-12700K"),
            ]
        );
    }
}
