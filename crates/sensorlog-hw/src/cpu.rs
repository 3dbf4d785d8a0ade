//! CPU load sampling from `/proc/stat`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Computes per-CPU load from successive `/proc/stat` snapshots.
///
/// Load is a delta between two reads, so the first sample of each CPU has no
/// value.
pub(crate) struct CpuLoad {
    stat_path: PathBuf,
    last: Mutex<HashMap<String, (u64, u64)>>,
}

/// Load of one `cpu*` line, with its display name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CpuLoadSample {
    pub name: String,
    pub index: Option<u32>,
    pub load: Option<f64>,
}

impl CpuLoad {
    pub(crate) fn new(proc_root: &Path) -> Self {
        Self {
            stat_path: proc_root.join("stat"),
            last: Mutex::new(HashMap::new()),
        }
    }

    /// Samples every CPU line. Returns `None` if `/proc/stat` is unreadable.
    pub(crate) fn sample(&self) -> Option<Vec<CpuLoadSample>> {
        let content = fs::read_to_string(&self.stat_path).ok()?;
        let stats = parse_stat(&content);

        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let samples = stats
            .into_iter()
            .map(|(key, idle, total)| {
                let load = last.get(&key).and_then(|&(last_idle, last_total)| {
                    let idle_delta = idle.saturating_sub(last_idle);
                    let total_delta = total.saturating_sub(last_total);
                    (total_delta > 0)
                        .then(|| 100.0 * (1.0 - (idle_delta as f64 / total_delta as f64)))
                });
                last.insert(key.clone(), (idle, total));

                let index = key.strip_prefix("cpu").and_then(|n| n.parse::<u32>().ok());
                let name = match index {
                    Some(n) => format!("CPU Core #{}", n + 1),
                    None => "CPU Total".to_string(),
                };
                CpuLoadSample { name, index, load }
            })
            .collect();

        Some(samples)
    }
}

/// Parses the `cpu*` lines of `/proc/stat` into `(key, idle, total)` jiffies.
fn parse_stat(content: &str) -> Vec<(String, u64, u64)> {
    content
        .lines()
        .filter(|line| line.starts_with("cpu"))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let key = fields.next()?.to_string();
            let parts: Vec<u64> = fields.filter_map(|s| s.parse().ok()).collect();
            if parts.len() >= 4 {
                let idle = parts[3];
                let total: u64 = parts.iter().sum();
                Some((key, idle, total))
            } else {
                None
            }
        })
        .collect()
}

/// Reads the CPU model name from `/proc/cpuinfo`.
pub(crate) fn read_cpu_model(proc_root: &Path) -> Option<String> {
    let content = fs::read_to_string(proc_root.join("cpuinfo")).ok()?;
    content
        .lines()
        .find(|line| line.starts_with("model name"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, model)| model.trim().to_string())
        .filter(|model| !model.is_empty())
}
