//! Host sensor reading
//!
//! [`SystemSensors::read`] produces one [`TelemetrySample`] per call. Each
//! field is filled independently and best-effort: a host without a known
//! temperature sensor still reports CPU, memory and disk figures. No
//! failure escapes `read()`.

use std::path::PathBuf;

use sysinfo::{Components, Disks, System};
use tracing::{debug, warn};

use crate::TelemetrySample;
use crate::control::MAX_LEVEL;
use crate::control::sysfs::read_trimmed;

/// Known CPU temperature sensor labels, scanned in priority order.
/// The first component whose label matches wins.
const CPU_SENSOR_LABELS: &[&str] = &["cpu_thermal", "coretemp", "k10temp", "tctl", "cpu"];

pub struct SystemSensors {
    sys: System,

    /// Optional sysfs path reporting the current fan level (0-255)
    fan_level_path: Option<PathBuf>,
}

impl SystemSensors {
    pub fn new(fan_level_path: Option<PathBuf>) -> Self {
        let mut sys = System::new();

        // CPU usage is measured against the previous refresh. Establish
        // the baseline here, on the constructing thread, so `read()`
        // never has to block an executor thread waiting for one.
        sys.refresh_cpu_usage();

        Self {
            sys,
            fan_level_path,
        }
    }

    /// Collect a fresh telemetry sample.
    pub fn read(&mut self) -> TelemetrySample {
        TelemetrySample {
            cpu_percent: self.read_cpu_percent(),
            memory_percent: self.read_memory_percent(),
            disk_percent: self.read_disk_percent(),
            cpu_temp_celsius: self.read_cpu_temperature(),
            fan_percent: self.read_fan_percent(),
        }
    }

    /// Read only the CPU temperature (for the fan control loop).
    pub fn read_cpu_temperature(&mut self) -> Option<f64> {
        let components = Components::new_with_refreshed_list();

        for wanted in CPU_SENSOR_LABELS {
            let found = components.iter().find(|component| {
                component.label().to_lowercase().contains(wanted)
                    && component.temperature().is_some()
            });

            if let Some(component) = found {
                let temp = component.temperature().map(f64::from);
                debug!(
                    "cpu temperature {:?}C from sensor '{}'",
                    temp,
                    component.label()
                );
                return temp;
            }
        }

        debug!("no known cpu temperature sensor found");
        None
    }

    fn read_cpu_percent(&mut self) -> Option<f64> {
        self.sys.refresh_cpu_usage();

        let cpus = self.sys.cpus();
        if cpus.is_empty() {
            warn!("no cpus reported by sysinfo");
            return None;
        }

        let sum: f32 = cpus.iter().map(|cpu| cpu.cpu_usage()).sum();
        Some(f64::from(sum) / cpus.len() as f64)
    }

    fn read_memory_percent(&mut self) -> Option<f64> {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        if total == 0 {
            warn!("total memory reported as zero");
            return None;
        }

        Some(self.sys.used_memory() as f64 / total as f64 * 100.0)
    }

    fn read_disk_percent(&self) -> Option<f64> {
        let disks = Disks::new_with_refreshed_list();

        // Prefer the root filesystem; fall back to the first disk.
        let disk = disks
            .iter()
            .find(|disk| disk.mount_point() == std::path::Path::new("/"))
            .or_else(|| disks.iter().next())?;

        let total = disk.total_space();
        if total == 0 {
            return None;
        }

        let used = total.saturating_sub(disk.available_space());
        Some(used as f64 / total as f64 * 100.0)
    }

    fn read_fan_percent(&self) -> Option<f64> {
        let path = self.fan_level_path.as_ref()?;

        let raw = match read_trimmed(path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("fan level path {} unreadable: {e}", path.display());
                return None;
            }
        };

        match raw.parse::<u32>() {
            Ok(level) => Some((f64::from(level) / f64::from(MAX_LEVEL) * 100.0).clamp(0.0, 100.0)),
            Err(_) => {
                warn!(
                    "fan level at {} is not an integer: '{raw}'",
                    path.display()
                );
                None
            }
        }
    }
}
