pub mod api;
pub mod config;
pub mod control;
pub mod sensors;
pub mod storage;
pub mod tasks;

use serde::{Deserialize, Serialize};

/// One snapshot of host telemetry, produced fresh on every poll.
///
/// Every field is independently best-effort: a host without a temperature
/// sensor still yields CPU/memory/disk readings. A sample has no identity
/// until the storage backend assigns one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Average CPU utilization across all cores (0-100)
    pub cpu_percent: Option<f64>,

    /// RAM utilization (0-100)
    pub memory_percent: Option<f64>,

    /// Root filesystem usage (0-100)
    pub disk_percent: Option<f64>,

    /// CPU temperature in Celsius
    pub cpu_temp_celsius: Option<f64>,

    /// Current fan speed as a percentage of the actuator's full level
    pub fan_percent: Option<f64>,
}

impl TelemetrySample {
    /// True when no sensor produced a reading at all.
    pub fn is_empty(&self) -> bool {
        self.cpu_percent.is_none()
            && self.memory_percent.is_none()
            && self.disk_percent.is_none()
            && self.cpu_temp_celsius.is_none()
            && self.fan_percent.is_none()
    }
}
