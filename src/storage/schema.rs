//! Stored sample rows
//!
//! One row per collector poll. All telemetry columns are nullable since
//! any sensor may be absent on a given host; the row itself carries the
//! identity and timestamp assigned at insert time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TelemetrySample;

/// A telemetry sample as stored, with assigned identity and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    /// Row id assigned by the backend
    pub id: i64,

    /// When the sample was recorded (always UTC)
    pub timestamp: DateTime<Utc>,

    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub disk_percent: Option<f64>,
    pub cpu_temp_celsius: Option<f64>,
    pub fan_percent: Option<f64>,
}

impl SampleRow {
    pub fn from_sample(id: i64, timestamp: DateTime<Utc>, sample: &TelemetrySample) -> Self {
        Self {
            id,
            timestamp,
            cpu_percent: sample.cpu_percent,
            memory_percent: sample.memory_percent,
            disk_percent: sample.disk_percent,
            cpu_temp_celsius: sample.cpu_temp_celsius,
            fan_percent: sample.fan_percent,
        }
    }
}
