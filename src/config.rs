use std::net::IpAddr;
use std::path::PathBuf;

use tracing::trace;

use crate::control::curve::CurveBreakpoint;

/// HTTP API bind configuration
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "127.0.0.1".parse().unwrap()
}

fn default_port() -> u16 {
    8000
}

/// Storage backend configuration
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_sqlite_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_sqlite_path(),
        }
    }
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("./telemetry.db")
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TasksConfig {
    #[serde(default)]
    pub metrics: MetricsTaskConfig,

    /// How long the supervisor waits per task for cancellation to be
    /// acknowledged before giving up on it.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            metrics: MetricsTaskConfig::default(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

/// Periodic telemetry collection task
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MetricsTaskConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_metrics_interval")]
    pub interval_seconds: u64,
}

impl Default for MetricsTaskConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_metrics_interval(),
        }
    }
}

/// Fan control task and its hardware interface
///
/// `control_path` receives the decimal level (0-255), `enable_path` the
/// manual-mode token. Absence of either path disables all writes.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FanControlConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_fan_interval")]
    pub interval_seconds: u64,

    pub control_path: Option<PathBuf>,
    pub enable_path: Option<PathBuf>,

    /// Optional sysfs path the sensor reader uses to report the current
    /// fan level (e.g. a cooling_device cur_state file).
    pub level_read_path: Option<PathBuf>,

    /// Temperature-to-speed breakpoints, sorted ascending by temperature
    #[serde(default)]
    pub curve: Vec<CurveBreakpoint>,
}

impl Default for FanControlConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_fan_interval(),
            control_path: None,
            enable_path: None,
            level_read_path: None,
            curve: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_metrics_interval() -> u64 {
    60
}

fn default_fan_interval() -> u64 {
    10
}

fn default_shutdown_grace() -> u64 {
    5
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub tasks: TasksConfig,

    #[serde(default)]
    pub fan_control: FanControlConfig,
}

impl Config {
    /// Validate invariants that the rest of the process relies on.
    ///
    /// Checked once at load time and never re-checked per iteration:
    /// positive intervals, speeds within 0-100, and a curve sorted
    /// non-decreasing by temperature.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tasks.metrics.interval_seconds == 0 {
            anyhow::bail!("tasks.metrics.interval_seconds must be positive");
        }

        if self.tasks.shutdown_grace_seconds == 0 {
            anyhow::bail!("tasks.shutdown_grace_seconds must be positive");
        }

        if self.fan_control.interval_seconds == 0 {
            anyhow::bail!("fan_control.interval_seconds must be positive");
        }

        for point in &self.fan_control.curve {
            if !(0.0..=100.0).contains(&point.speed) {
                anyhow::bail!(
                    "fan curve speed {} at {}C is outside 0-100",
                    point.speed,
                    point.temperature
                );
            }
        }

        let sorted = self
            .fan_control
            .curve
            .windows(2)
            .all(|pair| pair[0].temperature <= pair[1].temperature);
        if !sorted {
            anyhow::bail!("fan curve breakpoints must be sorted ascending by temperature");
        }

        Ok(())
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&file_content)
        .map_err(|e| anyhow::anyhow!("invalid configuration file: {e}"))?;
    config.validate()?;
    trace!("loaded config: {config:?}");
    Ok(config)
}
