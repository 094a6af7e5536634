//! End-to-end lifecycle tests for the background tasks
//!
//! Real sensors, real SQLite backend, real supervisor. Sensor readings
//! depend on the host, so assertions stick to what is invariant: rows
//! appear, loops stop, shutdown stays bounded.

use std::fs;
use std::time::Duration;

use coolwatch::config::{FanControlConfig, MetricsTaskConfig};
use coolwatch::sensors::SystemSensors;
use coolwatch::tasks::{CollectorTask, FanControlTask, Supervisor};

use crate::helpers::create_test_backend;

fn long_interval_metrics() -> MetricsTaskConfig {
    MetricsTaskConfig {
        enabled: true,
        // Long enough that only the immediate first tick and explicit
        // RunNow commands drive iterations during the test.
        interval_seconds: 3600,
    }
}

#[tokio::test]
async fn test_collector_persists_and_shuts_down() {
    let (backend, _dir) = create_test_backend().await;

    let handle = CollectorTask::spawn(
        &long_interval_metrics(),
        SystemSensors::new(None),
        backend.clone(),
    );

    handle.run_now().await.unwrap();

    let latest = backend.query_latest().await.unwrap();
    assert!(latest.is_some(), "collector should have stored a sample");

    let mut supervisor = Supervisor::new(Duration::from_secs(2));
    supervisor.register(handle);
    supervisor.shutdown().await;

    backend.close().await.unwrap();
}

#[tokio::test]
async fn test_fan_task_asserts_manual_mode_on_start() {
    let dir = tempfile::tempdir().unwrap();
    let control_path = dir.path().join("pwm1");
    let enable_path = dir.path().join("pwm1_enable");
    fs::write(&control_path, "0").unwrap();
    fs::write(&enable_path, "2").unwrap();

    let config = FanControlConfig {
        enabled: true,
        interval_seconds: 3600,
        control_path: Some(control_path),
        enable_path: Some(enable_path.clone()),
        level_read_path: None,
        curve: vec![],
    };

    let handle = FanControlTask::spawn(&config, SystemSensors::new(None));

    // The mode write happens before the first select, so one RunNow
    // round trip guarantees it has landed.
    handle.run_now().await.unwrap();
    assert_eq!(fs::read_to_string(&enable_path).unwrap(), "1");

    let mut supervisor = Supervisor::new(Duration::from_secs(2));
    supervisor.register(handle);
    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_joins_both_tasks_in_bounded_time() {
    let (backend, _dir) = create_test_backend().await;
    let sysfs = tempfile::tempdir().unwrap();

    let config = FanControlConfig {
        enabled: true,
        interval_seconds: 3600,
        control_path: Some(sysfs.path().join("pwm1")),
        enable_path: Some(sysfs.path().join("pwm1_enable")),
        level_read_path: None,
        curve: vec![],
    };

    let mut supervisor = Supervisor::new(Duration::from_secs(2));
    supervisor.register(CollectorTask::spawn(
        &long_interval_metrics(),
        SystemSensors::new(None),
        backend.clone(),
    ));
    supervisor.register(FanControlTask::spawn(&config, SystemSensors::new(None)));
    assert_eq!(supervisor.task_count(), 2);

    let started = tokio::time::Instant::now();
    supervisor.shutdown().await;

    // Both loops stop cooperatively, well inside one grace period each.
    assert!(started.elapsed() < Duration::from_secs(4));

    backend.close().await.unwrap();
}
