//! Helper functions for integration tests

use std::sync::Arc;

use coolwatch::TelemetrySample;
use coolwatch::storage::{StorageBackend, sqlite::SqliteBackend};
use tempfile::TempDir;

/// Create a fresh SQLite backend in a temp directory.
///
/// The directory guard must outlive the backend or the database file
/// disappears from under the pool.
pub async fn create_test_backend() -> (Arc<dyn StorageBackend>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let backend = SqliteBackend::new(dir.path().join("test.db")).await.unwrap();
    (Arc::new(backend), dir)
}

pub fn sample_with_temp(cpu_temp_celsius: f64) -> TelemetrySample {
    TelemetrySample {
        cpu_percent: Some(12.5),
        memory_percent: Some(40.0),
        disk_percent: Some(55.0),
        cpu_temp_celsius: Some(cpu_temp_celsius),
        fan_percent: Some(50.0),
    }
}
