//! Integration tests for SQLite persistence
//!
//! Covers what the in-module unit tests don't: durability across backend
//! instances and concurrent use of one pooled backend.

use std::sync::Arc;

use chrono::{Duration, Utc};
use coolwatch::storage::{QueryRange, StorageBackend, sqlite::SqliteBackend};
use pretty_assertions::assert_eq;

use crate::helpers::sample_with_temp;

#[tokio::test]
async fn test_samples_survive_backend_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("restart.db");

    let ts = Utc::now();
    {
        let backend = SqliteBackend::new(&db_path).await.unwrap();
        backend
            .insert_sample(ts, &sample_with_temp(61.0))
            .await
            .unwrap();
        backend.close().await.unwrap();
    }

    let reopened = SqliteBackend::new(&db_path).await.unwrap();
    let latest = reopened.query_latest().await.unwrap().unwrap();

    assert_eq!(latest.cpu_temp_celsius, Some(61.0));
    // Millisecond precision survives the round trip.
    assert_eq!(latest.timestamp.timestamp_millis(), ts.timestamp_millis());
}

#[tokio::test]
async fn test_concurrent_inserts_through_shared_backend() {
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn StorageBackend> =
        Arc::new(SqliteBackend::new(dir.path().join("concurrent.db")).await.unwrap());

    let base = Utc::now();
    let mut joins = Vec::new();
    for i in 0..10i64 {
        let backend = backend.clone();
        joins.push(tokio::spawn(async move {
            backend
                .insert_sample(base + Duration::seconds(i), &sample_with_temp(40.0 + i as f64))
                .await
                .unwrap();
        }));
    }
    for join in joins {
        join.await.unwrap();
    }

    let rows = backend
        .query_range(QueryRange {
            start: base - Duration::seconds(1),
            end: base + Duration::seconds(60),
            limit: None,
        })
        .await
        .unwrap();

    assert_eq!(rows.len(), 10);
    // Every row got a distinct id.
    let mut ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}

#[tokio::test]
async fn test_empty_sample_is_storable() {
    let dir = tempfile::tempdir().unwrap();
    let backend = SqliteBackend::new(dir.path().join("empty.db")).await.unwrap();

    let stored = backend
        .insert_sample(Utc::now(), &coolwatch::TelemetrySample::default())
        .await
        .unwrap();

    assert_eq!(stored.cpu_percent, None);
    assert_eq!(stored.fan_percent, None);

    let latest = backend.query_latest().await.unwrap().unwrap();
    assert_eq!(latest.id, stored.id);
}
