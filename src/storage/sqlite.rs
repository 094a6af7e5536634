//! SQLite storage backend implementation
//!
//! Embedded database, no separate server. WAL mode keeps reads (the query
//! API) responsive while the collector writes, and the pool supports the
//! concurrent checkouts both sides need.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info, instrument, warn};

use super::backend::{QueryRange, StorageBackend};
use super::error::{StorageError, StorageResult};
use super::schema::SampleRow;
use crate::TelemetrySample;

pub struct SqliteBackend {
    pool: Pool<Sqlite>,
    db_path: String,
}

impl SqliteBackend {
    /// Open (creating if missing) and migrate the database at `db_path`.
    #[instrument(skip_all)]
    pub async fn new(db_path: impl AsRef<Path>) -> StorageResult<Self> {
        let db_path_str = db_path.as_ref().to_string_lossy().to_string();

        info!("initializing SQLite backend at: {}", db_path_str);

        let options = SqliteConnectOptions::new()
            .filename(&db_path_str)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        debug!("running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;

        info!("database ready");

        Ok(Self {
            pool,
            db_path: db_path_str,
        })
    }

    fn timestamp_to_millis(dt: &DateTime<Utc>) -> i64 {
        dt.timestamp_millis()
    }

    fn millis_to_timestamp(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
    }

    fn row_to_sample(row: &sqlx::sqlite::SqliteRow) -> SampleRow {
        SampleRow {
            id: row.get("id"),
            timestamp: Self::millis_to_timestamp(row.get("timestamp")),
            cpu_percent: row.get("cpu_percent"),
            memory_percent: row.get("memory_percent"),
            disk_percent: row.get("disk_percent"),
            cpu_temp_celsius: row.get("cpu_temp_celsius"),
            fan_percent: row.get("fan_percent"),
        }
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    #[instrument(skip(self, sample))]
    async fn insert_sample(
        &self,
        timestamp: DateTime<Utc>,
        sample: &TelemetrySample,
    ) -> StorageResult<SampleRow> {
        let millis = Self::timestamp_to_millis(&timestamp);

        let result = sqlx::query(
            r#"
            INSERT INTO samples (
                timestamp, cpu_percent, memory_percent,
                disk_percent, cpu_temp_celsius, fan_percent
            )
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(millis)
        .bind(sample.cpu_percent)
        .bind(sample.memory_percent)
        .bind(sample.disk_percent)
        .bind(sample.cpu_temp_celsius)
        .bind(sample.fan_percent)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let id = result.last_insert_rowid();
        debug!("stored sample row {id}");

        Ok(SampleRow::from_sample(id, timestamp, sample))
    }

    #[instrument(skip(self), fields(start = %query.start, end = %query.end))]
    async fn query_range(&self, query: QueryRange) -> StorageResult<Vec<SampleRow>> {
        let start_millis = Self::timestamp_to_millis(&query.start);
        let end_millis = Self::timestamp_to_millis(&query.end);

        let limit_clause = query
            .limit
            .map(|l| format!("LIMIT {}", l))
            .unwrap_or_default();

        let sql = format!(
            r#"
            SELECT id, timestamp, cpu_percent, memory_percent,
                   disk_percent, cpu_temp_celsius, fan_percent
            FROM samples
            WHERE timestamp >= ? AND timestamp <= ?
            ORDER BY timestamp ASC
            {}
            "#,
            limit_clause
        );

        let rows = sqlx::query(&sql)
            .bind(start_millis)
            .bind(end_millis)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let results: Vec<SampleRow> = rows.iter().map(Self::row_to_sample).collect();
        debug!("range query returned {} samples", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn query_latest(&self) -> StorageResult<Option<SampleRow>> {
        let row = sqlx::query(
            r#"
            SELECT id, timestamp, cpu_percent, memory_percent,
                   disk_percent, cpu_temp_celsius, fan_percent
            FROM samples
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_sample))
    }

    async fn health_check(&self) -> StorageResult<()> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("health check failed: {e}");
                Err(StorageError::QueryFailed(e.to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_stats(&self) -> StorageResult<String> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM samples")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let file_size = std::fs::metadata(&self.db_path)
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(format!(
            "SQLite: {} rows, {:.2} MB on disk",
            row.0,
            file_size as f64 / 1_000_000.0
        ))
    }

    async fn close(&self) -> StorageResult<()> {
        info!("closing SQLite backend");
        self.pool.close().await;
        Ok(())
    }
}
