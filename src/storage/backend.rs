//! Storage backend trait definition

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::StorageResult;
use super::schema::SampleRow;
use crate::TelemetrySample;

/// Query parameters for fetching samples within a time range
#[derive(Debug, Clone)]
pub struct QueryRange {
    /// Start of time range (inclusive)
    pub start: DateTime<Utc>,

    /// End of time range (inclusive)
    pub end: DateTime<Utc>,

    /// Maximum number of results to return
    pub limit: Option<usize>,
}

/// Trait for persistent sample storage.
///
/// Implementations must be `Send + Sync`: the collector task and the API
/// server hold the same backend behind an `Arc` and use it concurrently,
/// so all connection handling happens inside the implementation (pooled,
/// never a single shared handle).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Persist one sample, assigning identity and timestamp.
    ///
    /// Returns the stored row so callers can log the assigned id.
    async fn insert_sample(
        &self,
        timestamp: DateTime<Utc>,
        sample: &TelemetrySample,
    ) -> StorageResult<SampleRow>;

    /// Fetch samples within a time range, ordered by timestamp ascending.
    async fn query_range(&self, query: QueryRange) -> StorageResult<Vec<SampleRow>>;

    /// Fetch the most recent sample, if any exists.
    async fn query_latest(&self) -> StorageResult<Option<SampleRow>>;

    /// Lightweight check that the backend is operational.
    async fn health_check(&self) -> StorageResult<()>;

    /// Human-readable backend statistics.
    async fn get_stats(&self) -> StorageResult<String>;

    /// Close the backend, releasing the connection pool.
    ///
    /// Must be called only after all tasks writing through the backend
    /// have been shut down.
    async fn close(&self) -> StorageResult<()>;
}
