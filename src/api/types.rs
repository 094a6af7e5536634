//! Typed API responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response for GET /api/v1/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Query parameters for GET /api/v1/metrics/range
#[derive(Debug, Clone, Deserialize)]
pub struct RangeParams {
    /// Start timestamp (RFC 3339, inclusive)
    pub start_time: DateTime<Utc>,

    /// End timestamp (RFC 3339, inclusive)
    pub end_time: DateTime<Utc>,

    /// Maximum number of samples to return (1-1000, default 100)
    pub limit: Option<usize>,
}
