//! Telemetry query endpoints

use axum::Json;
use axum::extract::{Query, State};
use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::ApiState;
use crate::api::types::RangeParams;
use crate::storage::{QueryRange, SampleRow};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// GET /api/v1/metrics/latest
///
/// Returns the most recent sample, or `null` when nothing has been
/// recorded yet - the caller handles "no data" without a 404.
pub async fn get_latest_sample(
    State(state): State<ApiState>,
) -> ApiResult<Json<Option<SampleRow>>> {
    let latest = state.backend.query_latest().await?;
    Ok(Json(latest))
}

/// GET /api/v1/metrics/range?start_time&end_time&limit
///
/// Returns samples between the bounds (inclusive), ordered ascending by
/// timestamp. Rejects inverted ranges and limits outside 1..=1000.
pub async fn get_samples_in_range(
    State(state): State<ApiState>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<Vec<SampleRow>>> {
    if params.start_time >= params.end_time {
        return Err(ApiError::InvalidRequest(
            "start_time must be before end_time".to_string(),
        ));
    }

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ApiError::InvalidRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    debug!(
        "range query {} to {} (limit {limit})",
        params.start_time, params.end_time
    );

    let samples = state
        .backend
        .query_range(QueryRange {
            start: params.start_time,
            end: params.end_time,
            limit: Some(limit),
        })
        .await?;

    Ok(Json(samples))
}
