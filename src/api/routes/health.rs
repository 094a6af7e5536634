//! Health check endpoint

use axum::Json;

use crate::api::types::HealthResponse;

/// GET /api/v1/health
///
/// Returns a simple health check response
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
