//! REST API for querying stored telemetry
//!
//! - **Axum** web framework with tower-http middleware
//! - `GET /api/v1/health` - health check
//! - `GET /api/v1/metrics/latest` - most recent sample or null
//! - `GET /api/v1/metrics/range` - samples within a time window
//!
//! The API only reads; task errors never surface here. A temporarily
//! empty history is observable, but the service keeps serving.

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;
pub use types::HealthResponse;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the router with all routes and middleware.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .route(
            "/api/v1/metrics/latest",
            get(routes::metrics::get_latest_sample),
        )
        .route(
            "/api/v1/metrics/range",
            get(routes::metrics::get_samples_in_range),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Bind and serve the API in a background task, returning the bound address.
pub async fn spawn_api_server(bind_addr: SocketAddr, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {bind_addr}");

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {e}");
        }
    });

    Ok(addr)
}
