//! Integration tests for API endpoints
//!
//! Drives the router directly through tower's `oneshot` so no socket is
//! needed. Each test builds a fresh backend and state.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use coolwatch::api::{ApiState, router};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::helpers::{create_test_backend, sample_with_temp};

async fn test_router() -> (Router, ApiState, TempDir) {
    let (backend, dir) = create_test_backend().await;
    let state = ApiState::new(backend);
    (router(state.clone()), state, dir)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _state, _dir) = test_router().await;

    let (status, body) = get_json(app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_latest_returns_null_when_empty() {
    let (app, _state, _dir) = test_router().await;

    let (status, body) = get_json(app, "/api/v1/metrics/latest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_latest_returns_most_recent_sample() {
    let (app, state, _dir) = test_router().await;

    let base = Utc::now();
    for i in 0..3i64 {
        state
            .backend
            .insert_sample(base + Duration::seconds(i), &sample_with_temp(50.0 + i as f64))
            .await
            .unwrap();
    }

    let (status, body) = get_json(app, "/api/v1/metrics/latest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cpu_temp_celsius"], 52.0);
}

#[tokio::test]
async fn test_range_returns_ascending_window() {
    let (app, state, _dir) = test_router().await;

    let base = Utc::now();
    for i in 0..5i64 {
        state
            .backend
            .insert_sample(base + Duration::minutes(i), &sample_with_temp(40.0 + i as f64))
            .await
            .unwrap();
    }

    // Window covers minutes 1 through 3.
    let uri = format!(
        "/api/v1/metrics/range?start_time={}&end_time={}",
        (base + Duration::minutes(1)).to_rfc3339().replace('+', "%2B"),
        (base + Duration::minutes(3)).to_rfc3339().replace('+', "%2B"),
    );
    let (status, body) = get_json(app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["cpu_temp_celsius"], 41.0);
    assert_eq!(rows[2]["cpu_temp_celsius"], 43.0);
}

#[tokio::test]
async fn test_range_respects_limit() {
    let (app, state, _dir) = test_router().await;

    let base = Utc::now();
    for i in 0..5i64 {
        state
            .backend
            .insert_sample(base + Duration::seconds(i), &sample_with_temp(40.0 + i as f64))
            .await
            .unwrap();
    }

    let uri = format!(
        "/api/v1/metrics/range?start_time={}&end_time={}&limit=2",
        base.to_rfc3339().replace('+', "%2B"),
        (base + Duration::minutes(1)).to_rfc3339().replace('+', "%2B"),
    );
    let (status, body) = get_json(app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    // Limit keeps the oldest rows: ascending order, then truncation.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["cpu_temp_celsius"], 40.0);
    assert_eq!(rows[1]["cpu_temp_celsius"], 41.0);
}

#[tokio::test]
async fn test_range_rejects_inverted_window() {
    let (app, _state, _dir) = test_router().await;

    let base = Utc::now();
    let uri = format!(
        "/api/v1/metrics/range?start_time={}&end_time={}",
        (base + Duration::minutes(5)).to_rfc3339().replace('+', "%2B"),
        base.to_rfc3339().replace('+', "%2B"),
    );
    let (status, body) = get_json(app, &uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("start_time"));
}

#[tokio::test]
async fn test_range_rejects_equal_bounds() {
    let (app, _state, _dir) = test_router().await;

    let ts = Utc::now().to_rfc3339().replace('+', "%2B");
    let uri = format!("/api/v1/metrics/range?start_time={ts}&end_time={ts}");
    let (status, _body) = get_json(app, &uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_range_rejects_bad_limits() {
    let (app, _state, _dir) = test_router().await;

    let base = Utc::now();
    let window = format!(
        "start_time={}&end_time={}",
        base.to_rfc3339().replace('+', "%2B"),
        (base + Duration::minutes(1)).to_rfc3339().replace('+', "%2B"),
    );

    for bad in ["limit=0", "limit=1001"] {
        let (status, body) =
            get_json(app.clone(), &format!("/api/v1/metrics/range?{window}&{bad}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad} should be rejected");
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }
}
