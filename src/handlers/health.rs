//! Health check endpoints.
//!
//! Provides endpoints for monitoring server health and readiness.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::AssetKind;
use crate::services::StorageStats;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Server status
    pub status: &'static str,
    /// Server version
    pub version: &'static str,
    /// Startup time
    pub started_at: DateTime<Utc>,
    /// Seconds since startup
    pub uptime_seconds: i64,
}

/// Liveness probe - server is running
///
/// GET /health/live
async fn liveness(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        started_at: state.started_at,
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// Readiness probe - both storage directories can be read
///
/// GET /health/ready
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let images = state.store(AssetKind::Image).is_readable().await;
    let videos = state.store(AssetKind::Video).is_readable().await;

    let ready = images && videos;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" },
            images: directory_status(images),
            videos: directory_status(videos),
        }),
    )
}

fn directory_status(readable: bool) -> &'static str {
    if readable {
        "readable"
    } else {
        "unreadable"
    }
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub images: &'static str,
    pub videos: &'static str,
}

/// Storage stats endpoint
///
/// GET /health/stats
async fn stats(State(state): State<AppState>) -> Result<Json<StorageStats>> {
    Ok(Json(state.storage.get_stats().await?))
}

/// Create health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/stats", get(stats))
}
