//! Liveness endpoint.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use super::AppState;
use super::types::HealthResponse;

/// GET /health
///
/// Answers 503 while the database cannot be reached.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, database, code) = match state.store().ping().await {
        Ok(()) => ("ok", "up", StatusCode::OK),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed to reach the database");
            ("degraded", "down", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            uptime_seconds: state.start_time.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
