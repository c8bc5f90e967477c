//! System endpoints: health check and engine configuration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::engine::EngineConfig;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    bookings: usize,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp, and the number of bookings held.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            bookings: state.metrics_service.store().len().await,
        }),
    )
}

/// `GET /config/engine` — Active engine configuration.
#[utoipa::path(
    get,
    path = "/config/engine",
    tag = "System",
    summary = "Engine configuration",
    description = "Returns the room count, window, forecast, occupancy and reporting settings the engine runs with.",
    responses(
        (status = 200, description = "Engine configuration", body = EngineConfig),
    )
)]
pub async fn engine_config_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics_service.engine_config().clone())
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/engine", get(engine_config_handler))
}
