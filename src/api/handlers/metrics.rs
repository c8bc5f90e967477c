//! Metrics handlers: snapshot, dashboard, charts, stateless compute.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ComputeRequest, DashboardResponse, SnapshotParams};
use crate::app_state::AppState;
use crate::engine::{ChartData, ChartKind, MetricsSnapshot, chart};
use crate::error::{ErrorResponse, MetricsError};

/// `GET /metrics/snapshot` — Full metrics snapshot.
#[utoipa::path(
    get,
    path = "/api/v1/metrics/snapshot",
    tag = "Metrics",
    summary = "Metrics snapshot",
    description = "Recomputes the full snapshot from the stored booking set. `now` and `seed` make the output reproducible.",
    params(SnapshotParams),
    responses(
        (status = 200, description = "Metrics snapshot", body = MetricsSnapshot),
    )
)]
pub async fn get_snapshot(
    State(state): State<AppState>,
    Query(params): Query<SnapshotParams>,
) -> impl IntoResponse {
    Json(state.metrics_service.snapshot(params.now, params.seed).await)
}

/// `GET /metrics/dashboard` — Headline metrics plus every chart.
#[utoipa::path(
    get,
    path = "/api/v1/metrics/dashboard",
    tag = "Metrics",
    summary = "Dashboard",
    description = "Returns the headline metrics and every chart in `{labels, series}` form.",
    params(SnapshotParams),
    responses(
        (status = 200, description = "Dashboard payload", body = DashboardResponse),
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<SnapshotParams>,
) -> impl IntoResponse {
    let snapshot = state.metrics_service.snapshot(params.now, params.seed).await;
    let charts = ChartKind::ALL
        .into_iter()
        .map(|kind| chart(&snapshot, kind))
        .collect();
    Json(DashboardResponse {
        generated_at: snapshot.generated_at,
        headline: snapshot.headline,
        charts,
    })
}

/// `GET /metrics/charts/{chart}` — A single chart.
///
/// # Errors
///
/// Returns [`MetricsError::UnknownChart`] if `chart` names no known chart.
#[utoipa::path(
    get,
    path = "/api/v1/metrics/charts/{chart}",
    tag = "Metrics",
    summary = "Single chart",
    description = "One of `revenue`, `occupancy`, `bookings`, `room-types`, `payment-methods`, `statuses`.",
    params(
        ("chart" = String, Path, description = "Chart name"),
        SnapshotParams,
    ),
    responses(
        (status = 200, description = "Chart data", body = ChartData),
        (status = 404, description = "Unknown chart", body = ErrorResponse),
    )
)]
pub async fn get_chart(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<SnapshotParams>,
) -> Result<impl IntoResponse, MetricsError> {
    let kind: ChartKind = name.parse()?;
    let snapshot = state.metrics_service.snapshot(params.now, params.seed).await;
    Ok(Json(chart(&snapshot, kind)))
}

/// `POST /metrics/compute` — Stateless snapshot over supplied documents.
///
/// # Errors
///
/// Returns [`MetricsError::InvalidConfig`] if the engine overrides are out
/// of range.
#[utoipa::path(
    post,
    path = "/api/v1/metrics/compute",
    tag = "Metrics",
    summary = "Compute metrics",
    description = "Normalizes the supplied documents and returns their snapshot without touching the stored booking set.",
    request_body = ComputeRequest,
    responses(
        (status = 200, description = "Metrics snapshot", body = MetricsSnapshot),
        (status = 400, description = "Invalid engine configuration", body = ErrorResponse),
    )
)]
pub async fn compute_metrics(
    State(state): State<AppState>,
    Json(req): Json<ComputeRequest>,
) -> Result<impl IntoResponse, MetricsError> {
    let snapshot = state
        .metrics_service
        .compute(&req.bookings, req.now, req.config, req.seed)?;
    Ok(Json(snapshot))
}

/// Metrics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metrics/snapshot", get(get_snapshot))
        .route("/metrics/dashboard", get(get_dashboard))
        .route("/metrics/charts/{chart}", get(get_chart))
        .route("/metrics/compute", post(compute_metrics))
}
