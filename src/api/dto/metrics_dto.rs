//! Metrics DTOs for snapshot, dashboard, chart, and compute operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::BookingDocument;
use crate::engine::{ChartData, EngineConfig, HeadlineMetrics};

/// Query parameters for snapshot and chart endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SnapshotParams {
    /// Instant to compute metrics for (RFC 3339). Defaults to now.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Forecast seed for reproducible output.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request body for `POST /metrics/compute`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ComputeRequest {
    /// Source documents to compute over; the stored set is not used.
    #[serde(default)]
    pub bookings: Vec<BookingDocument>,
    /// Instant to compute metrics for. Defaults to now.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Engine overrides; absent fields keep their defaults.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    /// Forecast seed for reproducible output.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Response body for `GET /metrics/dashboard`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Instant the dashboard describes.
    pub generated_at: DateTime<Utc>,
    /// Scalar metrics.
    pub headline: HeadlineMetrics,
    /// Every chart, in dashboard order.
    pub charts: Vec<ChartData>,
}
