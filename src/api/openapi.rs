//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use super::handlers::{bookings, metrics, system};

/// OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "lodge-metrics",
        description = "Booking ingestion, occupancy and revenue metrics, and short-horizon forecasts for hotel dashboards."
    ),
    paths(
        system::health_handler,
        system::engine_config_handler,
        bookings::upsert_booking,
        bookings::import_bookings,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::delete_booking,
        metrics::get_snapshot,
        metrics::get_dashboard,
        metrics::get_chart,
        metrics::compute_metrics,
    ),
    tags(
        (name = "System", description = "Health and configuration"),
        (name = "Bookings", description = "Booking ingestion and lookup"),
        (name = "Metrics", description = "Snapshots, charts and forecasts"),
    )
)]
pub struct ApiDoc;
