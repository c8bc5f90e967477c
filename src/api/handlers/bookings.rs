//! Booking handlers: upsert, import, list, get, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BookingListParams, BookingListResponse, ImportBookingsRequest, ImportBookingsResponse,
    UpsertBookingResponse,
};
use crate::app_state::AppState;
use crate::domain::{BookingDocument, BookingId, BookingRecord};
use crate::error::{ErrorResponse, MetricsError};

/// `POST /bookings` — Create or replace a booking.
///
/// # Errors
///
/// Returns [`MetricsError`] if the write-through to the database fails.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "Create or replace a booking",
    description = "Normalizes a loosely-typed booking document and stores it. Dates may be ISO strings, epoch milliseconds, or `{seconds, nanoseconds}` objects; unparseable values never fail the request.",
    request_body = BookingDocument,
    responses(
        (status = 201, description = "Booking created", body = UpsertBookingResponse),
        (status = 200, description = "Booking replaced", body = UpsertBookingResponse),
        (status = 500, description = "Persistence failure", body = ErrorResponse),
    )
)]
pub async fn upsert_booking(
    State(state): State<AppState>,
    Json(document): Json<BookingDocument>,
) -> Result<impl IntoResponse, MetricsError> {
    let (booking, created) = state.metrics_service.upsert_booking(document).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(UpsertBookingResponse { created, booking })))
}

/// `POST /bookings/import` — Import a batch of bookings.
///
/// # Errors
///
/// Returns [`MetricsError`] if the write-through to the database fails.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/import",
    tag = "Bookings",
    summary = "Import bookings",
    description = "Upserts a batch of booking documents, or replaces the whole set when `replace` is true. Emits a single metrics refresh.",
    request_body = ImportBookingsRequest,
    responses(
        (status = 200, description = "Batch imported", body = ImportBookingsResponse),
        (status = 500, description = "Persistence failure", body = ErrorResponse),
    )
)]
pub async fn import_bookings(
    State(state): State<AppState>,
    Json(req): Json<ImportBookingsRequest>,
) -> Result<impl IntoResponse, MetricsError> {
    let outcome = state
        .metrics_service
        .import_bookings(req.bookings, req.replace)
        .await?;
    Ok(Json(ImportBookingsResponse {
        imported: outcome.imported,
        replaced: req.replace,
        total: outcome.total,
    }))
}

/// `GET /bookings` — List bookings with pagination and optional status filter.
///
/// # Errors
///
/// Returns [`MetricsError::InvalidRequest`] for an unknown status filter.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "List bookings",
    description = "Returns a paginated list of normalized bookings ordered by ID, optionally filtered by status.",
    params(BookingListParams),
    responses(
        (status = 200, description = "Paginated booking list", body = BookingListResponse),
        (status = 400, description = "Unknown status", body = ErrorResponse),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> Result<impl IntoResponse, MetricsError> {
    let status = params.status_filter()?;
    let records = state.metrics_service.list_bookings(status).await;
    let (data, pagination) = params.pagination().paginate(records);
    Ok(Json(BookingListResponse { data, pagination }))
}

/// `GET /bookings/{id}` — Get a normalized booking.
///
/// # Errors
///
/// Returns [`MetricsError::BookingNotFound`] if the booking does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Get a booking",
    params(
        ("id" = String, Path, description = "Booking identifier"),
    ),
    responses(
        (status = 200, description = "Normalized booking", body = BookingRecord),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MetricsError> {
    let booking = state
        .metrics_service
        .get_booking(&BookingId::from(id))
        .await?;
    Ok(Json(booking))
}

/// `DELETE /bookings/{id}` — Remove a booking.
///
/// # Errors
///
/// Returns [`MetricsError::BookingNotFound`] if the booking does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Delete a booking",
    description = "Removes a booking and emits a BookingRemoved event followed by a metrics refresh.",
    params(
        ("id" = String, Path, description = "Booking identifier"),
    ),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MetricsError> {
    state
        .metrics_service
        .remove_booking(&BookingId::from(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Booking management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(upsert_booking).get(list_bookings))
        .route("/bookings/import", post(import_bookings))
        .route("/bookings/{id}", get(get_booking).delete(delete_booking))
}
