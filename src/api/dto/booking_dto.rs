//! Booking DTOs for upsert, import, and list operations.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, PaginationParams};
use crate::domain::{BookingDocument, BookingRecord, BookingStatus};
use crate::error::MetricsError;

/// Response body for `POST /bookings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpsertBookingResponse {
    /// `true` if the booking did not exist before.
    pub created: bool,
    /// Normalized booking.
    pub booking: BookingRecord,
}

/// Request body for `POST /bookings/import`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportBookingsRequest {
    /// Source documents, in any supported shape.
    pub bookings: Vec<BookingDocument>,
    /// Replace the whole booking set instead of upserting.
    #[serde(default)]
    pub replace: bool,
}

/// Response body for `POST /bookings/import`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportBookingsResponse {
    /// Documents in the batch.
    pub imported: usize,
    /// Whether the batch replaced the existing set.
    pub replaced: bool,
    /// Bookings held after the import.
    pub total: usize,
}

/// Query parameters for `GET /bookings`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingListParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default)]
    pub page: Option<u32>,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Only bookings with this status (e.g. `checked-in`).
    #[serde(default)]
    pub status: Option<String>,
}

impl BookingListParams {
    /// Pagination part of the query.
    #[must_use]
    pub fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
        .clamped()
    }

    /// Parses the status filter strictly.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::InvalidRequest`] if `status` names no known
    /// status.
    pub fn status_filter(&self) -> Result<Option<BookingStatus>, MetricsError> {
        let Some(raw) = self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let wanted = raw.to_ascii_lowercase().replace(['_', ' '], "-");
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .map(Some)
            .ok_or_else(|| MetricsError::InvalidRequest(format!("unknown status: {raw}")))
    }
}

/// Paginated list response for `GET /bookings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// Bookings on this page, ordered by ID.
    pub data: Vec<BookingRecord>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn params(status: Option<&str>) -> BookingListParams {
        BookingListParams {
            page: None,
            per_page: Some(500),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn status_filter_is_strict() {
        assert!(matches!(params(None).status_filter(), Ok(None)));
        assert!(matches!(
            params(Some("Checked_In")).status_filter(),
            Ok(Some(BookingStatus::CheckedIn))
        ));
        assert!(matches!(
            params(Some("archived")).status_filter(),
            Err(MetricsError::InvalidRequest(_))
        ));
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        let pagination = params(None).pagination();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, 100);
    }

    #[test]
    fn import_request_defaults_to_upsert() {
        let body = r#"{"bookings": [{"id": "a", "totalPrice": "12.5"}]}"#;
        let Ok(request) = serde_json::from_str::<ImportBookingsRequest>(body) else {
            panic!("valid request");
        };
        assert!(!request.replace);
        assert_eq!(request.bookings.len(), 1);
    }
}
