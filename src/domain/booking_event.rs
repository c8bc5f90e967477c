//! Domain events reflecting booking-set mutations and metric refreshes.
//!
//! Every change to the booking store emits a [`MetricsEvent`] through the
//! [`super::EventBus`], followed by a [`MetricsEvent::MetricsRefreshed`]
//! carrying the recomputed headline. WebSocket clients subscribe by topic.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{BookingId, BookingStatus};
use crate::engine::HeadlineMetrics;

/// Topic of booking-set changes.
pub const TOPIC_BOOKINGS: &str = "bookings";

/// Topic of metric refreshes.
pub const TOPIC_METRICS: &str = "metrics";

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MetricsEvent {
    /// A booking was created or replaced.
    BookingUpserted {
        /// Booking identifier.
        booking_id: BookingId,
        /// Normalized status.
        status: BookingStatus,
        /// `true` if the booking did not exist before.
        created: bool,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A booking was deleted.
    BookingRemoved {
        /// Booking identifier.
        booking_id: BookingId,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A batch of bookings was imported.
    BookingsImported {
        /// Documents in the batch.
        imported: usize,
        /// Whether the batch replaced the existing set.
        replaced: bool,
        /// Bookings held after the import.
        total: usize,
        /// Import timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Metrics were recomputed from the current booking set.
    MetricsRefreshed {
        /// Recomputed headline metrics.
        headline: Box<HeadlineMetrics>,
        /// Bookings the snapshot was computed from.
        booking_count: usize,
        /// Instant the snapshot describes.
        timestamp: DateTime<Utc>,
    },
}

impl MetricsEvent {
    /// Returns the subscription topic this event is published on.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::BookingUpserted { .. }
            | Self::BookingRemoved { .. }
            | Self::BookingsImported { .. } => TOPIC_BOOKINGS,
            Self::MetricsRefreshed { .. } => TOPIC_METRICS,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::BookingUpserted { .. } => "booking_upserted",
            Self::BookingRemoved { .. } => "booking_removed",
            Self::BookingsImported { .. } => "bookings_imported",
            Self::MetricsRefreshed { .. } => "metrics_refreshed",
        }
    }

    /// Returns the booking ID for single-booking events.
    #[must_use]
    pub fn booking_id(&self) -> Option<&BookingId> {
        match self {
            Self::BookingUpserted { booking_id, .. } | Self::BookingRemoved { booking_id, .. } => {
                Some(booking_id)
            }
            Self::BookingsImported { .. } | Self::MetricsRefreshed { .. } => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn upsert_event_type_and_topic() {
        let event = MetricsEvent::BookingUpserted {
            booking_id: BookingId::from("b-1"),
            status: BookingStatus::Confirmed,
            created: true,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "booking_upserted");
        assert_eq!(event.topic(), TOPIC_BOOKINGS);
        assert_eq!(event.booking_id().map(BookingId::as_str), Some("b-1"));
    }

    #[test]
    fn removed_event_serializes() {
        let event = MetricsEvent::BookingRemoved {
            booking_id: BookingId::from("b-9"),
            timestamp: Utc::now(),
        };
        let Ok(json) = serde_json::to_string(&event) else {
            panic!("serializable event");
        };
        assert!(json.contains("\"event_type\":\"booking_removed\""));
        assert!(json.contains("b-9"));
    }

    #[test]
    fn import_event_has_no_booking_id() {
        let event = MetricsEvent::BookingsImported {
            imported: 3,
            replaced: false,
            total: 3,
            timestamp: Utc::now(),
        };
        assert!(event.booking_id().is_none());
        assert_eq!(event.topic(), "bookings");
    }
}
