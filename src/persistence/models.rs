//! Database models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredBooking {
    /// Booking identifier.
    pub id: String,
    /// Source document as JSONB.
    pub document: serde_json::Value,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}
