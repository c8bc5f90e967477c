//! Booking documents as they arrive from the source, and the normalized
//! records the metrics engine consumes.
//!
//! [`BookingDocument`] accepts whatever the upstream document store hands
//! over: dates in several encodings, prices as numbers or strings, room
//! numbers as integers. [`BookingDocument::normalize`] turns it into a
//! [`BookingRecord`] without ever failing; anomalies degrade to defaults and
//! are logged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use utoipa::ToSchema;

use super::BookingId;
use crate::engine::dates;

/// Room type assumed when a booking carries none.
pub const DEFAULT_ROOM_TYPE: &str = "Standard";

/// Lifecycle status of a booking.
///
/// Unknown or absent source values are read as [`BookingStatus::Pending`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Awaiting confirmation.
    #[default]
    Pending,
    /// Confirmed, guest not yet arrived.
    Confirmed,
    /// Room currently occupied.
    Occupied,
    /// Guest checked in.
    CheckedIn,
    /// Stay finished.
    Completed,
    /// Booking cancelled; excluded from revenue and occupancy.
    Cancelled,
}

impl BookingStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Occupied,
        Self::CheckedIn,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the canonical wire name (e.g. `"checked-in"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Occupied => "occupied",
            Self::CheckedIn => "checked-in",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Reads a free-text status, falling back to `Pending`.
    ///
    /// Case and `_`/space separators are ignored, so `"Checked In"`,
    /// `"checked_in"` and `"checked-in"` are the same status.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Pending;
        };
        let key: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match key.as_str() {
            "confirmed" => Self::Confirmed,
            "occupied" => Self::Occupied,
            "checked-in" | "checkedin" => Self::CheckedIn,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    /// `true` for cancelled bookings.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// `true` when the booking still holds (or will hold) a room: neither
    /// cancelled nor completed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A date field in one of the encodings the booking source produces.
///
/// Each variant has exactly one conversion in [`dates::normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawDate {
    /// Source timestamp wrapper (`{seconds, nanoseconds}`) that converts
    /// itself to an instant.
    Timestamp {
        /// Whole seconds since the Unix epoch.
        seconds: f64,
        /// Sub-second nanoseconds.
        nanoseconds: f64,
    },
    /// Already a native instant.
    Instant(DateTime<Utc>),
    /// Plain object carrying only `seconds` since the epoch.
    Seconds(f64),
    /// Milliseconds since the Unix epoch.
    EpochMillis(f64),
    /// Textual date, parsed on normalization.
    Text(String),
    /// Absent, `null`, or a shape none of the other variants match.
    #[default]
    Missing,
}

impl RawDate {
    /// Classifies a JSON value into a date encoding.
    ///
    /// Objects with both `seconds` and `nanoseconds` (or the underscored
    /// `_seconds`/`_nanoseconds` export form) are timestamp wrappers;
    /// objects with only `seconds` are plain second counts.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let seconds = map
                    .get("seconds")
                    .or_else(|| map.get("_seconds"))
                    .and_then(Value::as_f64);
                let nanoseconds = map
                    .get("nanoseconds")
                    .or_else(|| map.get("_nanoseconds"))
                    .and_then(Value::as_f64);
                match (seconds, nanoseconds) {
                    (Some(seconds), Some(nanoseconds)) => Self::Timestamp {
                        seconds,
                        nanoseconds,
                    },
                    (Some(seconds), None) => Self::Seconds(seconds),
                    _ => Self::Missing,
                }
            }
            Value::Number(n) => n.as_f64().map_or(Self::Missing, Self::EpochMillis),
            Value::String(s) if !s.trim().is_empty() => Self::Text(s.clone()),
            _ => Self::Missing,
        }
    }

    /// Converts back to the JSON shape it was read from.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Timestamp {
                seconds,
                nanoseconds,
            } => serde_json::json!({ "seconds": seconds, "nanoseconds": nanoseconds }),
            Self::Instant(at) => Value::String(at.to_rfc3339()),
            Self::Seconds(seconds) => serde_json::json!({ "seconds": seconds }),
            Self::EpochMillis(ms) => serde_json::json!(ms),
            Self::Text(text) => Value::String(text.clone()),
            Self::Missing => Value::Null,
        }
    }

    /// `true` when no date was supplied at all.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<DateTime<Utc>> for RawDate {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Instant(at)
    }
}

impl Serialize for RawDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// A booking exactly as stored by the upstream document store.
///
/// Every field is optional and loosely typed; nothing inside a document can
/// make it fail to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDocument {
    /// Source identifier; generated when absent.
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Arrival date in any supported encoding.
    #[serde(default, alias = "check_in")]
    #[schema(value_type = Object)]
    pub check_in: RawDate,
    /// Departure date in any supported encoding.
    #[serde(default, alias = "check_out")]
    #[schema(value_type = Object)]
    pub check_out: RawDate,
    /// Total price as a number or numeric string.
    #[serde(default, alias = "total_price", skip_serializing_if = "Value::is_null")]
    #[schema(value_type = Object)]
    pub total_price: Value,
    /// Free-text status.
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Room type label.
    #[serde(
        default,
        alias = "room_type",
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_type: Option<String>,
    /// Room number or name.
    #[serde(
        default,
        alias = "room_number",
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_number: Option<String>,
    /// Payment method label.
    #[serde(
        default,
        alias = "payment_method",
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_method: Option<String>,
}

impl BookingDocument {
    /// Normalizes this document into a [`BookingRecord`].
    ///
    /// Never fails: unparseable dates become `None`, bad prices become 0,
    /// unknown statuses become `Pending`, a missing room type becomes
    /// `"Standard"`. Each anomaly is logged.
    #[must_use]
    pub fn normalize(&self) -> BookingRecord {
        let id = self
            .id
            .as_deref()
            .map_or_else(BookingId::generate, BookingId::from);

        let check_in = normalize_date(&id, "check_in", &self.check_in);
        let check_out = normalize_date(&id, "check_out", &self.check_out);

        let total_price = match parse_amount(&self.total_price) {
            Some(price) if price.is_sign_negative() && !price.is_zero() => {
                tracing::warn!(booking_id = %id, %price, "negative total price clamped to 0");
                Decimal::ZERO
            }
            Some(price) => price,
            None => {
                if !self.total_price.is_null() {
                    tracing::warn!(
                        booking_id = %id,
                        raw = %self.total_price,
                        "non-numeric total price coerced to 0"
                    );
                }
                Decimal::ZERO
            }
        };

        BookingRecord {
            id,
            check_in,
            check_out,
            total_price,
            status: BookingStatus::parse_lenient(self.status.as_deref()),
            room_type: self
                .room_type
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOM_TYPE.to_string()),
            room_number: self.room_number.clone(),
            payment_method: self.payment_method.clone(),
        }
    }
}

/// Normalized booking consumed by the metrics engine.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookingRecord {
    /// Booking identifier.
    pub id: BookingId,
    /// Arrival instant, `None` when absent or unparseable.
    pub check_in: Option<DateTime<Utc>>,
    /// Departure instant, `None` when absent or unparseable.
    pub check_out: Option<DateTime<Utc>>,
    /// Non-negative total price.
    pub total_price: Decimal,
    /// Booking status.
    pub status: BookingStatus,
    /// Room type label, `"Standard"` by default.
    pub room_type: String,
    /// Room number, when known.
    pub room_number: Option<String>,
    /// Payment method, when known.
    pub payment_method: Option<String>,
}

impl BookingRecord {
    /// `true` when `at` lies within `[check_in, check_out]`. Bookings
    /// missing either date never span anything.
    #[must_use]
    pub fn spans(&self, at: DateTime<Utc>) -> bool {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => check_in <= at && at <= check_out,
            _ => false,
        }
    }
}

fn normalize_date(id: &BookingId, field: &'static str, raw: &RawDate) -> Option<DateTime<Utc>> {
    let normalized = dates::normalize(raw);
    if normalized.is_none() && !raw.is_missing() {
        tracing::debug!(booking_id = %id, field, raw = %raw.to_value(), "unparseable date");
    }
    normalized
}

/// Parses a loosely-typed amount. Returns `None` for anything that is not
/// a finite number or numeric string.
#[must_use]
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Reads strings and numbers as trimmed text; anything else (or a blank
/// string) is treated as absent.
fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
