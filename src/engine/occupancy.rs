//! Occupied room-day estimation per month.
//!
//! Two modes are supported. `Approximate` multiplies a month's booking
//! count by an average stay length, which is what the dashboard has always
//! shown. `Exact` walks `(check_in, check_out)` intervals, clips them to the
//! month and unions overlapping stays in the same room.

use std::collections::HashMap;

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::dates::{YearMonth, local_date};
use crate::domain::BookingRecord;

/// How occupied room-days are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyMode {
    /// `booking_count * average_stay_days`.
    #[default]
    Approximate,
    /// Union of per-room night intervals clipped to the month.
    Exact,
}

impl OccupancyMode {
    /// Parses `"approximate"` or `"exact"` (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approximate" | "approx" => Some(Self::Approximate),
            "exact" => Some(Self::Exact),
            _ => None,
        }
    }
}

/// Occupancy percentage for a month, clamped to `[0, 100]`.
///
/// Returns 0 when there are no rooms or no days to divide by.
#[must_use]
pub fn occupancy_rate(occupied_room_days: f64, total_rooms: u32, days_in_month: u32) -> f64 {
    let capacity = f64::from(total_rooms) * f64::from(days_in_month);
    if capacity <= 0.0 || !occupied_room_days.is_finite() {
        return 0.0;
    }
    (occupied_room_days / capacity * 100.0).clamp(0.0, 100.0)
}

/// Room-days estimated from a booking count.
#[must_use]
pub fn approximate_room_days(booking_count: u32, average_stay_days: f64) -> f64 {
    if !average_stay_days.is_finite() || average_stay_days <= 0.0 {
        return 0.0;
    }
    f64::from(booking_count) * average_stay_days
}

/// Occupied room-nights inside `month`, from actual stay intervals.
///
/// Cancelled bookings and bookings without a check-in are ignored. A
/// missing check-out, or one not after the check-in date, counts as a
/// single night. Stays are keyed by room number, falling back to the
/// booking id, and overlapping nights in the same room count once.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn exact_room_days(records: &[BookingRecord], month: YearMonth, offset: FixedOffset) -> f64 {
    let (Some(month_start), Some(month_end)) = (
        month.first_day(),
        month.plus_months(1).first_day(),
    ) else {
        return 0.0;
    };

    let mut by_room: HashMap<&str, Vec<(NaiveDate, NaiveDate)>> = HashMap::new();
    for record in records {
        if record.status.is_cancelled() {
            continue;
        }
        let Some(check_in) = record.check_in else {
            continue;
        };
        let start = local_date(check_in, offset);
        let end = record
            .check_out
            .map(|at| local_date(at, offset))
            .filter(|end| *end > start)
            .or_else(|| start.succ_opt())
            .unwrap_or(start);

        let clipped_start = start.max(month_start);
        let clipped_end = end.min(month_end);
        if clipped_start >= clipped_end {
            continue;
        }
        let room = record
            .room_number
            .as_deref()
            .unwrap_or_else(|| record.id.as_str());
        by_room
            .entry(room)
            .or_default()
            .push((clipped_start, clipped_end));
    }

    let nights: i64 = by_room.into_values().map(union_length).sum();
    nights as f64
}

/// Total days covered by a set of half-open date intervals.
fn union_length(mut intervals: Vec<(NaiveDate, NaiveDate)>) -> i64 {
    intervals.sort_unstable();
    let mut total = 0;
    let mut current: Option<(NaiveDate, NaiveDate)> = None;
    for (start, end) in intervals {
        current = match current {
            Some((cur_start, cur_end)) if start <= cur_end => Some((cur_start, cur_end.max(end))),
            Some((cur_start, cur_end)) => {
                total += cur_end.signed_duration_since(cur_start).num_days();
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    if let Some((start, end)) = current {
        total += end.signed_duration_since(start).num_days();
    }
    total
}
