//! Categorical breakdowns and whole-set summary statistics.
//!
//! Missing or blank keys are bucketed under a sentinel instead of being
//! dropped, so counts always reconcile with the number of input records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::BookingRecord;
use crate::domain::booking::DEFAULT_ROOM_TYPE;

/// Sentinel for dimensions other than room type.
pub const UNKNOWN_KEY: &str = "Unknown";

/// Counts and revenue for one categorical dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Distribution {
    /// Records per key, including cancelled bookings.
    pub counts: BTreeMap<String, u64>,
    /// Revenue per key, excluding cancelled bookings.
    pub revenue: BTreeMap<String, Decimal>,
}

/// Whole-set booking statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BookingSummary {
    /// All records.
    pub total_bookings: u64,
    /// Records neither cancelled nor completed.
    pub active_bookings: u64,
    /// Cancelled records.
    pub cancelled_bookings: u64,
    /// Cancelled share of all records, in percent.
    pub cancellation_rate: f64,
    /// Revenue of non-cancelled records.
    pub total_revenue: Decimal,
    /// Mean price of non-cancelled records.
    pub average_booking_value: Decimal,
    /// Mean nights of records with a valid check-in and later check-out.
    pub average_stay_nights: f64,
}

/// Counts records per key. `key_fn` returning `None` or a blank string
/// files the record under `sentinel`.
pub fn summarize_by_key<'a, F>(
    records: &'a [BookingRecord],
    key_fn: F,
    sentinel: &str,
) -> BTreeMap<String, u64>
where
    F: Fn(&'a BookingRecord) -> Option<&'a str>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(key_or(key_fn(record), sentinel)).or_insert(0) += 1;
    }
    counts
}

/// Sums non-cancelled revenue per key, with the same sentinel policy as
/// [`summarize_by_key`].
pub fn summarize_revenue_by_key<'a, F>(
    records: &'a [BookingRecord],
    key_fn: F,
    sentinel: &str,
) -> BTreeMap<String, Decimal>
where
    F: Fn(&'a BookingRecord) -> Option<&'a str>,
{
    let mut sums = BTreeMap::new();
    for record in records.iter().filter(|r| !r.status.is_cancelled()) {
        let sum = sums
            .entry(key_or(key_fn(record), sentinel))
            .or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(record.total_price);
    }
    sums
}

fn key_or(key: Option<&str>, sentinel: &str) -> String {
    match key.map(str::trim) {
        Some(k) if !k.is_empty() => k.to_string(),
        _ => sentinel.to_string(),
    }
}

/// Room-type breakdown; untyped rooms count as `"Standard"`.
#[must_use]
pub fn room_type_distribution(records: &[BookingRecord]) -> Distribution {
    Distribution {
        counts: summarize_by_key(records, room_type_key, DEFAULT_ROOM_TYPE),
        revenue: summarize_revenue_by_key(records, room_type_key, DEFAULT_ROOM_TYPE),
    }
}

/// Payment-method breakdown; unknown methods count as `"Unknown"`.
#[must_use]
pub fn payment_method_distribution(records: &[BookingRecord]) -> Distribution {
    Distribution {
        counts: summarize_by_key(records, payment_method_key, UNKNOWN_KEY),
        revenue: summarize_revenue_by_key(records, payment_method_key, UNKNOWN_KEY),
    }
}

fn room_type_key(record: &BookingRecord) -> Option<&str> {
    Some(record.room_type.as_str())
}

fn payment_method_key(record: &BookingRecord) -> Option<&str> {
    record.payment_method.as_deref()
}

/// Records per status, keyed by the status wire name.
#[must_use]
pub fn status_counts(records: &[BookingRecord]) -> BTreeMap<String, u64> {
    summarize_by_key(records, |r| Some(r.status.as_str()), UNKNOWN_KEY)
}

/// Totals, cancellation rate and averages over all records.
#[must_use]
pub fn summarize_bookings(records: &[BookingRecord]) -> BookingSummary {
    let total = records.len() as u64;
    let cancelled = records.iter().filter(|r| r.status.is_cancelled()).count() as u64;
    let active = records.iter().filter(|r| r.status.is_active()).count() as u64;

    let paying: Vec<&BookingRecord> = records.iter().filter(|r| !r.status.is_cancelled()).collect();
    let total_revenue = paying
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.total_price));
    let average_booking_value = if paying.is_empty() {
        Decimal::ZERO
    } else {
        (total_revenue / Decimal::from(paying.len())).round_dp(2)
    };

    let stays: Vec<i64> = records
        .iter()
        .filter_map(|r| match (r.check_in, r.check_out) {
            (Some(check_in), Some(check_out)) if check_out > check_in => {
                Some((check_out - check_in).num_hours())
            }
            _ => None,
        })
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let average_stay_nights = if stays.is_empty() {
        0.0
    } else {
        stays.iter().sum::<i64>() as f64 / 24.0 / stays.len() as f64
    };

    #[allow(clippy::cast_precision_loss)]
    let cancellation_rate = if total == 0 {
        0.0
    } else {
        cancelled as f64 / total as f64 * 100.0
    };

    BookingSummary {
        total_bookings: total,
        active_bookings: active,
        cancelled_bookings: cancelled,
        cancellation_rate,
        total_revenue,
        average_booking_value,
        average_stay_nights,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BookingDocument, BookingStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn record(room_type: &str, payment: Option<&str>, price: i64, status: BookingStatus) -> BookingRecord {
        let mut record = BookingDocument::default().normalize();
        record.room_type = room_type.to_string();
        record.payment_method = payment.map(str::to_string);
        record.total_price = Decimal::from(price);
        record.status = status;
        record
    }

    #[test]
    fn counts_reconcile_with_input() {
        let records = vec![
            record("Deluxe", Some("cash"), 100, BookingStatus::Confirmed),
            record("Deluxe", None, 200, BookingStatus::Cancelled),
            record("Suite", Some(" "), 300, BookingStatus::Completed),
            record("", Some("card"), 400, BookingStatus::Pending),
        ];
        let rooms = room_type_distribution(&records);
        assert_eq!(rooms.counts.values().sum::<u64>(), 4);
        assert_eq!(rooms.counts.get("Deluxe"), Some(&2));
        assert_eq!(rooms.counts.get("Standard"), Some(&1));

        let payments = payment_method_distribution(&records);
        assert_eq!(payments.counts.values().sum::<u64>(), 4);
        assert_eq!(payments.counts.get(UNKNOWN_KEY), Some(&2));
    }

    #[test]
    fn revenue_excludes_cancelled() {
        let records = vec![
            record("Deluxe", Some("cash"), 100, BookingStatus::Confirmed),
            record("Deluxe", Some("cash"), 200, BookingStatus::Cancelled),
        ];
        let rooms = room_type_distribution(&records);
        assert_eq!(rooms.revenue.get("Deluxe"), Some(&Decimal::from(100)));
    }

    #[test]
    fn status_counts_use_wire_names() {
        let records = vec![
            record("Suite", None, 1, BookingStatus::CheckedIn),
            record("Suite", None, 1, BookingStatus::CheckedIn),
        ];
        assert_eq!(status_counts(&records).get("checked-in"), Some(&2));
    }

    #[test]
    fn summary_over_mixed_records() {
        let Some(start) = Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).single() else {
            panic!("valid date");
        };
        let mut a = record("Suite", None, 100, BookingStatus::Completed);
        a.check_in = Some(start);
        a.check_out = Some(start + Duration::days(2));
        let mut b = record("Suite", None, 200, BookingStatus::Confirmed);
        b.check_in = Some(start);
        b.check_out = Some(start + Duration::days(4));
        let c = record("Suite", None, 999, BookingStatus::Cancelled);
        let d = record("Suite", None, 0, BookingStatus::Pending);

        let summary = summarize_bookings(&[a, b, c, d]);
        assert_eq!(summary.total_bookings, 4);
        assert_eq!(summary.active_bookings, 2);
        assert_eq!(summary.cancelled_bookings, 1);
        assert!((summary.cancellation_rate - 25.0).abs() < 1e-9);
        assert_eq!(summary.total_revenue, Decimal::from(300));
        assert_eq!(summary.average_booking_value, Decimal::from(100));
        assert!((summary.average_stay_nights - 3.0).abs() < 1e-9);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        assert_eq!(summarize_bookings(&[]), BookingSummary::default());
    }
}
