//! Revenue, booking-count and occupancy binning over a trailing window.
//!
//! [`aggregate`] always returns exactly `window_months` buckets, oldest
//! first, ending at the month containing `now`. Empty months are present
//! with zero values.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::dates::{YearMonth, local_date};
use super::engine_config::EngineConfig;
use super::occupancy::{
    OccupancyMode, approximate_room_days, exact_room_days, occupancy_rate,
};
use crate::domain::BookingRecord;

/// Accumulated metrics for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthBucket {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1–12.
    pub month: u32,
    /// Chart label, e.g. `"Mar 2024"`.
    pub label: String,
    /// Revenue of non-cancelled bookings checking in this month.
    pub revenue: Decimal,
    /// Non-cancelled bookings checking in this month.
    pub booking_count: u32,
    /// Occupied room-days (estimated or exact, per configuration).
    pub occupancy_room_days: f64,
    /// Occupancy percentage in `[0, 100]`.
    pub occupancy_rate: f64,
}

impl MonthBucket {
    /// A zeroed bucket for `month`.
    #[must_use]
    pub fn empty(month: YearMonth) -> Self {
        Self {
            year: month.year,
            month: month.month,
            label: month.label(),
            revenue: Decimal::ZERO,
            booking_count: 0,
            occupancy_room_days: 0.0,
            occupancy_rate: 0.0,
        }
    }

    /// The calendar month this bucket covers.
    #[must_use]
    pub const fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }
}

/// Front-desk metrics for the current day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TodayMetrics {
    /// Reporting-zone calendar date of `now`.
    pub date: NaiveDate,
    /// Active bookings checking in today.
    pub check_ins: u32,
    /// Non-cancelled bookings checking out today.
    pub check_outs: u32,
    /// Rooms not held by an active booking spanning `now`.
    pub available_rooms: u32,
    /// Rooms held by an active booking spanning `now`.
    pub occupied_rooms: u32,
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    /// Trailing monthly buckets, oldest first.
    pub monthly: Vec<MonthBucket>,
    /// Today's metrics.
    pub today: TodayMetrics,
}

impl Aggregation {
    /// Bucket of the month containing `now`.
    #[must_use]
    pub fn current_month(&self) -> Option<&MonthBucket> {
        self.monthly.last()
    }

    /// Bucket of the month before the current one, if inside the window.
    #[must_use]
    pub fn previous_month(&self) -> Option<&MonthBucket> {
        self.monthly.iter().rev().nth(1)
    }
}

/// Bins `records` into the trailing window ending at `now`.
///
/// Cancelled bookings and bookings whose check-in could not be normalized
/// are excluded from revenue and counts. Occupancy is clamped to
/// `[0, 100]`; a zero room count yields zero occupancy.
#[must_use]
pub fn aggregate(
    records: &[BookingRecord],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Aggregation {
    let offset = config.offset();
    let today = local_date(now, offset);
    let window = config.window_months.max(1);
    let first = YearMonth::of(today).minus_months(window - 1);

    let mut monthly: Vec<MonthBucket> = (0..window)
        .map(|i| MonthBucket::empty(first.plus_months(i)))
        .collect();

    let mut excluded = 0_usize;
    for record in records {
        if record.status.is_cancelled() {
            continue;
        }
        let Some(check_in) = record.check_in else {
            excluded += 1;
            continue;
        };
        let month = YearMonth::of(local_date(check_in, offset));
        let Some(bucket) = bucket_index(first, month, window).and_then(|i| monthly.get_mut(i))
        else {
            continue;
        };
        bucket.revenue = bucket.revenue.saturating_add(record.total_price);
        bucket.booking_count = bucket.booking_count.saturating_add(1);
    }

    for bucket in &mut monthly {
        let month = bucket.year_month();
        bucket.occupancy_room_days = match config.occupancy_mode {
            OccupancyMode::Approximate => {
                approximate_room_days(bucket.booking_count, config.average_stay_days)
            }
            OccupancyMode::Exact => exact_room_days(records, month, offset),
        };
        bucket.occupancy_rate = occupancy_rate(
            bucket.occupancy_room_days,
            config.total_rooms,
            month.days_in_month(),
        );
    }

    let today = today_metrics(records, now, today, config);

    tracing::debug!(
        records = records.len(),
        undated = excluded,
        window,
        "aggregated bookings"
    );

    Aggregation { monthly, today }
}

fn bucket_index(first: YearMonth, month: YearMonth, window: u32) -> Option<usize> {
    let diff = (i64::from(month.year) - i64::from(first.year)) * 12 + i64::from(month.month)
        - i64::from(first.month);
    if diff < 0 || diff >= i64::from(window) {
        return None;
    }
    usize::try_from(diff).ok()
}

fn today_metrics(
    records: &[BookingRecord],
    now: DateTime<Utc>,
    today: NaiveDate,
    config: &EngineConfig,
) -> TodayMetrics {
    let offset = config.offset();
    let on_today = |at: Option<DateTime<Utc>>| at.is_some_and(|at| local_date(at, offset) == today);

    let check_ins = records
        .iter()
        .filter(|r| r.status.is_active() && on_today(r.check_in))
        .count();
    let check_outs = records
        .iter()
        .filter(|r| !r.status.is_cancelled() && on_today(r.check_out))
        .count();
    let in_house = records
        .iter()
        .filter(|r| r.status.is_active() && r.spans(now))
        .count();

    let in_house = u32::try_from(in_house).unwrap_or(u32::MAX);
    let available_rooms = config.total_rooms.saturating_sub(in_house);

    TodayMetrics {
        date: today,
        check_ins: u32::try_from(check_ins).unwrap_or(u32::MAX),
        check_outs: u32::try_from(check_outs).unwrap_or(u32::MAX),
        available_rooms,
        occupied_rooms: config.total_rooms - available_rooms,
    }
}
