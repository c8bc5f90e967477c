//! Date normalization and calendar helpers.
//!
//! [`normalize`] converts every [`RawDate`] encoding to a single
//! `DateTime<Utc>`, or `None` when the value is unusable. Callers exclude
//! `None` from date-bucketed aggregates; nothing here defaults to "now".

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, Utc};

use crate::domain::RawDate;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Normalizes a raw date to an instant.
///
/// Variants are tried in a fixed priority: timestamp wrapper, native
/// instant, object-with-seconds, epoch milliseconds, text. Non-finite or
/// out-of-range numbers and unparseable text yield `None`.
#[must_use]
pub fn normalize(raw: &RawDate) -> Option<DateTime<Utc>> {
    match raw {
        RawDate::Timestamp {
            seconds,
            nanoseconds,
        } => from_timestamp_parts(*seconds, *nanoseconds),
        RawDate::Instant(at) => Some(*at),
        RawDate::Seconds(seconds) => from_timestamp_parts(*seconds, 0.0),
        RawDate::EpochMillis(ms) => from_epoch_millis(*ms),
        RawDate::Text(text) => parse_text(text),
        RawDate::Missing => None,
    }
}

fn from_timestamp_parts(seconds: f64, nanoseconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() || !nanoseconds.is_finite() {
        return None;
    }
    let whole = seconds.trunc();
    if whole.abs() > i64::MAX as f64 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let secs = whole as i64;
    // Fractional seconds (rare, but valid JSON) fold into the nanos.
    let frac_nanos = (seconds - whole) * 1e9 + nanoseconds;
    if !(0.0..1e9).contains(&frac_nanos) {
        #[allow(clippy::cast_possible_truncation)]
        let millis = (seconds * 1000.0 + nanoseconds / 1e6).round() as i64;
        return DateTime::from_timestamp_millis(millis);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = frac_nanos as u32;
    DateTime::from_timestamp(secs, nanos)
}

fn from_epoch_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() || ms.abs() > i64::MAX as f64 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = ms.round() as i64;
    DateTime::from_timestamp_millis(millis)
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Calendar date of `at` in the reporting time zone.
#[must_use]
pub fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1–12.
    pub month: u32,
}

impl YearMonth {
    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in the month; 0 for an invalid month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        let Some(first) = self.first_day() else {
            return 0;
        };
        first
            .checked_add_months(Months::new(1))
            .map_or(0, |next| {
                u32::try_from(next.signed_duration_since(first).num_days()).unwrap_or(0)
            })
    }

    /// The month `count` months before this one.
    #[must_use]
    pub fn minus_months(&self, count: u32) -> Self {
        self.shift(-i64::from(count))
    }

    /// The month `count` months after this one.
    #[must_use]
    pub fn plus_months(&self, count: u32) -> Self {
        self.shift(i64::from(count))
    }

    fn shift(&self, delta: i64) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + delta;
        let year = i32::try_from(index.div_euclid(12)).unwrap_or(self.year);
        let month = u32::try_from(index.rem_euclid(12) + 1).unwrap_or(self.month);
        Self { year, month }
    }

    /// Short chart label such as `"Mar 2024"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.first_day()
            .map_or_else(|| format!("{}-{:02}", self.year, self.month), |d| d.format("%b %Y").to_string())
    }
}
