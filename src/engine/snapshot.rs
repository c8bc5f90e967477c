//! The metrics engine and the snapshot it produces.
//!
//! [`MetricsEngine::snapshot`] is a pure function of the record set, the
//! injected `now`, the engine configuration and the random source. Every
//! call rebuilds the whole [`MetricsSnapshot`]; nothing is cached between
//! calls.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use utoipa::ToSchema;

use super::aggregate::{MonthBucket, aggregate};
use super::distribution::{
    BookingSummary, Distribution, payment_method_distribution, room_type_distribution,
    status_counts, summarize_bookings,
};
use super::engine_config::EngineConfig;
use super::forecast::{clamp_occupancy, floor_at_zero, forecast};
use super::format::{format_currency, format_percent};
use super::trends::{growth_rate, seasonal_factors};
use crate::domain::BookingRecord;
use crate::error::MetricsError;

/// Scalar dashboard metrics.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HeadlineMetrics {
    /// Active bookings checking in today.
    pub today_check_ins: u32,
    /// Non-cancelled bookings checking out today.
    pub today_check_outs: u32,
    /// Rooms free right now.
    pub available_rooms: u32,
    /// Rooms held right now.
    pub occupied_rooms: u32,
    /// Rooms in the property.
    pub total_rooms: u32,
    /// Non-cancelled bookings checking in this month.
    pub month_booking_count: u32,
    /// Revenue of this month's non-cancelled bookings.
    pub month_revenue: Decimal,
    /// `month_revenue` formatted with the configured currency symbol.
    pub month_revenue_display: String,
    /// Share of rooms held right now, in percent.
    pub occupancy_rate: f64,
    /// `occupancy_rate` formatted, e.g. `"72.2%"`.
    pub occupancy_rate_display: String,
    /// Month-over-month revenue change, in percent.
    pub revenue_growth: f64,
    /// Month-over-month booking-count change, in percent.
    pub booking_growth: f64,
}

/// Forecast values for the periods after the window.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastSet {
    /// Strategy that produced the values.
    pub strategy: String,
    /// Labels of the forecast months.
    pub labels: Vec<String>,
    /// Projected revenue, floored at zero.
    pub revenue: Vec<f64>,
    /// Projected occupancy, clamped to `[0, 100]`.
    pub occupancy: Vec<f64>,
    /// Projected booking counts, floored at zero.
    pub bookings: Vec<f64>,
}

/// Everything the dashboard renders, rebuilt from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MetricsSnapshot {
    /// The instant the snapshot describes.
    pub generated_at: DateTime<Utc>,
    /// Scalar metrics.
    pub headline: HeadlineMetrics,
    /// Trailing monthly buckets, oldest first.
    pub monthly: Vec<MonthBucket>,
    /// Projections after the window.
    pub forecast: ForecastSet,
    /// Revenue seasonality per calendar month, January first.
    pub seasonal_factors: Vec<f64>,
    /// Room-type breakdown.
    pub room_types: Distribution,
    /// Payment-method breakdown.
    pub payment_methods: Distribution,
    /// Records per status.
    pub statuses: BTreeMap<String, u64>,
    /// Whole-set statistics.
    pub summary: BookingSummary,
}

/// Stateless analytics engine holding only validated configuration.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    config: EngineConfig,
}

impl MetricsEngine {
    /// Creates an engine after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::InvalidConfig`] if any parameter is out of
    /// range (for example zero rooms).
    pub fn new(config: EngineConfig) -> Result<Self, MetricsError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds a complete snapshot of `records` as of `now`.
    ///
    /// `rng` feeds forecast jitter only; pass a seeded generator for
    /// reproducible output.
    #[must_use]
    pub fn snapshot(
        &self,
        records: &[BookingRecord],
        now: DateTime<Utc>,
        rng: &mut fastrand::Rng,
    ) -> MetricsSnapshot {
        let config = &self.config;
        let aggregation = aggregate(records, now, config);

        let empty_current = MonthBucket::empty(super::dates::YearMonth::of(aggregation.today.date));
        let current = aggregation.current_month().unwrap_or(&empty_current);
        let previous = aggregation.previous_month();

        let revenue_growth = previous.map_or(0.0, |prev| {
            growth_rate(decimal_to_f64(prev.revenue), decimal_to_f64(current.revenue))
        });
        let booking_growth = previous.map_or(0.0, |prev| {
            growth_rate(f64::from(prev.booking_count), f64::from(current.booking_count))
        });

        let occupancy_rate = if config.total_rooms == 0 {
            0.0
        } else {
            f64::from(aggregation.today.occupied_rooms) / f64::from(config.total_rooms) * 100.0
        };

        let headline = HeadlineMetrics {
            today_check_ins: aggregation.today.check_ins,
            today_check_outs: aggregation.today.check_outs,
            available_rooms: aggregation.today.available_rooms,
            occupied_rooms: aggregation.today.occupied_rooms,
            total_rooms: config.total_rooms,
            month_booking_count: current.booking_count,
            month_revenue: current.revenue,
            month_revenue_display: format_currency(current.revenue, &config.currency_symbol),
            occupancy_rate,
            occupancy_rate_display: format_percent(occupancy_rate),
            revenue_growth,
            booking_growth,
        };

        let forecast = self.forecast_set(&aggregation.monthly, current, rng);

        MetricsSnapshot {
            generated_at: now,
            headline,
            seasonal_factors: seasonal_factors(&aggregation.monthly).to_vec(),
            monthly: aggregation.monthly,
            forecast,
            room_types: room_type_distribution(records),
            payment_methods: payment_method_distribution(records),
            statuses: status_counts(records),
            summary: summarize_bookings(records),
        }
    }

    fn forecast_set(
        &self,
        monthly: &[MonthBucket],
        current: &MonthBucket,
        rng: &mut fastrand::Rng,
    ) -> ForecastSet {
        let horizon = self.config.forecast_horizon;
        let strategy = self.config.forecast_strategy;

        let revenue: Vec<f64> = monthly.iter().map(|b| decimal_to_f64(b.revenue)).collect();
        let occupancy: Vec<f64> = monthly.iter().map(|b| b.occupancy_rate).collect();
        let bookings: Vec<f64> = monthly.iter().map(|b| f64::from(b.booking_count)).collect();

        let labels = (1..=horizon)
            .map(|step| {
                let step = u32::try_from(step).unwrap_or(u32::MAX);
                current.year_month().plus_months(step).label()
            })
            .collect();

        ForecastSet {
            strategy: strategy.name().to_string(),
            labels,
            revenue: floor_at_zero(forecast(&revenue, horizon, strategy, rng)),
            occupancy: clamp_occupancy(forecast(&occupancy, horizon, strategy, rng)),
            bookings: floor_at_zero(forecast(&bookings, horizon, strategy, rng)),
        }
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BookingDocument, BookingStatus};
    use crate::engine::forecast::ForecastStrategy;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        let Some(at) = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).single() else {
            panic!("valid date");
        };
        at
    }

    fn engine(config: EngineConfig) -> MetricsEngine {
        let Ok(engine) = MetricsEngine::new(config) else {
            panic!("valid config");
        };
        engine
    }

    fn booking(days_ago: i64, price: i64, status: BookingStatus) -> BookingRecord {
        let mut record = BookingDocument::default().normalize();
        record.check_in = Some(now() - Duration::days(days_ago));
        record.check_out = Some(now() - Duration::days(days_ago) + Duration::days(2));
        record.total_price = Decimal::from(price);
        record.status = status;
        record
    }

    #[test]
    fn rejects_invalid_config() {
        let result = MetricsEngine::new(EngineConfig {
            total_rooms: 0,
            ..EngineConfig::default()
        });
        assert!(matches!(result, Err(MetricsError::InvalidConfig(_))));
    }

    #[test]
    fn empty_input_gives_populated_zero_snapshot() {
        let engine = engine(EngineConfig::default());
        let snapshot = engine.snapshot(&[], now(), &mut fastrand::Rng::with_seed(1));
        assert_eq!(snapshot.monthly.len(), 12);
        assert_eq!(snapshot.forecast.revenue, vec![0.0; 3]);
        assert_eq!(snapshot.forecast.labels, vec!["Jul 2024", "Aug 2024", "Sep 2024"]);
        assert_eq!(snapshot.seasonal_factors.len(), 12);
        assert_eq!(snapshot.headline.available_rooms, 36);
        assert_eq!(snapshot.headline.month_revenue_display, "$0.00");
        assert_eq!(snapshot.headline.occupancy_rate_display, "0.0%");
        assert!(snapshot.room_types.counts.is_empty());
        assert_eq!(snapshot.summary.total_bookings, 0);
    }

    #[test]
    fn headline_reflects_current_month_and_today() {
        let records = vec![
            booking(1, 1000, BookingStatus::CheckedIn),
            booking(1, 2000, BookingStatus::Cancelled),
            booking(35, 500, BookingStatus::Completed),
        ];
        let engine = engine(EngineConfig {
            total_rooms: 4,
            ..EngineConfig::default()
        });
        let snapshot = engine.snapshot(&records, now(), &mut fastrand::Rng::with_seed(1));
        let headline = &snapshot.headline;
        assert_eq!(headline.month_revenue, Decimal::from(1000));
        assert_eq!(headline.month_revenue_display, "$1,000.00");
        assert_eq!(headline.month_booking_count, 1);
        assert_eq!(headline.occupied_rooms, 1);
        assert_eq!(headline.available_rooms, 3);
        assert!((headline.occupancy_rate - 25.0).abs() < 1e-9);
        assert_eq!(headline.occupancy_rate_display, "25.0%");
        assert!((headline.revenue_growth - 100.0).abs() < 1e-9);
        assert!(headline.booking_growth.abs() < 1e-9);
    }

    #[test]
    fn seeded_snapshots_are_identical() {
        let records = vec![
            booking(3, 1200, BookingStatus::Confirmed),
            booking(40, 900, BookingStatus::Completed),
            booking(75, 1500, BookingStatus::Completed),
        ];
        let engine = engine(EngineConfig {
            forecast_strategy: ForecastStrategy::TrailingAverage { jitter: 0.1 },
            ..EngineConfig::default()
        });
        let a = engine.snapshot(&records, now(), &mut fastrand::Rng::with_seed(11));
        let b = engine.snapshot(&records, now(), &mut fastrand::Rng::with_seed(11));
        assert_eq!(a, b);
    }

    #[test]
    fn forecast_respects_bounds_and_horizon() {
        let records: Vec<BookingRecord> = (0..200)
            .map(|i| booking(i % 90, 100, BookingStatus::Completed))
            .collect();
        let engine = engine(EngineConfig {
            total_rooms: 2,
            forecast_horizon: 5,
            forecast_strategy: ForecastStrategy::TrailingAverage { jitter: 0.1 },
            ..EngineConfig::default()
        });
        let snapshot = engine.snapshot(&records, now(), &mut fastrand::Rng::with_seed(5));
        assert_eq!(snapshot.forecast.labels.len(), 5);
        assert_eq!(snapshot.forecast.occupancy.len(), 5);
        assert!(snapshot
            .forecast
            .occupancy
            .iter()
            .all(|v| (0.0..=100.0).contains(v)));
        assert!(snapshot.forecast.revenue.iter().all(|v| *v >= 0.0));
        assert_eq!(snapshot.forecast.strategy, "trailing_average");
    }

    #[test]
    fn revenue_is_conserved_across_buckets() {
        let mut undated = booking(0, 777, BookingStatus::Confirmed);
        undated.check_in = None;
        let records = vec![
            booking(2, 100, BookingStatus::Confirmed),
            booking(60, 250, BookingStatus::Completed),
            booking(200, 400, BookingStatus::Completed),
            booking(20, 999, BookingStatus::Cancelled),
            booking(500, 1234, BookingStatus::Completed),
            undated,
        ];
        let engine = engine(EngineConfig::default());
        let snapshot = engine.snapshot(&records, now(), &mut fastrand::Rng::with_seed(1));
        let total: Decimal = snapshot.monthly.iter().map(|b| b.revenue).sum();
        assert_eq!(total, Decimal::from(750));
    }

    #[test]
    fn revenue_saturates_instead_of_overflowing() {
        let records: Vec<BookingRecord> = (0..2)
            .map(|i| {
                let Ok(doc) = serde_json::from_value::<BookingDocument>(serde_json::json!({
                    "id": format!("whale-{i}"),
                    "checkIn": (now() - Duration::days(1)).to_rfc3339(),
                    "totalPrice": "79228162514264337593543950335",
                    "status": "confirmed",
                    "roomType": "Suite",
                    "paymentMethod": "card",
                })) else {
                    panic!("document must deserialize");
                };
                doc.normalize()
            })
            .collect();
        assert!(records.iter().all(|r| r.total_price == Decimal::MAX));

        let engine = engine(EngineConfig::default());
        let snapshot = engine.snapshot(&records, now(), &mut fastrand::Rng::with_seed(1));
        assert_eq!(snapshot.headline.month_revenue, Decimal::MAX);
        assert_eq!(snapshot.summary.total_revenue, Decimal::MAX);
        assert_eq!(snapshot.room_types.revenue.get("Suite"), Some(&Decimal::MAX));
        assert_eq!(snapshot.payment_methods.revenue.get("card"), Some(&Decimal::MAX));
    }
}
