//! Booking analytics engine.
//!
//! Pure, synchronous transformations from a materialized set of
//! [`crate::domain::BookingRecord`]s to a [`MetricsSnapshot`]. The engine
//! performs no I/O and keeps no state between calls; "now" and the random
//! source are always supplied by the caller.
//!
//! - [`dates`]: date normalization and calendar helpers
//! - [`aggregate`]: monthly binning and today's front-desk metrics
//! - [`occupancy`]: approximate and exact occupancy
//! - [`forecast`]: short-horizon projections
//! - [`trends`]: growth rates and seasonal factors
//! - [`distribution`]: categorical breakdowns and summary statistics
//! - [`snapshot`]: [`MetricsEngine`] and the snapshot it produces
//! - [`chart`]: `{labels, series}` chart views

pub mod aggregate;
pub mod chart;
pub mod dates;
pub mod distribution;
pub mod engine_config;
pub mod forecast;
pub mod format;
pub mod occupancy;
pub mod snapshot;
pub mod trends;

pub use aggregate::{Aggregation, MonthBucket, TodayMetrics, aggregate};
pub use chart::{ChartData, ChartKind, ChartSeries, chart};
pub use distribution::{BookingSummary, Distribution};
pub use engine_config::EngineConfig;
pub use forecast::ForecastStrategy;
pub use occupancy::OccupancyMode;
pub use snapshot::{ForecastSet, HeadlineMetrics, MetricsEngine, MetricsSnapshot};
