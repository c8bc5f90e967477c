//! Chart-ready views of a [`MetricsSnapshot`].
//!
//! Every chart is `{labels, series[]}` where each series has one value per
//! label. Actual and forecast series share the label axis; positions a
//! series does not cover are `null`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use utoipa::ToSchema;

use super::aggregate::MonthBucket;
use super::distribution::Distribution;
use super::snapshot::MetricsSnapshot;
use crate::error::MetricsError;

/// Charts the engine can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Monthly revenue plus forecast.
    Revenue,
    /// Monthly occupancy plus forecast.
    Occupancy,
    /// Monthly booking counts plus forecast.
    Bookings,
    /// Counts and revenue per room type.
    RoomTypes,
    /// Counts and revenue per payment method.
    PaymentMethods,
    /// Records per status.
    Statuses,
}

impl ChartKind {
    /// Every chart, in dashboard order.
    pub const ALL: [Self; 6] = [
        Self::Revenue,
        Self::Occupancy,
        Self::Bookings,
        Self::RoomTypes,
        Self::PaymentMethods,
        Self::Statuses,
    ];

    /// URL name of the chart.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Occupancy => "occupancy",
            Self::Bookings => "bookings",
            Self::RoomTypes => "room-types",
            Self::PaymentMethods => "payment-methods",
            Self::Statuses => "statuses",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| MetricsError::UnknownChart(s.to_string()))
    }
}

/// One named line or bar set.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartSeries {
    /// Legend name.
    pub name: String,
    /// One entry per chart label; `null` where the series has no value.
    pub values: Vec<Option<f64>>,
}

/// Labels plus aligned series.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartData {
    /// Chart name.
    pub chart: String,
    /// X-axis labels.
    pub labels: Vec<String>,
    /// Series aligned with `labels`.
    pub series: Vec<ChartSeries>,
}

/// Renders `kind` from `snapshot`.
#[must_use]
pub fn chart(snapshot: &MetricsSnapshot, kind: ChartKind) -> ChartData {
    let (labels, series) = match kind {
        ChartKind::Revenue => time_series(snapshot, &snapshot.forecast.revenue, |b| {
            b.revenue.to_f64().unwrap_or(0.0)
        }),
        ChartKind::Occupancy => {
            time_series(snapshot, &snapshot.forecast.occupancy, |b| b.occupancy_rate)
        }
        ChartKind::Bookings => time_series(snapshot, &snapshot.forecast.bookings, |b| {
            f64::from(b.booking_count)
        }),
        ChartKind::RoomTypes => categorical(&snapshot.room_types),
        ChartKind::PaymentMethods => categorical(&snapshot.payment_methods),
        ChartKind::Statuses => {
            #[allow(clippy::cast_precision_loss)]
            let values = snapshot.statuses.values().map(|c| Some(*c as f64)).collect();
            (
                snapshot.statuses.keys().cloned().collect(),
                vec![ChartSeries {
                    name: "Bookings".to_string(),
                    values,
                }],
            )
        }
    };
    ChartData {
        chart: kind.as_str().to_string(),
        labels,
        series,
    }
}

fn time_series(
    snapshot: &MetricsSnapshot,
    projected: &[f64],
    actual_of: impl Fn(&MonthBucket) -> f64,
) -> (Vec<String>, Vec<ChartSeries>) {
    let labels = snapshot
        .monthly
        .iter()
        .map(|b| b.label.clone())
        .chain(snapshot.forecast.labels.iter().cloned())
        .collect();

    let actual = snapshot
        .monthly
        .iter()
        .map(|b| Some(actual_of(b)))
        .chain(projected.iter().map(|_| None))
        .collect();
    let forecast = snapshot
        .monthly
        .iter()
        .map(|_| None)
        .chain(projected.iter().copied().map(Some))
        .collect();

    (
        labels,
        vec![
            ChartSeries {
                name: "Actual".to_string(),
                values: actual,
            },
            ChartSeries {
                name: "Forecast".to_string(),
                values: forecast,
            },
        ],
    )
}

fn categorical(distribution: &Distribution) -> (Vec<String>, Vec<ChartSeries>) {
    let labels: Vec<String> = distribution.counts.keys().cloned().collect();
    #[allow(clippy::cast_precision_loss)]
    let counts = distribution
        .counts
        .values()
        .map(|c| Some(*c as f64))
        .collect();
    // Revenue keys are a subset of count keys; cancelled-only keys get 0.
    let revenue = labels
        .iter()
        .map(|key| {
            Some(
                distribution
                    .revenue
                    .get(key)
                    .and_then(ToPrimitive::to_f64)
                    .unwrap_or(0.0),
            )
        })
        .collect();
    (
        labels,
        vec![
            ChartSeries {
                name: "Bookings".to_string(),
                values: counts,
            },
            ChartSeries {
                name: "Revenue".to_string(),
                values: revenue,
            },
        ],
    )
}
