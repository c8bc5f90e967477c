//! Short-horizon forecasts for chart projections.
//!
//! Neither strategy is statistically grounded. They exist to extend a
//! monthly series with plausible next values, and callers must not treat
//! the output as a prediction. The random source is always injected so
//! seeded runs are reproducible.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of trailing values averaged by [`ForecastStrategy::TrailingAverage`].
pub const TRAILING_WINDOW: usize = 3;

/// Default smoothing factor for [`ForecastStrategy::ExponentialSmoothing`].
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Default jitter bound (±10%) for [`ForecastStrategy::TrailingAverage`].
pub const DEFAULT_JITTER: f64 = 0.1;

/// Forecasting strategy and its tuning parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastStrategy {
    /// Mean of the last three known values times `1 + U[-jitter, jitter]`.
    TrailingAverage {
        /// Relative noise bound, e.g. `0.1` for ±10%.
        jitter: f64,
    },
    /// `f[i] = alpha * last_actual + (1 - alpha) * f[i-1]`, seeded with the
    /// last actual value.
    ExponentialSmoothing {
        /// Smoothing factor in `(0, 1]`.
        alpha: f64,
    },
}

impl Default for ForecastStrategy {
    fn default() -> Self {
        Self::ExponentialSmoothing {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl ForecastStrategy {
    /// Builds a strategy from its configuration name.
    ///
    /// Accepts `smoothing`/`exponential_smoothing` and
    /// `trailing_average`/`average`.
    #[must_use]
    pub fn from_name(name: &str, alpha: f64, jitter: f64) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "smoothing" | "exponential_smoothing" => Some(Self::ExponentialSmoothing { alpha }),
            "trailing_average" | "average" => Some(Self::TrailingAverage { jitter }),
            _ => None,
        }
    }

    /// Short name used in snapshots.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TrailingAverage { .. } => "trailing_average",
            Self::ExponentialSmoothing { .. } => "exponential_smoothing",
        }
    }
}

/// Produces `horizon` values following `series`.
///
/// An empty series forecasts zeros. Output values are unclamped; use
/// [`clamp_occupancy`] or [`floor_at_zero`] for bounded quantities.
#[must_use]
pub fn forecast(
    series: &[f64],
    horizon: usize,
    strategy: ForecastStrategy,
    rng: &mut fastrand::Rng,
) -> Vec<f64> {
    match strategy {
        ForecastStrategy::TrailingAverage { jitter } => {
            trailing_average(series, horizon, jitter, rng)
        }
        ForecastStrategy::ExponentialSmoothing { alpha } => {
            exponential_smoothing(series, horizon, alpha)
        }
    }
}

fn trailing_average(
    series: &[f64],
    horizon: usize,
    jitter: f64,
    rng: &mut fastrand::Rng,
) -> Vec<f64> {
    let mut history: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
    let mut out = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        let tail = history.len().saturating_sub(TRAILING_WINDOW);
        let window = history.get(tail..).unwrap_or_default();
        let mean = mean(window);
        let noise = if jitter > 0.0 {
            (rng.f64() * 2.0 - 1.0) * jitter
        } else {
            0.0
        };
        let next = mean * (1.0 + noise);
        history.push(next);
        out.push(next);
    }
    out
}

fn exponential_smoothing(series: &[f64], horizon: usize, alpha: f64) -> Vec<f64> {
    let last_actual = series
        .iter()
        .rev()
        .copied()
        .find(|v| v.is_finite())
        .unwrap_or(0.0);
    let mut previous = last_actual;
    let mut out = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        let next = alpha * last_actual + (1.0 - alpha) * previous;
        out.push(next);
        previous = next;
    }
    out
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let len = values.len() as f64;
    values.iter().sum::<f64>() / len
}

/// Clamps occupancy percentages to `[0, 100]`.
#[must_use]
pub fn clamp_occupancy(values: Vec<f64>) -> Vec<f64> {
    values.into_iter().map(|v| v.clamp(0.0, 100.0)).collect()
}

/// Floors revenue and count forecasts at zero.
#[must_use]
pub fn floor_at_zero(values: Vec<f64>) -> Vec<f64> {
    values.into_iter().map(|v| v.max(0.0)).collect()
}
