//! Engine tuning: room count, window, forecast and occupancy settings.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::forecast::{DEFAULT_ALPHA, ForecastStrategy};
use super::occupancy::OccupancyMode;
use crate::error::MetricsError;

/// Largest supported trailing window (ten years of months).
pub const MAX_WINDOW_MONTHS: u32 = 120;

/// Largest supported forecast horizon.
pub const MAX_FORECAST_HORIZON: usize = 24;

/// Parameters of a [`super::MetricsEngine`].
///
/// Deserialization fills absent fields from [`EngineConfig::default`], so
/// request bodies may override only what they need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Rooms in the property.
    pub total_rooms: u32,
    /// Length of the trailing monthly window.
    pub window_months: u32,
    /// Number of forecast periods.
    pub forecast_horizon: usize,
    /// Forecasting strategy.
    pub forecast_strategy: ForecastStrategy,
    /// Nights per booking assumed by approximate occupancy.
    pub average_stay_days: f64,
    /// Occupancy derivation mode.
    pub occupancy_mode: OccupancyMode,
    /// Reporting time zone as minutes east of UTC.
    pub utc_offset_minutes: i32,
    /// Currency symbol used in formatted amounts.
    pub currency_symbol: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            total_rooms: 36,
            window_months: 12,
            forecast_horizon: 3,
            forecast_strategy: ForecastStrategy::ExponentialSmoothing {
                alpha: DEFAULT_ALPHA,
            },
            average_stay_days: 2.0,
            occupancy_mode: OccupancyMode::Approximate,
            utc_offset_minutes: 0,
            currency_symbol: "$".to_string(),
        }
    }
}

impl EngineConfig {
    /// Reporting time zone. Out-of-range offsets fall back to UTC.
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    /// Checks every parameter is within range.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::InvalidConfig`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<(), MetricsError> {
        if self.total_rooms == 0 {
            return Err(invalid("total_rooms must be greater than 0"));
        }
        if self.window_months == 0 || self.window_months > MAX_WINDOW_MONTHS {
            return Err(invalid(format!(
                "window_months must be between 1 and {MAX_WINDOW_MONTHS}"
            )));
        }
        if self.forecast_horizon == 0 || self.forecast_horizon > MAX_FORECAST_HORIZON {
            return Err(invalid(format!(
                "forecast_horizon must be between 1 and {MAX_FORECAST_HORIZON}"
            )));
        }
        match self.forecast_strategy {
            ForecastStrategy::ExponentialSmoothing { alpha }
                if !(alpha > 0.0 && alpha <= 1.0) =>
            {
                return Err(invalid("alpha must be in (0, 1]"));
            }
            ForecastStrategy::TrailingAverage { jitter } if !(0.0..1.0).contains(&jitter) => {
                return Err(invalid("jitter must be in [0, 1)"));
            }
            _ => {}
        }
        if !(self.average_stay_days.is_finite() && self.average_stay_days > 0.0) {
            return Err(invalid("average_stay_days must be positive"));
        }
        if FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).is_none() {
            return Err(invalid("utc_offset_minutes must be within ±24h"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> MetricsError {
    MetricsError::InvalidConfig(message.into())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_rooms_rejected() {
        let config = EngineConfig {
            total_rooms: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MetricsError::InvalidConfig(msg)) if msg.contains("total_rooms")
        ));
    }

    #[test]
    fn window_and_horizon_bounds() {
        let zero_window = EngineConfig {
            window_months: 0,
            ..EngineConfig::default()
        };
        assert!(zero_window.validate().is_err());

        let long_horizon = EngineConfig {
            forecast_horizon: MAX_FORECAST_HORIZON + 1,
            ..EngineConfig::default()
        };
        assert!(long_horizon.validate().is_err());
    }

    #[test]
    fn strategy_parameters_checked() {
        let bad_alpha = EngineConfig {
            forecast_strategy: ForecastStrategy::ExponentialSmoothing { alpha: 0.0 },
            ..EngineConfig::default()
        };
        assert!(bad_alpha.validate().is_err());

        let bad_jitter = EngineConfig {
            forecast_strategy: ForecastStrategy::TrailingAverage { jitter: 1.5 },
            ..EngineConfig::default()
        };
        assert!(bad_jitter.validate().is_err());

        let trailing = EngineConfig {
            forecast_strategy: ForecastStrategy::TrailingAverage {
                jitter: crate::engine::forecast::DEFAULT_JITTER,
            },
            ..EngineConfig::default()
        };
        assert!(trailing.validate().is_ok());
    }

    #[test]
    fn partial_overrides_deserialize() {
        let Ok(config) = serde_json::from_str::<EngineConfig>(r#"{"total_rooms": 12}"#) else {
            panic!("partial config deserializes");
        };
        assert_eq!(config.total_rooms, 12);
        assert_eq!(config.window_months, 12);
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn offset_falls_back_to_utc() {
        let config = EngineConfig {
            utc_offset_minutes: 480,
            ..EngineConfig::default()
        };
        assert_eq!(config.offset().local_minus_utc(), 480 * 60);

        let broken = EngineConfig {
            utc_offset_minutes: 100_000,
            ..EngineConfig::default()
        };
        assert_eq!(broken.offset().local_minus_utc(), 0);
        assert!(broken.validate().is_err());
    }
}
