//! Growth rates and seasonal factors over the monthly series.

use rust_decimal::prelude::ToPrimitive;

use super::aggregate::MonthBucket;

/// Percent change from `previous` to `current`.
///
/// A zero baseline gives 0 when nothing changed and 100 otherwise, so the
/// dashboard never shows `NaN` or infinity.
#[must_use]
pub fn growth_rate(previous: f64, current: f64) -> f64 {
    if !previous.is_finite() || !current.is_finite() {
        return 0.0;
    }
    if previous == 0.0 {
        return if current == 0.0 { 0.0 } else { 100.0 };
    }
    (current - previous) / previous.abs() * 100.0
}

/// Revenue seasonality per calendar month (index 0 = January).
///
/// Each factor is the mean revenue of that calendar month across the
/// window divided by the mean revenue of all buckets. Months not present
/// in the window, or an all-zero window, get a neutral factor of 1.
#[must_use]
pub fn seasonal_factors(monthly: &[MonthBucket]) -> [f64; 12] {
    let mut factors = [1.0; 12];
    if monthly.is_empty() {
        return factors;
    }

    let revenues: Vec<(u32, f64)> = monthly
        .iter()
        .map(|b| (b.month, b.revenue.to_f64().unwrap_or(0.0)))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let overall = revenues.iter().map(|(_, r)| r).sum::<f64>() / revenues.len() as f64;
    if overall <= 0.0 {
        return factors;
    }

    let mut sums = [0.0_f64; 12];
    let mut counts = [0_u32; 12];
    for (month, revenue) in revenues {
        let Some(index) = usize::try_from(month).ok().and_then(|m| m.checked_sub(1)) else {
            continue;
        };
        if let (Some(sum), Some(count)) = (sums.get_mut(index), counts.get_mut(index)) {
            *sum += revenue;
            *count += 1;
        }
    }

    for ((factor, sum), count) in factors.iter_mut().zip(sums).zip(counts) {
        if count > 0 {
            *factor = sum / f64::from(count) / overall;
        }
    }
    factors
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::engine::dates::YearMonth;
    use rust_decimal::Decimal;

    fn bucket(year: i32, month: u32, revenue: i64) -> MonthBucket {
        let mut bucket = MonthBucket::empty(YearMonth { year, month });
        bucket.revenue = Decimal::from(revenue);
        bucket
    }

    #[test]
    fn growth_handles_zero_baseline() {
        assert!(growth_rate(0.0, 0.0).abs() < 1e-9);
        assert!((growth_rate(0.0, 500.0) - 100.0).abs() < 1e-9);
        assert!((growth_rate(200.0, 300.0) - 50.0).abs() < 1e-9);
        assert!((growth_rate(200.0, 100.0) + 50.0).abs() < 1e-9);
        assert!(growth_rate(f64::NAN, 1.0).abs() < 1e-9);
    }

    #[test]
    fn seasonal_factors_average_to_overall() {
        let monthly = vec![
            bucket(2023, 11, 100),
            bucket(2023, 12, 300),
            bucket(2024, 1, 200),
        ];
        let factors = seasonal_factors(&monthly);
        assert!((factors[0] - 1.0).abs() < 1e-9);
        assert!((factors[10] - 0.5).abs() < 1e-9);
        assert!((factors[11] - 1.5).abs() < 1e-9);
        assert!((factors[5] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn seasonal_factors_merge_repeated_months() {
        let monthly = vec![bucket(2023, 1, 100), bucket(2023, 2, 200), bucket(2024, 1, 300)];
        let factors = seasonal_factors(&monthly);
        assert!((factors[0] - 1.0).abs() < 1e-9);
        assert!((factors[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_window_is_neutral() {
        let monthly = vec![bucket(2024, 1, 0), bucket(2024, 2, 0)];
        assert_eq!(seasonal_factors(&monthly), [1.0; 12]);
        assert_eq!(seasonal_factors(&[]), [1.0; 12]);
    }
}
