//! Display strings for headline metrics.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as `"{symbol}12,345.60"`; negatives get a leading `-`.
#[must_use]
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}{symbol}{}.{frac}", group_thousands(whole))
}

/// Formats a percentage with one decimal, e.g. `"72.2%"`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}%")
    } else {
        "0.0%".to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_and_rounds() {
        assert_eq!(format_currency(Decimal::new(1_234_560, 2), "$"), "$12,345.60");
        assert_eq!(format_currency(Decimal::from(0), "$"), "$0.00");
        assert_eq!(format_currency(Decimal::new(999_995, 3), "€"), "€1,000.00");
        assert_eq!(format_currency(Decimal::from(1_000_000), "₱"), "₱1,000,000.00");
        assert_eq!(format_currency(Decimal::from(-1500), "$"), "-$1,500.00");
        assert_eq!(format_currency(Decimal::from(123), ""), "123.00");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(72.222), "72.2%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(100.0), "100.0%");
        assert_eq!(format_percent(f64::NAN), "0.0%");
    }
}
