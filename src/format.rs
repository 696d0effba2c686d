//! Human-readable price and percentage formatting for alert messages.

use num_format::{Locale, ToFormattedString};

/// Format a currency amount: thousands-separated whole dollars at or above
/// $1,000, two decimals below.
pub fn fmt_usd(value: f64) -> String {
    if value >= 1000.0 {
        format!("${}", (value.round() as i64).to_formatted_string(&Locale::en))
    } else {
        format!("${:.2}", value)
    }
}

/// Format a unitless quantity (e.g. circulating supply) as a
/// thousands-separated whole number.
pub fn fmt_amount(value: f64) -> String {
    (value.round() as i64).to_formatted_string(&Locale::en)
}

/// Format a percentage to one decimal with an explicit sign, rounding half
/// away from zero. An exact rounded zero renders as "0.0%" without a sign.
pub fn fmt_pct(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        "0.0%".to_string()
    } else {
        format!("{:+.1}%", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn small_prices_keep_cents() {
        assert_eq!(fmt_usd(950.4), "$950.40");
        assert_eq!(fmt_usd(0.5), "$0.50");
        assert_eq!(fmt_usd(999.99), "$999.99");
    }

    #[test]
    fn large_prices_drop_cents_and_separate_thousands() {
        assert_eq!(fmt_usd(1000.0), "$1,000");
        assert_eq!(fmt_usd(50000.0), "$50,000");
        assert_eq!(fmt_usd(1234567.89), "$1,234,568");
    }

    #[test]
    fn percentages_carry_explicit_sign() {
        assert_eq!(fmt_pct(11.0), "+11.0%");
        assert_eq!(fmt_pct(-3.25), "-3.3%");
        assert_eq!(fmt_pct(0.04), "0.0%");
        assert_eq!(fmt_pct(-0.04), "0.0%");
        assert_eq!(fmt_pct(0.0), "0.0%");
    }

    #[test]
    fn amounts_separate_thousands_without_symbol() {
        assert_eq!(fmt_amount(19_600_000.0), "19,600,000");
        assert_eq!(fmt_amount(999.4), "999");
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(fmt_pct(3.25), "+3.3%");
        assert_eq!(fmt_pct(0.05), "+0.1%");
        assert_eq!(fmt_pct(-0.05), "-0.1%");
    }
}
