//! Scaled Amount Formatting
//!
//! Lossless conversion between raw integer ledger units and decimal display
//! forms. Jetton supplies routinely exceed 2^53, so every conversion here is
//! exact integer divmod over `BigUint`; floating point only appears in
//! [`to_number`], which exists for the approximate fiat display and nothing
//! else.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};

/// Sentinel shown when a value cannot be computed (malformed input,
/// zero total supply). Formatting never raises.
pub const UNAVAILABLE: &str = "\u{2014}";

/// Render a raw integer amount at the given decimal scale.
///
/// The fraction is left-padded to `decimals` digits and trailing zeros are
/// stripped; an empty fraction renders as the integer part alone.
pub fn to_display(raw: &BigUint, decimals: u32) -> String {
    if decimals == 0 {
        return raw.to_string();
    }
    let pow = BigUint::from(10u8).pow(decimals);
    let whole = raw / &pow;
    let frac = raw % &pow;

    let frac_digits = left_pad(&frac.to_string(), decimals as usize);
    let trimmed = frac_digits.trim_end_matches('0');
    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

/// Render a signed amount (the 24h balance delta) at the given scale.
pub fn signed_display(raw: &BigInt, decimals: u32) -> String {
    let (sign, magnitude) = raw.clone().into_parts();
    let body = to_display(&magnitude, decimals);
    match sign {
        Sign::Minus => format!("-{}", body),
        _ => body,
    }
}

/// Render an integer-like string, degrading to the sentinel on malformed
/// input instead of failing the whole render pass.
pub fn display_from_str(raw: &str, decimals: u32) -> String {
    match raw.trim().parse::<BigUint>() {
        Ok(v) => to_display(&v, decimals),
        Err(_) => UNAVAILABLE.to_string(),
    }
}

/// Lossy conversion for the fiat multiplication path. Callers must not feed
/// the result back into exact accumulation.
pub fn to_number(raw: &BigUint, decimals: u32) -> f64 {
    raw.to_f64().unwrap_or(f64::MAX) / 10f64.powi(decimals as i32)
}

/// Percentage of `total` with three fixed fractional digits.
pub fn percent_of(raw: &BigUint, total: &BigUint) -> String {
    percent_of_with(raw, total, 3)
}

/// Percentage of `total` with `digits` fixed fractional digits.
/// Returns the sentinel iff `total` is zero.
pub fn percent_of_with(raw: &BigUint, total: &BigUint, digits: u32) -> String {
    let Some(scaled) = percent_ratio_with(raw, total, digits) else {
        return UNAVAILABLE.to_string();
    };
    if digits == 0 {
        return format!("{}%", scaled);
    }
    let pow = BigUint::from(10u8).pow(digits);
    let whole = &scaled / &pow;
    let frac = &scaled % &pow;
    format!("{}.{}%", whole, left_pad(&frac.to_string(), digits as usize))
}

/// Exact percentage ratio scaled by `10^(2 + 3)`, the value the sort
/// comparator uses instead of the rounded display string.
pub fn percent_ratio(raw: &BigUint, total: &BigUint) -> Option<BigUint> {
    percent_ratio_with(raw, total, 3)
}

fn percent_ratio_with(raw: &BigUint, total: &BigUint, digits: u32) -> Option<BigUint> {
    if total.is_zero() {
        return None;
    }
    let scale = BigUint::from(10u8).pow(2 + digits);
    Some(raw * scale / total)
}

fn left_pad(digits: &str, width: usize) -> String {
    if digits.len() >= width {
        digits.to_string()
    } else {
        let mut out = "0".repeat(width - digits.len());
        out.push_str(digits);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::str::FromStr;

    fn big(s: &str) -> BigUint {
        BigUint::from_str(s).unwrap()
    }

    #[test]
    fn test_display_splits_on_scale() {
        assert_eq!(to_display(&big("1234567890"), 9), "1.23456789");
        assert_eq!(to_display(&big("1000000000"), 9), "1");
        assert_eq!(to_display(&big("1"), 9), "0.000000001");
        assert_eq!(to_display(&big("0"), 9), "0");
    }

    #[test]
    fn test_display_zero_decimals() {
        assert_eq!(to_display(&big("42"), 0), "42");
    }

    #[test]
    fn test_display_trims_trailing_zeros() {
        assert_eq!(to_display(&big("1500000000"), 9), "1.5");
        assert_eq!(to_display(&big("1050000000"), 9), "1.05");
    }

    #[test]
    fn test_display_beyond_f64_safe_range() {
        // 2^53 is where f64 starts dropping integers; stay exact above it
        assert_eq!(
            to_display(&big("9007199254740993"), 0),
            "9007199254740993"
        );
        assert_eq!(
            to_display(&big("100000000000000000000000007"), 9),
            "100000000000000000.000000007"
        );
    }

    #[test]
    fn test_display_round_trips() {
        // Parsing the display form back recovers raw / 10^decimals exactly
        for (raw, decimals) in [("1234567890", 9u32), ("5", 3), ("1000001", 6), ("7", 0)] {
            let shown = to_display(&big(raw), decimals);
            let (whole, frac) = shown.split_once('.').unwrap_or((shown.as_str(), ""));
            let mut digits = String::from(whole);
            digits.push_str(frac);
            digits.push_str(&"0".repeat(decimals as usize - frac.len()));
            assert_eq!(big(&digits), big(raw));
        }
    }

    #[test]
    fn test_display_from_str_degrades() {
        assert_eq!(display_from_str("1000000000", 9), "1");
        assert_eq!(display_from_str("garbage", 9), UNAVAILABLE);
        assert_eq!(display_from_str("", 9), UNAVAILABLE);
        assert_eq!(display_from_str("-5", 9), UNAVAILABLE);
    }

    #[test]
    fn test_signed_display() {
        let minus = BigInt::from_str("-1500000000").unwrap();
        assert_eq!(signed_display(&minus, 9), "-1.5");
        let plus = BigInt::from_str("2000000000").unwrap();
        assert_eq!(signed_display(&plus, 9), "2");
        assert_eq!(signed_display(&BigInt::zero(), 9), "0");
    }

    #[test]
    fn test_percent_of_fixed_digits() {
        let total = big("250");
        assert_eq!(percent_of(&big("100"), &total), "40.000%");
        assert_eq!(percent_of(&big("50"), &total), "20.000%");
        assert_eq!(percent_of(&big("250"), &total), "100.000%");
    }

    #[test]
    fn test_percent_of_zero_total_is_sentinel() {
        assert_eq!(percent_of(&big("100"), &BigUint::zero()), UNAVAILABLE);
        assert!(percent_ratio(&big("100"), &BigUint::zero()).is_none());
    }

    #[test]
    fn test_percent_of_custom_digits() {
        let total = big("3");
        assert_eq!(percent_of_with(&big("1"), &total, 1), "33.3%");
        assert_eq!(percent_of_with(&big("1"), &total, 0), "33%");
    }

    #[test]
    fn test_percent_of_monotonic() {
        let total = big("987654321987654321");
        let mut last = BigUint::zero();
        for x in ["1", "1000", "123456789123", "987654321987654321"] {
            let ratio = percent_ratio(&big(x), &total).unwrap();
            assert!(ratio >= last);
            last = ratio;
        }
    }

    #[test]
    fn test_percent_exact_above_float_range() {
        // total = 10^20, raw = half of it; float math would be fine here but
        // the point is the integer path gives the exact digits
        let total = big("100000000000000000000");
        let half = big("50000000000000000000");
        assert_eq!(percent_of(&half, &total), "50.000%");
    }

    #[test]
    fn test_to_number_approximation() {
        assert_relative_eq!(to_number(&big("1500000000"), 9), 1.5, max_relative = 1e-12);
        assert_relative_eq!(to_number(&big("0"), 9), 0.0);
    }
}
