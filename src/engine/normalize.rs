//! Raw value -> finite `f64`.
//!
//! Scraped cells carry thousands separators, units, stray letters and OCR
//! noise. Cleaning rules:
//!
//! - keep only digits, `.` and `-`
//! - the value is negative iff the cleaned text starts with `-`; every other `-` is dropped
//! - the first `.` is the decimal point; later dots are typos and their digits
//!   join the fractional part (`"21.88.5"` -> `21.885`)
//!
//! Failure is always `None`, never a panic.

use crate::domain::{NormalizedPair, RawValue};

/// Coerce a raw value into a finite number.
pub fn normalize_value(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(v) => v.is_finite().then_some(*v),
        RawValue::Text(s) => normalize_text(s),
        RawValue::Missing => None,
    }
}

/// Normalize both axes of a pair.
pub fn normalize_pair(raw_x: &RawValue, raw_y: &RawValue) -> NormalizedPair {
    NormalizedPair {
        x: normalize_value(raw_x),
        y: normalize_value(raw_y),
    }
}

fn normalize_text(s: &str) -> Option<f64> {
    let kept: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let negative = kept.starts_with('-');

    let mut cleaned = String::with_capacity(kept.len() + 1);
    if negative {
        cleaned.push('-');
    }
    let mut seen_dot = false;
    let mut seen_digit = false;
    for c in kept.chars() {
        match c {
            '-' => {}
            '.' => {
                if !seen_dot {
                    seen_dot = true;
                    cleaned.push('.');
                }
            }
            _ => {
                seen_digit = true;
                cleaned.push(c);
            }
        }
    }

    if !seen_digit {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<f64> {
        normalize_value(&RawValue::from(s))
    }

    #[test]
    fn plain_numbers_pass_through() {
        assert_eq!(normalize_value(&RawValue::Number(781_265.0)), Some(781_265.0));
        assert_eq!(normalize_value(&RawValue::Number(f64::NAN)), None);
        assert_eq!(normalize_value(&RawValue::Number(f64::INFINITY)), None);
        assert_eq!(normalize_value(&RawValue::Missing), None);
    }

    #[test]
    fn strips_noise_characters() {
        assert_eq!(text("2,414,688 m"), Some(2_414_688.0));
        assert_eq!(text("X= 781265"), Some(781_265.0));
        assert_eq!(text(" -102.29° "), Some(-102.29));
    }

    #[test]
    fn later_dots_merge_into_fraction() {
        assert_eq!(text("21.88.5"), Some(21.885));
        assert_eq!(text("1.234.567"), Some(1.234567));
    }

    #[test]
    fn keeps_exactly_one_leading_minus() {
        assert_eq!(text("--102.29"), Some(-102.29));
        assert_eq!(text("102-29"), Some(10229.0));
        assert_eq!(text("W -102.29"), Some(-102.29));
    }

    #[test]
    fn non_numeric_text_fails_quietly() {
        assert_eq!(text("abc"), None);
        assert_eq!(text(""), None);
        assert_eq!(text("-."), None);
        assert_eq!(text(".5"), Some(0.5));
    }

    #[test]
    fn pair_normalizes_each_axis() {
        let pair = normalize_pair(&RawValue::from("abc"), &RawValue::from(21.9));
        assert_eq!(pair.x, None);
        assert_eq!(pair.y, Some(21.9));
        assert!(pair.both().is_none());
    }
}
