//! Decimal-digit helpers for repairing scraped numbers.
//!
//! Scraped coordinates are damaged in decimal space (a digit falls off, a
//! decimal point moves), so repairs are expressed as powers of ten and digit
//! edits rather than arbitrary floating-point arithmetic.

use std::ops::RangeInclusive;

use crate::domain::Interval;

/// Finest grid rescaled values are snapped to (pico-units).
///
/// `781.265 * 1000` is not exactly `781265.0` in binary floating point;
/// snapping keeps repaired values free of representation noise.
const MAX_SNAP_DECIMALS: usize = 12;

/// Significant decimal digits an `f64` holds exactly enough to round-trip a snap.
const SIGNIFICANT_DIGITS: usize = 15;

fn snap(v: f64) -> f64 {
    // Large values get fewer decimals so `v * factor` stays in exact integer range.
    let decimals = SIGNIFICANT_DIGITS
        .saturating_sub(integer_digit_count(v))
        .min(MAX_SNAP_DECIMALS);
    let factor = 10f64.powi(decimals as i32);
    let snapped = (v * factor).round() / factor;
    if snapped.is_finite() { snapped } else { v }
}

/// `v · 10^p`, dividing for negative `p` so small scales stay exact.
pub fn scale_pow10(v: f64, p: i32) -> f64 {
    let factor = 10f64.powi(p.abs());
    if p >= 0 { snap(v * factor) } else { snap(v / factor) }
}

/// Number of digits in the integer part of `|v|` (`0.5` has one).
pub fn integer_digit_count(v: f64) -> usize {
    let int = v.abs().trunc();
    if int < 1.0 {
        return 1;
    }
    // log10 misrounds right below powers of ten; count via the decimal string.
    format!("{int:.0}").len()
}

/// Remove the digit at `index` (0-based, from the left) of the integer part.
///
/// The fractional part and sign are kept. Returns `None` when `index` is out of range.
pub fn drop_integer_digit(v: f64, index: usize) -> Option<f64> {
    let int = v.abs().trunc();
    let mut digits = format!("{int:.0}");
    if index >= digits.len() || digits.len() < 2 {
        return None;
    }
    digits.remove(index);
    let rebuilt: f64 = digits.parse().ok()?;
    let value = rebuilt + v.abs().fract();
    Some(if v < 0.0 { -value } else { value })
}

/// Smallest-magnitude power `p` in `powers` with `v · 10^p` inside `target`.
///
/// Powers are tried from `0` outward so an already in-range value wins.
pub fn pow10_into(v: f64, target: Interval, powers: RangeInclusive<i32>) -> Option<i32> {
    let max = powers.start().abs().max(powers.end().abs());
    for step in 0..=max {
        for p in [step, -step] {
            if powers.contains(&p) && target.contains(scale_pow10(v, p)) {
                return Some(p);
            }
        }
    }
    None
}
