//! Correction ladder for pairs that failed validation.
//!
//! Strategies are tried in the fixed order of [`LADDER`]; each one proposes a
//! short list of candidate pairs, every candidate is re-validated, and the first
//! valid candidate ends the ladder. Each strategy is a standalone function so it
//! can be exercised on its own.
//!
//! The ladder is a small fixed list, so every call finishes in bounded time
//! regardless of input.

use tracing::trace;

use crate::domain::{
    BoundingBox, CoordinateFamily, CoordinateKind, CorrectionStrategy, ValidationOutcome, Xy, bounds_for,
};
use crate::engine::classify::{LATLNG_MAX_SHIFT, UTM_MAX_SHIFT};
use crate::engine::validate::validate;
use crate::math::{drop_integer_digit, integer_digit_count, scale_pow10};

/// Order in which strategies are attempted.
pub const LADDER: [CorrectionStrategy; 4] = [
    CorrectionStrategy::InversionSwap,
    CorrectionStrategy::DigitRepair,
    CorrectionStrategy::SignFlip,
    CorrectionStrategy::DecimalScale,
];

/// Leading easting digit lost in zone 13 sources (`81265` -> `781265`).
const EASTING_OFFSET: f64 = 700_000.0;

/// Leading northing millions lost in source tables (`14688` -> `2414688`).
///
/// These were tuned on observed bad records rather than derived; they assume
/// zone 13/14 northings in the 2.0M-2.4M band and do not generalize.
const NORTHING_OFFSETS: [f64; 5] = [2_000_000.0, 2_100_000.0, 2_200_000.0, 2_300_000.0, 2_400_000.0];

/// Eight-digit northings carry one spurious digit at this position
/// (`24146188` -> `2414688`). Same provenance as `NORTHING_OFFSETS`.
const SPURIOUS_DIGIT_INDEX: usize = 5;

/// A successful repair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub pair: Xy,
    /// Terminal kind the repaired pair validated as.
    pub kind: CoordinateKind,
    pub strategy: CorrectionStrategy,
    pub validation: ValidationOutcome,
}

/// Result of running the whole ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionOutcome {
    pub resolved: Option<Correction>,
    /// Pair to report when nothing validated (axis-swapped if the classifier
    /// flagged an inversion).
    pub best_effort: Xy,
}

/// Terminal kinds a presumed kind may be repaired into, most likely first.
pub fn targets(kind: CoordinateKind) -> &'static [CoordinateKind] {
    const UTM: &[CoordinateKind] = &[CoordinateKind::Utm13, CoordinateKind::Utm14];
    const UTM14_FIRST: &[CoordinateKind] = &[CoordinateKind::Utm14, CoordinateKind::Utm13];
    const LATLNG: &[CoordinateKind] = &[CoordinateKind::LatLng];

    match kind {
        CoordinateKind::Utm13
        | CoordinateKind::Utm13Inverted
        | CoordinateKind::UtmPotential
        | CoordinateKind::Mixed => UTM,
        CoordinateKind::Utm14 => UTM14_FIRST,
        CoordinateKind::LatLng | CoordinateKind::LatLngInverted | CoordinateKind::LatLngPotential => LATLNG,
        CoordinateKind::Invalid | CoordinateKind::Unknown => &[],
    }
}

/// Run the ladder for a pair presumed to be `kind`.
pub fn correct(pair: Xy, kind: CoordinateKind) -> CorrectionOutcome {
    let targets = targets(kind);
    let mut working = pair;

    for strategy in LADDER {
        if let Some(found) = apply(strategy, working, kind, targets) {
            trace!(?strategy, x = found.pair.x, y = found.pair.y, kind = ?found.kind, "correction found");
            return CorrectionOutcome {
                resolved: Some(found),
                best_effort: found.pair,
            };
        }
        // The classifier said the axes are swapped; keep them swapped for the
        // remaining strategies.
        if strategy == CorrectionStrategy::InversionSwap && kind.uninverted().is_some() {
            working = working.swapped();
        }
    }

    CorrectionOutcome {
        resolved: None,
        best_effort: working,
    }
}

/// Apply a single strategy.
pub fn apply(
    strategy: CorrectionStrategy,
    pair: Xy,
    kind: CoordinateKind,
    targets: &[CoordinateKind],
) -> Option<Correction> {
    match strategy {
        CorrectionStrategy::InversionSwap => inversion_swap(pair, kind, targets),
        CorrectionStrategy::DigitRepair => digit_repair(pair, targets),
        CorrectionStrategy::SignFlip => sign_flip(pair, targets),
        CorrectionStrategy::DecimalScale => decimal_scale(pair, targets),
    }
}

/// Swap axes of a pair the classifier flagged as inverted.
///
/// The base kind is tried first, then any other target.
pub fn inversion_swap(pair: Xy, kind: CoordinateKind, targets: &[CoordinateKind]) -> Option<Correction> {
    let base = kind.uninverted()?;
    let swapped = pair.swapped();
    let order = std::iter::once(base).chain(targets.iter().copied().filter(|t| *t != base));
    for target in order {
        let validation = validate(swapped, target);
        if validation.valid {
            return Some(Correction {
                pair: swapped,
                kind: target,
                strategy: CorrectionStrategy::InversionSwap,
                validation,
            });
        }
    }
    None
}

/// Restore digits lost during OCR/scraping. UTM targets only.
pub fn digit_repair(pair: Xy, targets: &[CoordinateKind]) -> Option<Correction> {
    for &target in family_targets(targets, CoordinateFamily::Utm) {
        let bounds = bounds_for(target);
        let xs = easting_candidates(pair, bounds);
        let ys = northing_candidates(pair, bounds);
        for &x in &xs {
            for &y in &ys {
                if x == pair.x && y == pair.y {
                    continue;
                }
                if let Some(found) = check(Xy::new(x, y), target, CorrectionStrategy::DigitRepair) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn easting_candidates(pair: Xy, bounds: BoundingBox) -> Vec<f64> {
    let mut out = vec![pair.x];
    // Far too small relative to the northing: lost trailing digits or the leading 7.
    if pair.x < bounds.x.min && pair.x * 10.0 < pair.y {
        out.extend([scale_pow10(pair.x, 3), scale_pow10(pair.x, 2), pair.x + EASTING_OFFSET]);
    }
    out
}

fn northing_candidates(pair: Xy, bounds: BoundingBox) -> Vec<f64> {
    let mut out = vec![pair.y];
    // Northings are positive; a negative or zero axis is never patched up.
    if pair.y > 0.0 && pair.y < pair.x {
        // A shifted decimal point is checked before the offset patches so that
        // `241468.8` becomes `2414688` rather than `2441468.8`.
        out.push(scale_pow10(pair.y, 1));
        out.extend(NORTHING_OFFSETS.iter().map(|offset| pair.y + offset));
    } else if pair.y > bounds.y.max && integer_digit_count(pair.y) == 8 {
        out.extend(drop_integer_digit(pair.y, SPURIOUS_DIGIT_INDEX));
        out.push(scale_pow10(pair.y, -1));
    }
    out
}

/// Region longitudes are always negative. LatLng targets only.
///
/// Tries `(-x, y)`, then the full swap `(y, x)`, then `(-y, x)`.
pub fn sign_flip(pair: Xy, targets: &[CoordinateKind]) -> Option<Correction> {
    let candidates = [Xy::new(-pair.x, pair.y), pair.swapped(), Xy::new(-pair.y, pair.x)];
    for &target in family_targets(targets, CoordinateFamily::LatLng) {
        for candidate in candidates {
            if let Some(found) = check(candidate, target, CorrectionStrategy::SignFlip) {
                return Some(found);
            }
        }
    }
    None
}

/// Shift the decimal point of both axes together.
///
/// For each power `p` (1..=9 for UTM, 1..=2 for lat/lng) divides by `10^p`,
/// then multiplies by `10^p`.
pub fn decimal_scale(pair: Xy, targets: &[CoordinateKind]) -> Option<Correction> {
    let limit = targets.iter().map(|t| max_shift(*t)).max().unwrap_or(0);

    for p in 1..=limit {
        for shift in [-p, p] {
            let candidate = Xy::new(scale_pow10(pair.x, shift), scale_pow10(pair.y, shift));
            for &target in targets.iter().filter(|t| max_shift(**t) >= p) {
                if let Some(found) = check(candidate, target, CorrectionStrategy::DecimalScale) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn max_shift(target: CoordinateKind) -> i32 {
    match target.family() {
        Some(CoordinateFamily::Utm) => UTM_MAX_SHIFT,
        Some(CoordinateFamily::LatLng) => LATLNG_MAX_SHIFT,
        None => 0,
    }
}

fn family_targets(targets: &[CoordinateKind], family: CoordinateFamily) -> &[CoordinateKind] {
    // Target lists never mix families, so the whole slice either applies or not.
    if targets.first().and_then(|t| t.family()) == Some(family) {
        targets
    } else {
        &[]
    }
}

fn check(candidate: Xy, target: CoordinateKind, strategy: CorrectionStrategy) -> Option<Correction> {
    let validation = validate(candidate, target);
    validation.valid.then_some(Correction {
        pair: candidate,
        kind: target,
        strategy,
        validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utm() -> &'static [CoordinateKind] {
        targets(CoordinateKind::UtmPotential)
    }

    fn latlng() -> &'static [CoordinateKind] {
        targets(CoordinateKind::LatLng)
    }

    #[test]
    fn ladder_order_is_fixed() {
        assert_eq!(
            LADDER,
            [
                CorrectionStrategy::InversionSwap,
                CorrectionStrategy::DigitRepair,
                CorrectionStrategy::SignFlip,
                CorrectionStrategy::DecimalScale,
            ]
        );
    }

    #[test]
    fn inversion_swap_resolves_swapped_utm() {
        let found = inversion_swap(Xy::new(2_414_688.0, 781_265.0), CoordinateKind::Utm13Inverted, utm()).unwrap();
        assert_eq!(found.pair, Xy::new(781_265.0, 2_414_688.0));
        assert_eq!(found.kind, CoordinateKind::Utm13);
    }

    #[test]
    fn inversion_swap_falls_through_to_zone_14() {
        let found = inversion_swap(Xy::new(2_400_000.0, 250_000.0), CoordinateKind::Utm13Inverted, utm()).unwrap();
        assert_eq!(found.kind, CoordinateKind::Utm14);
    }

    #[test]
    fn inversion_swap_ignores_non_inverted_kinds() {
        assert!(inversion_swap(Xy::new(2_414_688.0, 781_265.0), CoordinateKind::UtmPotential, utm()).is_none());
    }

    #[test]
    fn digit_repair_scales_easting_and_drops_spurious_northing_digit() {
        let found = digit_repair(Xy::new(781.265, 24_146_188.0), utm()).unwrap();
        assert_eq!(found.pair, Xy::new(781_265.0, 2_414_688.0));
        assert_eq!(found.kind, CoordinateKind::Utm13);
    }

    #[test]
    fn digit_repair_restores_northing_millions() {
        let found = digit_repair(Xy::new(781_265.0, 14_688.0), utm()).unwrap();
        assert_eq!(found.pair, Xy::new(781_265.0, 2_414_688.0));
    }

    #[test]
    fn digit_repair_restores_leading_easting_seven() {
        let found = digit_repair(Xy::new(81_265.0, 2_414_688.0), utm()).unwrap();
        assert_eq!(found.pair, Xy::new(781_265.0, 2_414_688.0));
    }

    #[test]
    fn digit_repair_multiplies_short_northing() {
        let found = digit_repair(Xy::new(781_265.0, 241_468.8), utm()).unwrap();
        assert_eq!(found.pair, Xy::new(781_265.0, 2_414_688.0));
    }

    #[test]
    fn digit_repair_scales_easting_by_hundred() {
        let found = digit_repair(Xy::new(7_812.65, 2_414_688.0), utm()).unwrap();
        assert_eq!(found.pair, Xy::new(781_265.0, 2_414_688.0));
        assert_eq!(found.kind, CoordinateKind::Utm13);
    }

    #[test]
    fn digit_repair_can_land_in_zone_14() {
        let found = digit_repair(Xy::new(2_500.0, 1_500_000.0), utm()).unwrap();
        assert_eq!(found.pair, Xy::new(250_000.0, 1_500_000.0));
        assert_eq!(found.kind, CoordinateKind::Utm14);
    }

    #[test]
    fn digit_repair_leaves_negative_northing_alone() {
        assert!(digit_repair(Xy::new(781_265.0, -21.88), utm()).is_none());
        assert!(correct(Xy::new(781_265.0, -21.88), CoordinateKind::Mixed).resolved.is_none());
    }

    #[test]
    fn digit_repair_does_not_touch_latlng() {
        assert!(digit_repair(Xy::new(102.29, 21.88), latlng()).is_none());
    }

    #[test]
    fn sign_flip_negates_longitude() {
        let found = sign_flip(Xy::new(102.29, 21.88), latlng()).unwrap();
        assert_eq!(found.pair, Xy::new(-102.29, 21.88));
        assert_eq!(found.kind, CoordinateKind::LatLng);
    }

    #[test]
    fn sign_flip_tries_full_swap() {
        let found = sign_flip(Xy::new(21.88, -102.29), latlng()).unwrap();
        assert_eq!(found.pair, Xy::new(-102.29, 21.88));
        let found = sign_flip(Xy::new(21.88, 102.29), latlng()).unwrap();
        assert_eq!(found.pair, Xy::new(-102.29, 21.88));
    }

    #[test]
    fn sign_flip_is_latlng_only() {
        assert!(sign_flip(Xy::new(-781_265.0, 2_414_688.0), utm()).is_none());
    }

    #[test]
    fn decimal_scale_recovers_shifted_point() {
        let found = decimal_scale(Xy::new(78_126.5, 241_468.8), utm()).unwrap();
        assert_eq!(found.pair, Xy::new(781_265.0, 2_414_688.0));
        assert_eq!(found.strategy, CorrectionStrategy::DecimalScale);

        let found = decimal_scale(Xy::new(-1022.9, 218.8), latlng()).unwrap();
        assert_eq!(found.pair, Xy::new(-102.29, 21.88));
    }

    #[test]
    fn decimal_scale_divides_oversized_utm() {
        let found = decimal_scale(Xy::new(7_812_650.0, 24_146_880.0), utm()).unwrap();
        assert_eq!(found.pair, Xy::new(781_265.0, 2_414_688.0));
        assert_eq!(found.kind, CoordinateKind::Utm13);
    }

    #[test]
    fn decimal_scale_keeps_sub_micro_degree_precision() {
        let found = decimal_scale(Xy::new(-1022.912345678, 218.812345678), latlng()).unwrap();
        assert!((found.pair.x - -102.2912345678).abs() < 1e-9, "{:?}", found.pair);
        assert!((found.pair.y - 21.8812345678).abs() < 1e-9, "{:?}", found.pair);
    }

    #[test]
    fn decimal_scale_respects_latlng_limit() {
        assert!(decimal_scale(Xy::new(-102_290.0, 21_880.0), latlng()).is_none());
    }

    #[test]
    fn ladder_keeps_swap_for_later_strategies() {
        // Swapped and with a positive longitude: swap alone fails, sign flip finishes.
        let out = correct(Xy::new(21.88, 102.29), CoordinateKind::LatLngInverted);
        let found = out.resolved.unwrap();
        assert_eq!(found.strategy, CorrectionStrategy::SignFlip);
        assert_eq!(found.pair, Xy::new(-102.29, 21.88));
    }

    #[test]
    fn exhausted_ladder_reports_best_effort() {
        let out = correct(Xy::new(9_999_999.0, 123_456.0), CoordinateKind::Utm13Inverted);
        assert!(out.resolved.is_none());
        assert_eq!(out.best_effort, Xy::new(123_456.0, 9_999_999.0));
    }
}
