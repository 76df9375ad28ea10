//! Engine orchestration.
//!
//! One call walks a strictly sequential state machine:
//!
//! ```text
//! Start -> Normalized -> Classified -> (InversionResolved) -> Validated -> [Corrected]* -> Terminal
//! ```
//!
//! There is no loop back to `Normalized`; the only retry loop is the
//! corrector's fixed ladder. Terminal UTM kinds are projected to WGS84, lat/lng
//! results pass through with `x` as longitude and `y` as latitude.

use rayon::prelude::*;
use tracing::trace;

use crate::domain::{
    CoordinateFamily, CoordinateKind, GeoPoint, NormalizedPair, ProcessResult, RawValue, ValidationOutcome, Xy,
    bounds_for,
};
use crate::engine::classify::classify;
use crate::engine::correct::{Correction, correct, targets};
use crate::engine::normalize::normalize_pair;
use crate::engine::validate::{validate, validate_in};
use crate::math::utm_to_geographic;

pub const NORMALIZE_ERROR: &str = "could not normalize coordinates";
pub const ZERO_AXIS_ERROR: &str = "coordinates contain a zero placeholder axis";
pub const NO_SYSTEM_ERROR: &str = "coordinates match no known coordinate system";

/// Stateless coordinate engine.
///
/// A zero-field value type: every method is a pure function of its inputs and
/// the region constants, so one instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Engine
    }

    /// Classify, repair and project one raw coordinate pair.
    pub fn process(&self, raw_x: impl Into<RawValue>, raw_y: impl Into<RawValue>) -> ProcessResult {
        run((raw_x.into(), raw_y.into()), None)
    }

    /// Like [`Engine::process`] but with the kind fixed instead of classified.
    pub fn process_with_kind(
        &self,
        raw_x: impl Into<RawValue>,
        raw_y: impl Into<RawValue>,
        kind: CoordinateKind,
    ) -> ProcessResult {
        run((raw_x.into(), raw_y.into()), Some(kind))
    }

    /// Process many pairs in parallel. Output order matches input order.
    pub fn process_all(&self, pairs: &[(RawValue, RawValue)]) -> Vec<ProcessResult> {
        pairs
            .par_iter()
            .map(|(x, y)| run((x.clone(), y.clone()), None))
            .collect()
    }

    /// Geographic position of an already validated pair.
    ///
    /// `None` for non-terminal kinds; callers only reach this after validation.
    pub fn project(&self, pair: Xy, kind: CoordinateKind) -> Option<GeoPoint> {
        geographic_of(pair, kind)
    }
}

fn geographic_of(pair: Xy, kind: CoordinateKind) -> Option<GeoPoint> {
    match kind {
        CoordinateKind::Utm13 | CoordinateKind::Utm14 => kind.zone().map(|zone| utm_to_geographic(pair, zone)),
        CoordinateKind::LatLng => Some(GeoPoint {
            lat: pair.y,
            lng: pair.x,
        }),
        CoordinateKind::Utm13Inverted
        | CoordinateKind::LatLngInverted
        | CoordinateKind::Mixed
        | CoordinateKind::UtmPotential
        | CoordinateKind::LatLngPotential
        | CoordinateKind::Invalid
        | CoordinateKind::Unknown => None,
    }
}

fn run(original: (RawValue, RawValue), forced: Option<CoordinateKind>) -> ProcessResult {
    // Normalized
    let normalized = normalize_pair(&original.0, &original.1);
    let Some(pair) = normalized.both() else {
        return Failure {
            original,
            normalized,
            corrected: None,
            classified_as: CoordinateKind::Invalid,
            was_corrected: false,
            validation: unchecked(CoordinateKind::Invalid),
            error: NORMALIZE_ERROR.to_string(),
        }
        .into_result();
    };

    // Classified
    let classified_as = forced.unwrap_or_else(|| classify(pair));
    trace!(x = pair.x, y = pair.y, kind = ?classified_as, "classified");

    let Some(family) = classified_as.family() else {
        let error = if pair.x == 0.0 || pair.y == 0.0 {
            ZERO_AXIS_ERROR.to_string()
        } else if forced.is_some() {
            format!("{} is not a resolvable coordinate kind", classified_as.display_name())
        } else {
            NO_SYSTEM_ERROR.to_string()
        };
        return Failure {
            original,
            normalized,
            corrected: Some(pair),
            classified_as,
            was_corrected: false,
            validation: validate(pair, classified_as),
            error,
        }
        .into_result();
    };

    // Validated
    let validation = validate(pair, classified_as);
    if validation.valid {
        // Non-terminal kinds validate against their family's primary box,
        // which is also their first correction target.
        let kind = if classified_as.is_terminal() {
            classified_as
        } else {
            targets(classified_as).first().copied().unwrap_or(classified_as)
        };
        return success(original, normalized, pair, classified_as, kind, None, validation);
    }

    // Corrected
    let outcome = correct(pair, classified_as);
    match outcome.resolved {
        Some(found) => success(
            original,
            normalized,
            found.pair,
            classified_as,
            found.kind,
            Some(found),
            found.validation,
        ),
        None => {
            let family_name = match family {
                CoordinateFamily::Utm => "UTM",
                CoordinateFamily::LatLng => "lat/lng",
            };
            Failure {
                original,
                normalized,
                corrected: Some(outcome.best_effort),
                classified_as,
                was_corrected: outcome.best_effort != pair,
                validation: validate(outcome.best_effort, classified_as),
                error: format!("no correction strategy produced a valid {family_name} coordinate"),
            }
            .into_result()
        }
    }
}

fn success(
    original: (RawValue, RawValue),
    normalized: NormalizedPair,
    corrected: Xy,
    classified_as: CoordinateKind,
    kind: CoordinateKind,
    correction: Option<Correction>,
    validation: ValidationOutcome,
) -> ProcessResult {
    ProcessResult {
        success: true,
        original,
        normalized,
        corrected: Some(corrected),
        classified_as,
        kind,
        was_corrected: correction.is_some(),
        strategy: correction.map(|c| c.strategy),
        validation,
        geographic: geographic_of(corrected, kind),
        error: None,
    }
}

struct Failure {
    original: (RawValue, RawValue),
    normalized: NormalizedPair,
    corrected: Option<Xy>,
    classified_as: CoordinateKind,
    was_corrected: bool,
    validation: ValidationOutcome,
    error: String,
}

impl Failure {
    fn into_result(self) -> ProcessResult {
        ProcessResult {
            success: false,
            original: self.original,
            normalized: self.normalized,
            corrected: self.corrected,
            classified_as: self.classified_as,
            kind: self.classified_as,
            was_corrected: self.was_corrected,
            strategy: None,
            validation: self.validation,
            geographic: None,
            error: Some(self.error),
        }
    }
}

/// Outcome reported when there was no pair to check.
fn unchecked(kind: CoordinateKind) -> ValidationOutcome {
    validate_in(Xy::new(f64::NAN, f64::NAN), bounds_for(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CorrectionStrategy;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn valid_utm13_is_projected_without_correction() {
        let r = Engine.process(781_265.0, 2_414_688.0);
        assert!(r.success);
        assert_eq!(r.kind, CoordinateKind::Utm13);
        assert!(!r.was_corrected);
        assert_eq!(r.strategy, None);
        let geo = r.geographic.unwrap();
        assert!(close(geo.lat, 21.813691, 1e-4), "lat {}", geo.lat);
        assert!(close(geo.lng, -102.279400, 1e-4), "lng {}", geo.lng);
    }

    #[test]
    fn known_digit_truncation_fix() {
        let r = Engine.process(781.265, 24_146_188.0);
        assert!(r.success, "{:?}", r.error);
        assert_eq!(r.classified_as, CoordinateKind::UtmPotential);
        assert_eq!(r.kind, CoordinateKind::Utm13);
        assert!(r.was_corrected);
        assert_eq!(r.strategy, Some(CorrectionStrategy::DigitRepair));
        let c = r.corrected.unwrap();
        assert!(close(c.x, 781_265.0, 1e-6), "x {}", c.x);
        assert!(close(c.y, 2_414_688.0, 1e-6), "y {}", c.y);
    }

    #[test]
    fn known_inversion_fix() {
        let r = Engine.process(2_414_688.0, 781_265.0);
        assert!(r.success);
        assert_eq!(r.classified_as, CoordinateKind::Utm13Inverted);
        assert_eq!(r.kind, CoordinateKind::Utm13);
        assert!(r.was_corrected);
        assert_eq!(r.strategy, Some(CorrectionStrategy::InversionSwap));
        assert_eq!(r.corrected, Some(Xy::new(781_265.0, 2_414_688.0)));
    }

    #[test]
    fn swapped_zone_14_pair_resolves_to_zone_14() {
        let r = Engine.process("2400000", "250000");
        assert!(r.success);
        assert_eq!(r.kind, CoordinateKind::Utm14);
        let geo = r.geographic.unwrap();
        assert!(close(geo.lng, -101.416180, 1e-4), "lng {}", geo.lng);
    }

    #[test]
    fn sign_repair_for_positive_longitude() {
        let r = Engine.process(102.29, 21.88);
        assert!(r.success);
        assert_eq!(r.kind, CoordinateKind::LatLng);
        assert_eq!(r.strategy, Some(CorrectionStrategy::SignFlip));
        assert_eq!(r.corrected, Some(Xy::new(-102.29, 21.88)));
        assert_eq!(r.geographic, Some(GeoPoint { lat: 21.88, lng: -102.29 }));
    }

    #[test]
    fn latlng_passes_through() {
        let r = Engine.process("-102.2953", "21.8818");
        assert!(r.success);
        assert!(!r.was_corrected);
        assert_eq!(r.geographic, Some(GeoPoint { lat: 21.8818, lng: -102.2953 }));
    }

    #[test]
    fn graceful_failure_on_non_numeric_input() {
        let r = Engine.process("abc", RawValue::Missing);
        assert!(!r.success);
        assert_eq!(r.error.as_deref(), Some(NORMALIZE_ERROR));
        assert_eq!(r.corrected, None);
        assert_eq!(r.geographic, None);
        assert_eq!(r.original, (RawValue::from("abc"), RawValue::Missing));
    }

    #[test]
    fn classification_failures_are_reported() {
        let r = Engine.process(0.0, 0.0);
        assert!(!r.success);
        assert_eq!(r.kind, CoordinateKind::Invalid);
        assert!(r.error.is_some());

        let r = Engine.process(-5_000.0, -9_999.0);
        assert!(!r.success);
        assert_eq!(r.kind, CoordinateKind::Unknown);
        assert!(r.error.is_some());
    }

    #[test]
    fn exhausted_ladder_keeps_best_effort_pair() {
        let r = Engine.process(9_999_999.0, 123_456.0);
        assert!(!r.success);
        assert_eq!(r.classified_as, CoordinateKind::Utm13Inverted);
        assert!(r.was_corrected);
        assert_eq!(r.corrected, Some(Xy::new(123_456.0, 9_999_999.0)));
        assert!(r.error.unwrap().contains("UTM"));
    }

    #[test]
    fn mixed_pairs_fail_without_panicking() {
        let r = Engine.process(-102.29, 2_414_688.0);
        assert!(!r.success);
        assert_eq!(r.kind, CoordinateKind::Mixed);
        assert!(!r.was_corrected);
        assert_eq!(r.corrected, Some(Xy::new(-102.29, 2_414_688.0)));
    }

    #[test]
    fn mixed_pair_with_short_northing_takes_offset_patch() {
        // The offset heuristic accepts any in-box result, even for a lat-like value.
        let r = Engine.process(781_265.0, 21.88);
        assert!(r.success);
        assert_eq!(r.classified_as, CoordinateKind::Mixed);
        assert_eq!(r.strategy, Some(CorrectionStrategy::DigitRepair));
        assert_eq!(r.corrected, Some(Xy::new(781_265.0, 2_400_021.88)));
    }

    #[test]
    fn forced_failure_kind_reports_neutral_error() {
        let r = Engine.process_with_kind(781_265.0, 2_414_688.0, CoordinateKind::Invalid);
        assert!(!r.success);
        assert_eq!(r.error.as_deref(), Some("Invalid is not a resolvable coordinate kind"));

        let r = Engine.process_with_kind(0.0, 2_414_688.0, CoordinateKind::Unknown);
        assert_eq!(r.error.as_deref(), Some(ZERO_AXIS_ERROR));

        assert_eq!(Engine.process(-5_000.0, -9_999.0).error.as_deref(), Some(NO_SYSTEM_ERROR));
    }

    #[test]
    fn project_converts_validated_pairs() {
        let geo = Engine.project(Xy::new(250_000.0, 2_400_000.0), CoordinateKind::Utm14).unwrap();
        assert!(close(geo.lat, 21.68581164, 1e-4), "lat {}", geo.lat);
        assert!(close(geo.lng, -101.41617998, 1e-4), "lng {}", geo.lng);

        let geo = Engine.project(Xy::new(-102.29, 21.88), CoordinateKind::LatLng).unwrap();
        assert_eq!(geo, GeoPoint { lat: 21.88, lng: -102.29 });

        assert_eq!(Engine.project(Xy::new(250_000.0, 2_400_000.0), CoordinateKind::UtmPotential), None);
    }

    #[test]
    fn forced_kind_skips_classification() {
        let r = Engine.process_with_kind(781_265.0, 2_414_688.0, CoordinateKind::Utm13);
        assert!(r.success);
        let r = Engine.process_with_kind(781_265.0, 2_414_688.0, CoordinateKind::LatLng);
        assert!(!r.success);
    }

    #[test]
    fn rerunning_on_corrected_output_is_idempotent() {
        let inputs: [(RawValue, RawValue); 5] = [
            (781.265.into(), 24_146_188.0.into()),
            (2_414_688.0.into(), 781_265.0.into()),
            ("102.29".into(), "21.88".into()),
            ("-1022.9".into(), "218.8".into()),
            ("78126.5".into(), "241468.8".into()),
        ];
        for (x, y) in inputs {
            let first = Engine.process(x, y);
            assert!(first.success, "{first:?}");
            let c = first.corrected.unwrap();
            let again = Engine.process_with_kind(c.x, c.y, first.kind);
            assert!(again.success);
            assert!(!again.was_corrected);
            assert_eq!(again.corrected, Some(c));
            assert_eq!(again.kind, first.kind);
        }
    }

    #[test]
    fn process_all_preserves_order() {
        let pairs = vec![
            (RawValue::from(781_265.0), RawValue::from(2_414_688.0)),
            (RawValue::from("abc"), RawValue::Missing),
            (RawValue::from(-102.29), RawValue::from(21.88)),
        ];
        let results = Engine.process_all(&pairs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].kind, CoordinateKind::Utm13);
        assert!(!results[1].success);
        assert_eq!(results[2].kind, CoordinateKind::LatLng);
    }
}
