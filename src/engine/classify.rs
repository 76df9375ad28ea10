//! Magnitude-based classification of a normalized pair.
//!
//! Rules are evaluated in a fixed order and the first match wins. Order matters
//! because the numeric ranges overlap: a valid UTM pair must win over the
//! "looks like a swapped UTM pair" rule, and a plain lat/lng pair must win over
//! the rescaling heuristics.

use crate::domain::{CoordinateKind, Interval, UTM13_BOUNDS, UTM14_BOUNDS, Xy};
use crate::math::pow10_into;

/// Six-digit metre values.
const EASTING_SHAPE: (f64, f64) = (100_000.0, 1_000_000.0);
/// Seven-digit metre values.
const NORTHING_SHAPE: (f64, f64) = (1_000_000.0, 10_000_000.0);

/// Regional longitude magnitude (degrees west).
const LNG_MAGNITUDE: Interval = Interval::new(100.0, 105.0);
/// Regional latitude magnitude (degrees north).
const LAT_MAGNITUDE: Interval = Interval::new(20.0, 25.0);

/// Hull of the zone 13 and zone 14 easting ranges.
const UTM_EASTING_SPAN: Interval = Interval::new(UTM14_BOUNDS.x.min, UTM13_BOUNDS.x.max);
/// Hull of the zone 13 and zone 14 northing ranges.
const UTM_NORTHING_SPAN: Interval = Interval::new(UTM14_BOUNDS.y.min, UTM14_BOUNDS.y.max);

/// Largest decimal shift considered when testing UTM plausibility.
pub const UTM_MAX_SHIFT: i32 = 9;
/// Largest decimal shift considered when testing lat/lng plausibility.
pub const LATLNG_MAX_SHIFT: i32 = 2;

fn in_half_open(v: f64, (lo, hi): (f64, f64)) -> bool {
    v >= lo && v < hi
}

fn easting_shaped(v: f64) -> bool {
    in_half_open(v, EASTING_SHAPE)
}

fn northing_shaped(v: f64) -> bool {
    in_half_open(v, NORTHING_SHAPE)
}

fn utm_shaped(v: f64) -> bool {
    in_half_open(v.abs(), (EASTING_SHAPE.0, NORTHING_SHAPE.1))
}

fn degree_shaped(v: f64) -> bool {
    v.abs() <= 180.0
}

/// Both axes can be moved into the UTM spans by a power of ten each.
fn utm_rescalable(pair: Xy) -> bool {
    pair.x > 0.0
        && pair.y > 0.0
        && pow10_into(pair.x, UTM_EASTING_SPAN, -UTM_MAX_SHIFT..=UTM_MAX_SHIFT).is_some()
        && pow10_into(pair.y, UTM_NORTHING_SPAN, -UTM_MAX_SHIFT..=UTM_MAX_SHIFT).is_some()
}

/// Both axes can be moved into regional degree magnitudes by a power of ten each.
fn latlng_rescalable(pair: Xy) -> bool {
    pow10_into(pair.x.abs(), LNG_MAGNITUDE, -LATLNG_MAX_SHIFT..=LATLNG_MAX_SHIFT).is_some()
        && pow10_into(pair.y.abs(), LAT_MAGNITUDE, -LATLNG_MAX_SHIFT..=LATLNG_MAX_SHIFT).is_some()
}

/// Propose the most likely kind for a normalized pair.
pub fn classify(pair: Xy) -> CoordinateKind {
    let Xy { x, y } = pair;

    // Zero is how several source documents mark "no coordinate".
    if x == 0.0 || y == 0.0 {
        return CoordinateKind::Invalid;
    }
    if UTM13_BOUNDS.contains(x, y) {
        return CoordinateKind::Utm13;
    }
    if UTM14_BOUNDS.contains(x, y) {
        return CoordinateKind::Utm14;
    }
    if x.abs() <= 180.0 && y.abs() <= 90.0 {
        return CoordinateKind::LatLng;
    }
    if easting_shaped(y) && northing_shaped(x) {
        return CoordinateKind::Utm13Inverted;
    }
    if LAT_MAGNITUDE.contains(x.abs()) && LNG_MAGNITUDE.contains(y.abs()) {
        return CoordinateKind::LatLngInverted;
    }
    if (utm_shaped(x) && degree_shaped(y)) || (degree_shaped(x) && utm_shaped(y)) {
        return CoordinateKind::Mixed;
    }

    // A northing already in range is strong evidence even when the easting
    // has lost its leading digit.
    let anchored = x > 0.0 && UTM_NORTHING_SPAN.contains(y);
    let utm = anchored || utm_rescalable(pair);
    if utm && x.abs().max(y.abs()) > 180.0 {
        return CoordinateKind::UtmPotential;
    }
    if latlng_rescalable(pair) {
        return CoordinateKind::LatLngPotential;
    }
    if utm {
        return CoordinateKind::UtmPotential;
    }

    CoordinateKind::Unknown
}
