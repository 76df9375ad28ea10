//! Region bounding boxes.
//!
//! These are configuration constants for Aguascalientes, Mexico. They are the
//! contract that defines "valid": a pair is accepted for a kind iff both axes
//! fall inside that kind's closed intervals.

use serde::{Deserialize, Serialize};

use crate::domain::CoordinateKind;

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Per-axis intervals for one coordinate kind.
///
/// `x` is easting or longitude, `y` is northing or latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: Interval,
    pub y: Interval,
}

impl BoundingBox {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x.contains(x) && self.y.contains(y)
    }
}

pub const UTM13_BOUNDS: BoundingBox = BoundingBox {
    x: Interval::new(719_000.0, 810_000.0),
    y: Interval::new(2_392_000.0, 2_485_000.0),
};

pub const UTM14_BOUNDS: BoundingBox = BoundingBox {
    x: Interval::new(200_000.0, 300_000.0),
    y: Interval::new(1_000_000.0, 2_500_000.0),
};

pub const LATLNG_BOUNDS: BoundingBox = BoundingBox {
    x: Interval::new(-103.0, -101.5),
    y: Interval::new(21.5, 22.5),
};

/// Bounding box a kind is validated against.
///
/// Non-base kinds map to the primary box of their family.
pub fn bounds_for(kind: CoordinateKind) -> BoundingBox {
    match kind {
        CoordinateKind::Utm13
        | CoordinateKind::Utm13Inverted
        | CoordinateKind::UtmPotential
        | CoordinateKind::Mixed => UTM13_BOUNDS,
        CoordinateKind::Utm14 => UTM14_BOUNDS,
        CoordinateKind::LatLng
        | CoordinateKind::LatLngInverted
        | CoordinateKind::LatLngPotential
        | CoordinateKind::Invalid
        | CoordinateKind::Unknown => LATLNG_BOUNDS,
    }
}
