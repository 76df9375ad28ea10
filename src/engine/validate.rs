//! Range validation against the region bounding boxes.
//!
//! A pure predicate plus per-axis flags; the corrector reads the flags to see
//! which axis still needs repair.

use crate::domain::{AxisChecks, BoundingBox, CoordinateKind, ValidationOutcome, Xy, bounds_for};

/// Validate `pair` against the box associated with `kind`.
pub fn validate(pair: Xy, kind: CoordinateKind) -> ValidationOutcome {
    validate_in(pair, bounds_for(kind))
}

/// Validate `pair` against an explicit box.
pub fn validate_in(pair: Xy, bounds: BoundingBox) -> ValidationOutcome {
    let first_in_range = bounds.x.contains(pair.x);
    let second_in_range = bounds.y.contains(pair.y);
    ValidationOutcome {
        valid: first_in_range && second_in_range,
        axis_checks: AxisChecks {
            first_in_range,
            second_in_range,
        },
        bounds_used: bounds,
    }
}
