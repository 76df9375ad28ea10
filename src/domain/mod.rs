//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - raw and normalized inputs (`RawValue`, `NormalizedPair`)
//! - the closed `CoordinateKind` enum and UTM zones
//! - region bounding boxes (`bounds`)
//! - engine outputs (`ValidationOutcome`, `ProcessResult`)
//! - batch configuration (`BatchConfig`)

pub mod bounds;
pub mod types;

pub use bounds::*;
pub use types::*;
