//! `coordfix` library crate.
//!
//! The binary (`cfx`) is a thin wrapper around this library so that:
//!
//! - the coordinate engine is testable without spawning processes
//! - map/export front-ends depend on one exported interface instead of
//!   re-deriving the projection math
//! - batch tooling (CSV ingest, synthetic samples) stays separate from the core

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod math;
pub mod report;

pub use domain::{CoordinateKind, GeoPoint, ProcessResult, RawValue, Xy};
pub use engine::Engine;
