//! Input/output helpers.
//!
//! - CSV ingest (`ingest`)
//! - result and sample exports, CSV/JSON (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
