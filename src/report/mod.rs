//! Reporting utilities: batch summaries and formatted terminal output.
//!
//! Formatting lives here so the engine stays free of presentation concerns.

pub mod format;
pub mod summary;

pub use format::*;
pub use summary::*;
