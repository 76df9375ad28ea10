//! Coordinate engine.
//!
//! Responsibilities:
//!
//! - normalize raw axis values (`normalize`)
//! - range-check pairs against the region boxes (`validate`)
//! - propose a coordinate kind (`classify`)
//! - repair failing pairs with an ordered strategy ladder (`correct`)
//! - orchestrate the above and project UTM results (`process`)

pub mod classify;
pub mod correct;
pub mod normalize;
pub mod process;
pub mod validate;

pub use classify::*;
pub use correct::*;
pub use normalize::*;
pub use process::*;
pub use validate::*;
