//! Mathematical utilities: inverse UTM projection and decimal-digit helpers.

pub mod digits;
pub mod projection;

pub use digits::*;
pub use projection::*;
