//! Synthetic input data for demos, benchmarks and end-to-end tests.

pub mod sample;

pub use sample::*;
