//! Built-in demo dataset generation.

pub mod sample;

pub use sample::*;
