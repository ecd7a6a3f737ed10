//! ASCII charting for terminal output.

pub mod ascii;

pub use ascii::*;
