//! Reporting utilities: formatted terminal output for estimates and training.

pub mod format;

pub use format::*;
