//! Mathematical utilities: the least-squares solver behind the trainer.

pub mod ols;

pub use ols::*;
