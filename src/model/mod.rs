//! The yield model and its categorical encoder.
//!
//! The trainer fits both; the estimator only ever loads them from a persisted
//! artifact and treats them as immutable.

pub mod encoder;
pub mod linear;

pub use encoder::SeedEncoder;
pub use linear::YieldModel;
