//! Fitted linear yield model.
//!
//! The model predicts yield per acre from `(area, encoded_seed)`:
//!
//! ```text
//! yield_per_acre = intercept + b_area * area + b_seed * encoded_seed
//! ```
//!
//! The feature ordering is part of the training/inference contract and is
//! fixed by the named fields below; coefficients are only valid for inputs in
//! the same units used during fitting (acres, encoder codes).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldModel {
    pub intercept: f64,
    pub coef_area: f64,
    pub coef_seed: f64,
}

impl YieldModel {
    /// Predict yield per acre for one `(area, encoded seed)` observation.
    pub fn predict_yield_per_acre(&self, area_acres: f64, seed_code: f64) -> f64 {
        self.intercept + self.coef_area * area_acres + self.coef_seed * seed_code
    }

    pub fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.coef_area.is_finite() && self.coef_seed.is_finite()
    }
}
