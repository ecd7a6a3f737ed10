//! Profit estimation.
//!
//! `estimate` is a pure function over an explicitly constructed, read-only
//! [`EstimatorContext`]: the reference tables and model artifact are loaded
//! once at startup and never re-read here. Given the same context and inputs
//! the result is deterministic, and there are no side effects.

use thiserror::Error;

use crate::domain::{
    AREA_MAX_ACRES, AREA_MIN_ACRES, CropRecord, EstimateRequest, EstimationResult, ReferenceData,
};
use crate::model::{SeedEncoder, YieldModel};

/// User-correctable estimation failures.
///
/// Every path out of [`estimate`] is either a full [`EstimationResult`] or
/// one of these; partial results and NaN figures never escape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("Please enter a location for an accurate market price.")]
    EmptyLocation,
    #[error("Area must be between 0.1 and 50 acres (got {0}).")]
    InvalidArea(String),
    #[error("Unknown crop `{0}` (not in the crop table).")]
    UnknownCrop(String),
    #[error("Seed type `{0}` was not seen during training.")]
    UnknownSeedType(String),
    #[error("No market price rows for `{0}` in any location.")]
    NoPriceData(String),
}

/// Read-only state shared by every estimation for the process lifetime.
#[derive(Debug, Clone)]
pub struct EstimatorContext {
    reference: ReferenceData,
    model: YieldModel,
    encoder: SeedEncoder,
}

impl EstimatorContext {
    pub fn new(reference: ReferenceData, model: YieldModel, encoder: SeedEncoder) -> Self {
        Self {
            reference,
            model,
            encoder,
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn model(&self) -> &YieldModel {
        &self.model
    }

    pub fn encoder(&self) -> &SeedEncoder {
        &self.encoder
    }
}

/// Estimate cost, yield, income, and profit for one set of inputs.
pub fn estimate(ctx: &EstimatorContext, request: &EstimateRequest) -> Result<EstimationResult, EstimateError> {
    // Input validation happens before any lookup or model call.
    let location = request.location.trim();
    if location.is_empty() {
        return Err(EstimateError::EmptyLocation);
    }

    let area = request.area_acres;
    if !area.is_finite() || area < AREA_MIN_ACRES || area > AREA_MAX_ACRES {
        return Err(EstimateError::InvalidArea(format!("{area}")));
    }

    let crop = ctx
        .reference
        .crop(&request.crop)
        .ok_or_else(|| EstimateError::UnknownCrop(request.crop.clone()))?;

    let input_cost = (crop.seed_cost_per_acre + crop.fertilizer_cost_per_acre) * area;

    let seed_code = ctx
        .encoder
        .encode(request.seed_type.label())
        .ok_or_else(|| EstimateError::UnknownSeedType(request.seed_type.label().to_string()))?;
    let yield_per_acre = ctx.model.predict_yield_per_acre(area, seed_code);
    let predicted_yield = yield_per_acre * area;

    let (market_price, used_fallback) = resolve_market_price(&ctx.reference, crop, location)?;

    let estimated_income = predicted_yield * market_price;
    let profit = estimated_income - input_cost;

    Ok(EstimationResult {
        input_cost,
        predicted_yield,
        market_price,
        estimated_income,
        profit,
        used_fallback,
    })
}

/// Resolve the market price for `(crop, location)`.
///
/// An exact match on the case-insensitively trimmed location wins. If no row
/// matches, fall back to the arithmetic mean over all of the crop's price
/// rows and flag the fallback to the caller. A crop with zero price rows is
/// an error, never a NaN mean.
fn resolve_market_price(
    reference: &ReferenceData,
    crop: &CropRecord,
    location: &str,
) -> Result<(f64, bool), EstimateError> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for row in reference.prices_for(&crop.crop) {
        if row.location.trim().eq_ignore_ascii_case(location) {
            return Ok((row.market_price, false));
        }
        sum += row.market_price;
        count += 1;
    }

    if count == 0 {
        return Err(EstimateError::NoPriceData(crop.crop.clone()));
    }

    Ok((sum / count as f64, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarketPriceRecord, SeedType};

    fn wheat_record() -> CropRecord {
        CropRecord {
            crop: "Wheat".to_string(),
            seed_cost_per_acre: 500.0,
            fertilizer_cost_per_acre: 300.0,
            expected_yield_per_acre: 18.0,
        }
    }

    fn price(crop: &str, location: &str, market_price: f64) -> MarketPriceRecord {
        MarketPriceRecord {
            crop: crop.to_string(),
            location: location.to_string(),
            market_price,
        }
    }

    /// Model that predicts 20 quintals/acre regardless of inputs, with the
    /// full Hybrid/Local/Organic label set.
    fn context(prices: Vec<MarketPriceRecord>) -> EstimatorContext {
        let reference = ReferenceData::new(vec![wheat_record()], prices);
        let model = YieldModel {
            intercept: 20.0,
            coef_area: 0.0,
            coef_seed: 0.0,
        };
        let encoder = SeedEncoder::fit(["Hybrid", "Organic", "Local"]);
        EstimatorContext::new(reference, model, encoder)
    }

    fn request(area: f64, location: &str) -> EstimateRequest {
        EstimateRequest {
            crop: "Wheat".to_string(),
            area_acres: area,
            seed_type: SeedType::Hybrid,
            location: location.to_string(),
        }
    }

    #[test]
    fn exact_price_match_produces_expected_figures() {
        let ctx = context(vec![price("Wheat", "Nashik", 2000.0)]);
        let result = estimate(&ctx, &request(2.0, "Nashik")).unwrap();

        assert!((result.input_cost - 1600.0).abs() < 1e-9);
        assert!((result.predicted_yield - 40.0).abs() < 1e-9);
        assert!((result.market_price - 2000.0).abs() < 1e-9);
        assert!((result.estimated_income - 80000.0).abs() < 1e-9);
        assert!((result.profit - 78400.0).abs() < 1e-9);
        assert!(!result.used_fallback);
    }

    #[test]
    fn missing_location_falls_back_to_mean_price() {
        let ctx = context(vec![
            price("Wheat", "Indore", 1800.0),
            price("Wheat", "Delhi", 2200.0),
        ]);
        let result = estimate(&ctx, &request(2.0, "Pune")).unwrap();

        assert!((result.market_price - 2000.0).abs() < 1e-9);
        assert!((result.profit - 78400.0).abs() < 1e-9);
        assert!(result.used_fallback);
    }

    #[test]
    fn crop_without_price_rows_fails_instead_of_nan() {
        let ctx = context(vec![price("Rice", "Nashik", 2400.0)]);
        let err = estimate(&ctx, &request(2.0, "Nashik")).unwrap_err();
        assert_eq!(err, EstimateError::NoPriceData("Wheat".to_string()));
    }

    #[test]
    fn location_match_ignores_case_and_whitespace() {
        let ctx = context(vec![
            price("Wheat", "Nashik", 2000.0),
            price("Wheat", "Indore", 9999.0),
        ]);
        for loc in [" Nashik ", "nashik", "NASHIK"] {
            let result = estimate(&ctx, &request(2.0, loc)).unwrap();
            assert!((result.market_price - 2000.0).abs() < 1e-9);
            assert!(!result.used_fallback);
        }
    }

    #[test]
    fn out_of_range_area_is_rejected_before_prediction() {
        let ctx = context(vec![price("Wheat", "Nashik", 2000.0)]);
        for bad in [0.0, -1.0, 0.05, 51.0, f64::NAN, f64::INFINITY] {
            let err = estimate(&ctx, &request(bad, "Nashik")).unwrap_err();
            assert!(matches!(err, EstimateError::InvalidArea(_)), "area {bad}");
        }
    }

    #[test]
    fn blank_location_is_rejected_before_any_lookup() {
        // Even with an unknown crop, the blank location wins: validation runs
        // before lookups.
        let ctx = context(vec![price("Wheat", "Nashik", 2000.0)]);
        let mut req = request(2.0, "   ");
        req.crop = "NoSuchCrop".to_string();
        assert_eq!(estimate(&ctx, &req).unwrap_err(), EstimateError::EmptyLocation);
    }

    #[test]
    fn unknown_crop_is_rejected() {
        let ctx = context(vec![price("Wheat", "Nashik", 2000.0)]);
        let mut req = request(2.0, "Nashik");
        req.crop = "Barley".to_string();
        assert_eq!(
            estimate(&ctx, &req).unwrap_err(),
            EstimateError::UnknownCrop("Barley".to_string())
        );
    }

    #[test]
    fn seed_type_missing_from_training_labels_is_rejected() {
        let reference = ReferenceData::new(
            vec![wheat_record()],
            vec![price("Wheat", "Nashik", 2000.0)],
        );
        let model = YieldModel {
            intercept: 20.0,
            coef_area: 0.0,
            coef_seed: 0.0,
        };
        // Trained without Organic rows.
        let encoder = SeedEncoder::fit(["Hybrid", "Local"]);
        let ctx = EstimatorContext::new(reference, model, encoder);

        let mut req = request(2.0, "Nashik");
        req.seed_type = SeedType::Organic;
        assert_eq!(
            estimate(&ctx, &req).unwrap_err(),
            EstimateError::UnknownSeedType("Organic".to_string())
        );
    }

    #[test]
    fn seed_code_feeds_the_model() {
        // yield/acre = 10 + 1*area + 2*code; Hybrid=0, Local=1, Organic=2.
        let reference = ReferenceData::new(
            vec![wheat_record()],
            vec![price("Wheat", "Nashik", 100.0)],
        );
        let model = YieldModel {
            intercept: 10.0,
            coef_area: 1.0,
            coef_seed: 2.0,
        };
        let encoder = SeedEncoder::fit(["Hybrid", "Organic", "Local"]);
        let ctx = EstimatorContext::new(reference, model, encoder);

        let mut req = request(2.0, "Nashik");
        req.seed_type = SeedType::Organic;
        let result = estimate(&ctx, &req).unwrap();
        // (10 + 2 + 4) * 2 acres = 32 quintals.
        assert!((result.predicted_yield - 32.0).abs() < 1e-9);
    }
}
