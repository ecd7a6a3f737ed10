//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - loaded once at startup and shared read-only for the process lifetime
//! - exported to JSON (estimation results, model artifacts)
//! - reused by both the CLI and the TUI without conversion layers

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Smallest plantable area accepted by the estimator (acres).
pub const AREA_MIN_ACRES: f64 = 0.1;
/// Largest plantable area accepted by the estimator (acres).
pub const AREA_MAX_ACRES: f64 = 50.0;

/// Seed variety planted, used as a categorical model feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeedType {
    Hybrid,
    Organic,
    Local,
}

impl SeedType {
    /// The label as it appears in training data and reference files.
    pub fn label(self) -> &'static str {
        match self {
            SeedType::Hybrid => "Hybrid",
            SeedType::Organic => "Organic",
            SeedType::Local => "Local",
        }
    }

    pub fn next(self) -> SeedType {
        match self {
            SeedType::Hybrid => SeedType::Organic,
            SeedType::Organic => SeedType::Local,
            SeedType::Local => SeedType::Hybrid,
        }
    }

    pub fn prev(self) -> SeedType {
        match self {
            SeedType::Hybrid => SeedType::Local,
            SeedType::Organic => SeedType::Hybrid,
            SeedType::Local => SeedType::Organic,
        }
    }
}

impl std::fmt::Display for SeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-crop economics: one row per crop, immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRecord {
    pub crop: String,
    /// Seed cost per acre (Rs.).
    pub seed_cost_per_acre: f64,
    /// Fertilizer cost per acre (Rs.).
    pub fertilizer_cost_per_acre: f64,
    /// Reference yield per acre (quintals), kept for reporting alongside the
    /// model prediction.
    pub expected_yield_per_acre: f64,
}

/// One mandi (regional market) quote: multiple rows per crop, one per location.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketPriceRecord {
    pub crop: String,
    pub location: String,
    /// Price per quintal (Rs.).
    pub market_price: f64,
}

/// The two reference tables, loaded once and never mutated at runtime.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    crops: Vec<CropRecord>,
    prices: Vec<MarketPriceRecord>,
}

impl ReferenceData {
    pub fn new(crops: Vec<CropRecord>, prices: Vec<MarketPriceRecord>) -> Self {
        Self { crops, prices }
    }

    /// Crop names in table order (drives the crop selector).
    pub fn crop_names(&self) -> Vec<&str> {
        self.crops.iter().map(|c| c.crop.as_str()).collect()
    }

    /// Look up a crop row by exact name.
    pub fn crop(&self, name: &str) -> Option<&CropRecord> {
        self.crops.iter().find(|c| c.crop == name)
    }

    /// All price rows for a crop, regardless of location.
    pub fn prices_for(&self, crop: &str) -> impl Iterator<Item = &MarketPriceRecord> {
        self.prices.iter().filter(move |p| p.crop == crop)
    }

    pub fn crop_rows(&self) -> &[CropRecord] {
        &self.crops
    }

    pub fn price_rows(&self) -> &[MarketPriceRecord] {
        &self.prices
    }
}

/// Fit diagnostics computed over the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainQuality {
    pub rmse: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// Inputs to a single estimation, as collected from the user.
#[derive(Debug, Clone)]
pub struct EstimateRequest {
    pub crop: String,
    pub area_acres: f64,
    pub seed_type: SeedType,
    pub location: String,
}

/// Derived, transient output of one estimation. Recomputed per request and
/// never persisted (except via explicit `--export`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Total seed + fertilizer cost over the full area (Rs.).
    pub input_cost: f64,
    /// Model-predicted harvest over the full area (quintals).
    pub predicted_yield: f64,
    /// Resolved market price (Rs./quintal).
    pub market_price: f64,
    /// `predicted_yield * market_price` (Rs.).
    pub estimated_income: f64,
    /// `estimated_income - input_cost` (Rs.).
    pub profit: f64,
    /// True when no price row matched the requested location and the mean
    /// price across the crop's markets was used instead.
    pub used_fallback: bool,
}
