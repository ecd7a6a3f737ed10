//! Synthetic demo dataset generation.
//!
//! `agrimate init` writes a small, self-consistent data directory so the tool
//! works out of the box: fixed crop economics and mandi price tables plus a
//! training CSV drawn from a known linear ground truth with Gaussian noise.
//! Generation is seeded and reproducible.

use std::fs::File;
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{CropRecord, MarketPriceRecord};
use crate::error::AppError;
use crate::io::ingest::TrainingRow;
use crate::io::paths::DataPaths;

/// Ground-truth coefficients behind the demo training data. The trainer
/// should approximately recover these from the generated CSV.
pub const TRUE_INTERCEPT: f64 = 14.0;
pub const TRUE_COEF_AREA: f64 = 0.6;
pub const TRUE_COEF_SEED: f64 = -1.8;

const DEMO_SEED_LABELS: [&str; 3] = ["Hybrid", "Organic", "Local"];

#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Training rows to generate.
    pub count: usize,
    pub seed: u64,
    /// Std dev of the Gaussian noise on yield per acre.
    pub noise_sd: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            count: 120,
            seed: 42,
            noise_sd: 0.8,
        }
    }
}

/// Write `crop_data.csv`, `mandi_prices.csv`, and `crop_training_data.csv`
/// into the data directory.
pub fn write_demo_dataset(paths: &DataPaths, config: &DemoConfig) -> Result<(), AppError> {
    if config.count == 0 {
        return Err(AppError::data("Demo row count must be > 0."));
    }
    if !config.noise_sd.is_finite() || config.noise_sd < 0.0 {
        return Err(AppError::data("Demo noise std dev must be finite and >= 0."));
    }

    std::fs::create_dir_all(paths.dir())
        .map_err(|e| AppError::data(format!("Failed to create '{}': {e}", paths.dir().display())))?;

    write_crop_table(&paths.crop_table(), &demo_crops())?;
    write_price_table(&paths.price_table(), &demo_prices())?;

    let rows = generate_training_rows(config)?;
    write_training_table(&paths.training_data(), &rows)?;

    Ok(())
}

/// Generate training rows from the ground-truth model plus noise.
pub fn generate_training_rows(config: &DemoConfig) -> Result<Vec<TrainingRow>, AppError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise_sd)
        .map_err(|e| AppError::internal(format!("Noise distribution error: {e}")))?;

    let mut rows = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let area = rng.gen_range(0.5..=10.0);
        let label_idx = rng.gen_range(0..DEMO_SEED_LABELS.len());
        let label = DEMO_SEED_LABELS[label_idx];

        // The trainer encodes sorted labels, so compute the code the same way.
        let mut sorted = DEMO_SEED_LABELS;
        sorted.sort_unstable();
        let code = sorted.iter().position(|l| *l == label).unwrap_or(0) as f64;

        let noise = normal.sample(&mut rng);
        let yield_per_acre =
            (TRUE_INTERCEPT + TRUE_COEF_AREA * area + TRUE_COEF_SEED * code + noise).max(0.1);

        rows.push(TrainingRow {
            area_acres: area,
            seed_type: label.to_string(),
            yield_per_acre,
        });
    }
    Ok(rows)
}

fn demo_crops() -> Vec<CropRecord> {
    let mk = |crop: &str, seed: f64, fert: f64, expected: f64| CropRecord {
        crop: crop.to_string(),
        seed_cost_per_acre: seed,
        fertilizer_cost_per_acre: fert,
        expected_yield_per_acre: expected,
    };
    vec![
        mk("Wheat", 500.0, 300.0, 18.0),
        mk("Rice", 700.0, 450.0, 22.0),
        mk("Maize", 550.0, 350.0, 20.0),
        mk("Sugarcane", 1200.0, 800.0, 35.0),
    ]
}

fn demo_prices() -> Vec<MarketPriceRecord> {
    let mk = |crop: &str, location: &str, price: f64| MarketPriceRecord {
        crop: crop.to_string(),
        location: location.to_string(),
        market_price: price,
    };
    vec![
        mk("Wheat", "Nashik", 2000.0),
        mk("Wheat", "Indore", 1850.0),
        mk("Wheat", "Delhi", 2150.0),
        mk("Rice", "Nashik", 2400.0),
        mk("Rice", "Kolkata", 2250.0),
        mk("Maize", "Indore", 1600.0),
        mk("Maize", "Hyderabad", 1700.0),
        mk("Sugarcane", "Pune", 320.0),
        mk("Sugarcane", "Kolhapur", 340.0),
    ]
}

fn write_crop_table(path: &Path, crops: &[CropRecord]) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;
    writer
        .write_record(["Crop", "Seed_Cost_per_Acre", "Fertilizer_Cost", "Expected_Yield_per_Acre"])
        .map_err(|e| write_error(path, e))?;
    for c in crops {
        writer
            .write_record([
                c.crop.clone(),
                format!("{}", c.seed_cost_per_acre),
                format!("{}", c.fertilizer_cost_per_acre),
                format!("{}", c.expected_yield_per_acre),
            ])
            .map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|e| AppError::data(format!("Failed to flush '{}': {e}", path.display())))
}

fn write_price_table(path: &Path, prices: &[MarketPriceRecord]) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;
    writer
        .write_record(["Crop", "Location", "Market_Price"])
        .map_err(|e| write_error(path, e))?;
    for p in prices {
        writer
            .write_record([p.crop.clone(), p.location.clone(), format!("{}", p.market_price)])
            .map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|e| AppError::data(format!("Failed to flush '{}': {e}", path.display())))
}

fn write_training_table(path: &Path, rows: &[TrainingRow]) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;
    writer
        .write_record(["Area", "Seed_Type", "Yield_per_Acre"])
        .map_err(|e| write_error(path, e))?;
    for r in rows {
        writer
            .write_record([
                format!("{:.3}", r.area_acres),
                r.seed_type.clone(),
                format!("{:.3}", r.yield_per_acre),
            ])
            .map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|e| AppError::data(format!("Failed to flush '{}': {e}", path.display())))
}

fn open_writer(path: &Path) -> Result<csv::Writer<File>, AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::data(format!("Failed to create '{}': {e}", path.display())))?;
    Ok(csv::Writer::from_writer(file))
}

fn write_error(path: &Path, e: csv::Error) -> AppError {
    AppError::data(format!("Failed to write '{}': {e}", path.display()))
}
