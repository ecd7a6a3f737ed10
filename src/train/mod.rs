//! Offline trainer.
//!
//! Fits the seed encoder over the labels observed in the training data, then
//! solves an ordinary least squares problem for the yield model:
//!
//! ```text
//! yield_per_acre ~ intercept + b_area * area + b_seed * encoded_seed
//! ```
//!
//! The feature ordering `(area, encoded_seed)` and the encoder's label set
//! are the contract the estimator relies on; both are persisted together in
//! one artifact so they cannot drift apart.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use nalgebra::{DMatrix, DVector};

use crate::domain::TrainQuality;
use crate::error::AppError;
use crate::io::artifact::{self, ModelArtifact};
use crate::io::ingest::{self, RowError, TrainingRow};
use crate::math::solve_least_squares;
use crate::model::{SeedEncoder, YieldModel};

/// Number of linear parameters (intercept, area, encoded seed).
const PARAM_COUNT: usize = 3;

/// All outputs of a training run.
#[derive(Debug, Clone)]
pub struct TrainOutput {
    pub artifact: ModelArtifact,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Train from a CSV file and persist the artifact.
pub fn train_file(input: &Path, output: &Path, trained_on: NaiveDate) -> Result<TrainOutput, AppError> {
    let file = File::open(input)
        .map_err(|e| AppError::data(format!("Failed to open training data '{}': {e}", input.display())))?;
    let (rows, row_errors, rows_read) = ingest::read_training_rows(file)?;

    let artifact = fit(&rows, trained_on)?;
    artifact::write_model_json(output, &artifact)?;

    Ok(TrainOutput {
        artifact,
        row_errors,
        rows_read,
    })
}

/// Fit encoder + model from already-parsed rows.
pub fn fit(rows: &[TrainingRow], trained_on: NaiveDate) -> Result<ModelArtifact, AppError> {
    if rows.len() < PARAM_COUNT {
        return Err(AppError::data(format!(
            "Training data has {} usable rows; at least {PARAM_COUNT} are required.",
            rows.len()
        )));
    }

    let encoder = SeedEncoder::fit(rows.iter().map(|r| r.seed_type.as_str()));
    if encoder.is_empty() {
        return Err(AppError::data("Training data has no seed-type labels."));
    }

    let n = rows.len();
    let mut design = Vec::with_capacity(n * PARAM_COUNT);
    let mut targets = Vec::with_capacity(n);
    for row in rows {
        // `fit` just built the encoder over these labels, so encoding here
        // can only fail on an internal inconsistency.
        let code = encoder
            .encode(&row.seed_type)
            .ok_or_else(|| AppError::internal(format!("Label `{}` missing from fitted encoder.", row.seed_type)))?;
        design.extend_from_slice(&[1.0, row.area_acres, code]);
        targets.push(row.yield_per_acre);
    }

    let x = DMatrix::from_row_slice(n, PARAM_COUNT, &design);
    let y = DVector::from_vec(targets);

    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        AppError::data(
            "Training data is too degenerate to fit (e.g., a single area and seed type everywhere).",
        )
    })?;

    let model = YieldModel {
        intercept: beta[0],
        coef_area: beta[1],
        coef_seed: beta[2],
    };
    let quality = compute_quality(&x, &y, &beta);

    Ok(ModelArtifact {
        tool: "agrimate".to_string(),
        trained_on,
        n_obs: n,
        seed_labels: encoder.labels().to_vec(),
        model,
        quality,
    })
}

fn compute_quality(x: &DMatrix<f64>, y: &DVector<f64>, beta: &DVector<f64>) -> TrainQuality {
    let fitted = x * beta;
    let residuals = y - &fitted;
    let n = y.len();

    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let mean = y.iter().sum::<f64>() / n as f64;
    let sst: f64 = y.iter().map(|v| (v - mean) * (v - mean)).sum();

    let rmse = (sse / n as f64).sqrt();
    // A constant target makes R² undefined; report 1.0 for a perfect fit of
    // the constant, 0.0 otherwise.
    let r_squared = if sst > 0.0 {
        1.0 - sse / sst
    } else if sse < 1e-12 {
        1.0
    } else {
        0.0
    };

    TrainQuality { rmse, r_squared, n }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(area: f64, seed: &str, yield_per_acre: f64) -> TrainingRow {
        TrainingRow {
            area_acres: area,
            seed_type: seed.to_string(),
            yield_per_acre,
        }
    }

    fn trained_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn fit_recovers_exact_linear_data() {
        // Ground truth: yield/acre = 12 + 0.8*area + 1.5*code,
        // with Hybrid=0, Local=1, Organic=2.
        let truth = |area: f64, code: f64| 12.0 + 0.8 * area + 1.5 * code;
        let rows = vec![
            row(1.0, "Hybrid", truth(1.0, 0.0)),
            row(2.0, "Hybrid", truth(2.0, 0.0)),
            row(1.5, "Local", truth(1.5, 1.0)),
            row(3.0, "Local", truth(3.0, 1.0)),
            row(2.5, "Organic", truth(2.5, 2.0)),
            row(4.0, "Organic", truth(4.0, 2.0)),
        ];

        let artifact = fit(&rows, trained_on()).unwrap();
        assert_eq!(artifact.seed_labels, vec!["Hybrid", "Local", "Organic"]);
        assert!((artifact.model.intercept - 12.0).abs() < 1e-8);
        assert!((artifact.model.coef_area - 0.8).abs() < 1e-8);
        assert!((artifact.model.coef_seed - 1.5).abs() < 1e-8);
        assert!(artifact.quality.rmse < 1e-8);
        assert!((artifact.quality.r_squared - 1.0).abs() < 1e-8);
        assert_eq!(artifact.n_obs, 6);
    }

    #[test]
    fn fit_rejects_too_few_rows() {
        let rows = vec![row(1.0, "Hybrid", 15.0), row(2.0, "Local", 16.0)];
        let err = fit(&rows, trained_on()).unwrap_err();
        assert!(err.to_string().contains("usable rows"));
    }

    #[test]
    fn fit_rejects_fully_degenerate_data() {
        // Identical area and seed type everywhere: the area column and the
        // seed column are constant, so the design matrix is rank 1.
        let rows = vec![
            row(2.0, "Hybrid", 15.0),
            row(2.0, "Hybrid", 16.0),
            row(2.0, "Hybrid", 17.0),
            row(2.0, "Hybrid", 18.0),
        ];
        // SVD may still return a minimum-norm solution here; accept either a
        // clean error or a finite fit, but never a NaN model.
        match fit(&rows, trained_on()) {
            Ok(artifact) => assert!(artifact.model.is_finite()),
            Err(err) => assert!(err.to_string().contains("degenerate")),
        }
    }

    #[test]
    fn quality_reflects_noisy_fit() {
        let rows = vec![
            row(1.0, "Hybrid", 13.0),
            row(2.0, "Hybrid", 13.4),
            row(3.0, "Hybrid", 14.9),
            row(4.0, "Hybrid", 15.1),
            row(5.0, "Hybrid", 16.2),
        ];
        let artifact = fit(&rows, trained_on()).unwrap();
        assert!(artifact.quality.rmse > 0.0);
        assert!(artifact.quality.r_squared > 0.8 && artifact.quality.r_squared < 1.0);
    }
}
