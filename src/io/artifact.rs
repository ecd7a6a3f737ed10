//! Read/write the model artifact JSON.
//!
//! The artifact is the "portable" representation of a training run:
//! - the fitted yield model coefficients
//! - the encoder's label set (codes are the sorted-label indices)
//! - run metadata (training date, row count) and fit quality
//!
//! The dashboard loads it once at startup and treats it as immutable.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::TrainQuality;
use crate::error::AppError;
use crate::model::{SeedEncoder, YieldModel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub tool: String,
    pub trained_on: NaiveDate,
    /// Training rows actually used for the fit.
    pub n_obs: usize,
    /// Sorted, deduplicated seed labels seen during training.
    pub seed_labels: Vec<String>,
    pub model: YieldModel,
    pub quality: TrainQuality,
}

impl ModelArtifact {
    /// Rebuild the inference-time encoder from the persisted label set.
    ///
    /// Fails if the label set is empty or not sorted-unique, which would make
    /// inference codes disagree with training.
    pub fn encoder(&self) -> Result<SeedEncoder, AppError> {
        SeedEncoder::from_labels(self.seed_labels.clone()).ok_or_else(|| {
            AppError::data("Model artifact has an invalid seed label set (must be sorted and unique).")
        })
    }
}

/// Write the artifact JSON.
pub fn write_model_json(path: &Path, artifact: &ModelArtifact) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::data(format!("Failed to create model artifact '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, artifact)
        .map_err(|e| AppError::data(format!("Failed to write model artifact: {e}")))?;
    Ok(())
}

/// Read and validate the artifact JSON.
pub fn read_model_json(path: &Path) -> Result<ModelArtifact, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::data(format!("Failed to open model artifact '{}': {e}", path.display())))?;
    let artifact: ModelArtifact = serde_json::from_reader(file)
        .map_err(|e| AppError::data(format!("Invalid model artifact: {e}")))?;

    if !artifact.model.is_finite() {
        return Err(AppError::data(
            "Model artifact has non-finite coefficients.",
        ));
    }
    // Validate the label set up front so estimation can't start with an
    // encoder that disagrees with training.
    artifact.encoder()?;

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_artifact() -> ModelArtifact {
        ModelArtifact {
            tool: "agrimate".to_string(),
            trained_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            n_obs: 12,
            seed_labels: vec!["Hybrid".into(), "Local".into(), "Organic".into()],
            model: YieldModel {
                intercept: 12.0,
                coef_area: 0.5,
                coef_seed: -1.0,
            },
            quality: TrainQuality {
                rmse: 0.3,
                r_squared: 0.97,
                n: 12,
            },
        }
    }

    #[test]
    fn artifact_round_trips_through_json() {
        let artifact = sample_artifact();
        let json = serde_json::to_string(&artifact).unwrap();
        let back: ModelArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back.model, artifact.model);
        assert_eq!(back.seed_labels, artifact.seed_labels);
        assert_eq!(back.trained_on, artifact.trained_on);
    }

    #[test]
    fn encoder_rejects_unsorted_labels() {
        let mut artifact = sample_artifact();
        artifact.seed_labels = vec!["Organic".into(), "Hybrid".into()];
        assert!(artifact.encoder().is_err());
    }
}
