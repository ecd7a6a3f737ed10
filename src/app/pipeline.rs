//! Shared startup logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve paths -> load reference tables -> load model artifact -> build context
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! The context is built exactly once per process; nothing reloads implicitly.

use crate::error::AppError;
use crate::estimate::EstimatorContext;
use crate::io::artifact::{self, ModelArtifact};
use crate::io::ingest::{self, IngestedReference};
use crate::io::paths::DataPaths;

/// Everything loaded at startup.
#[derive(Debug, Clone)]
pub struct LoadedContext {
    pub ctx: EstimatorContext,
    pub ingest: IngestedReference,
    pub artifact: ModelArtifact,
}

/// Load reference tables and the model artifact, then assemble the read-only
/// estimator context.
pub fn load_context(paths: &DataPaths) -> Result<LoadedContext, AppError> {
    let ingest = ingest::load_reference_data(paths)?;
    let artifact = artifact::read_model_json(&paths.model_artifact())?;
    let encoder = artifact.encoder()?;

    let ctx = EstimatorContext::new(ingest.reference.clone(), artifact.model.clone(), encoder);

    Ok(LoadedContext {
        ctx,
        ingest,
        artifact,
    })
}
