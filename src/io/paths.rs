//! Data directory resolution.
//!
//! All data files live in a single directory with fixed names. The directory
//! is resolved once at startup:
//!
//! 1. `--data-dir` flag, if given
//! 2. `AGRIMATE_DATA_DIR` environment variable (a `.env` file is honored)
//! 3. the current directory

use std::path::{Path, PathBuf};

pub const CROP_FILE: &str = "crop_data.csv";
pub const PRICE_FILE: &str = "mandi_prices.csv";
pub const MODEL_FILE: &str = "yield_model.json";
pub const TRAINING_FILE: &str = "crop_training_data.csv";

#[derive(Debug, Clone)]
pub struct DataPaths {
    dir: PathBuf,
}

impl DataPaths {
    pub fn resolve(flag: Option<&Path>) -> Self {
        if let Some(dir) = flag {
            return Self { dir: dir.to_path_buf() };
        }
        dotenvy::dotenv().ok();
        let dir = std::env::var("AGRIMATE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Self { dir }
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn crop_table(&self) -> PathBuf {
        self.dir.join(CROP_FILE)
    }

    pub fn price_table(&self) -> PathBuf {
        self.dir.join(PRICE_FILE)
    }

    pub fn model_artifact(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn training_data(&self) -> PathBuf {
        self.dir.join(TRAINING_FILE)
    }
}
