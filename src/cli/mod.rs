//! Command-line parsing for the AgriMate estimator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the estimation/training code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::SeedType;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "agrimate", version, about = "AgriMate - Crop Budget & Profit Estimator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate profit for one set of inputs and print a report.
    Estimate(EstimateArgs),
    /// Fit the yield model from a training CSV and write the model artifact.
    Train(TrainArgs),
    /// Generate a demo data directory (reference tables + training data + model).
    Init(InitArgs),
    /// Launch the interactive TUI dashboard.
    ///
    /// This uses the same estimation path as `agrimate estimate`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Data directory selection shared by all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Directory holding crop_data.csv, mandi_prices.csv, and yield_model.json.
    ///
    /// Defaults to $AGRIMATE_DATA_DIR (a `.env` file is honored), then the
    /// current directory.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Options for a one-shot estimate.
#[derive(Debug, Parser, Clone)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Crop name (must exist in the crop table).
    #[arg(short, long)]
    pub crop: String,

    /// Planted area in acres (0.1 to 50).
    #[arg(short, long)]
    pub area: f64,

    /// Seed type.
    #[arg(short, long, value_enum, default_value_t = SeedType::Hybrid)]
    pub seed_type: SeedType,

    /// Location used for market price lookup (e.g. Nashik).
    #[arg(short, long)]
    pub location: String,

    /// Render ASCII charts (enabled by default).
    #[arg(long, default_value_t = true)]
    pub chart: bool,

    /// Disable the ASCII charts.
    #[arg(long)]
    pub no_chart: bool,

    /// Chart width (cells).
    #[arg(long, default_value_t = 40)]
    pub width: usize,

    /// Export the result record to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Print load diagnostics (row counts, skipped rows).
    #[arg(long)]
    pub verbose: bool,
}

/// Options for training the yield model.
#[derive(Debug, Parser, Clone)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Training CSV (defaults to crop_training_data.csv in the data directory).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Output artifact path (defaults to yield_model.json in the data directory).
    #[arg(long, value_name = "JSON")]
    pub output: Option<PathBuf>,
}

/// Options for demo dataset generation.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Training rows to generate.
    #[arg(long, default_value_t = 120)]
    pub count: usize,

    /// Random seed for reproducible generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Std dev of the Gaussian noise on generated yields.
    #[arg(long, default_value_t = 0.8)]
    pub noise_sd: f64,

    /// Only write the CSVs; skip training the model afterwards.
    #[arg(long)]
    pub no_train: bool,
}

/// Options for the TUI dashboard.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub data: DataArgs,
}
