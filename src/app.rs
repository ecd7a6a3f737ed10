//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads reference tables and the model artifact
//! - runs estimation / training / demo generation
//! - prints reports/charts
//! - writes optional exports

use std::fs::File;

use clap::Parser;

use crate::cli::{Command, EstimateArgs, InitArgs, TrainArgs};
use crate::data::DemoConfig;
use crate::domain::EstimateRequest;
use crate::error::AppError;
use crate::io::paths::DataPaths;

pub mod pipeline;

/// Entry point for the `agrimate` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `agrimate` (and `agrimate --data-dir ...`) to behave like
    // `agrimate tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Estimate(args) => handle_estimate(args),
        Command::Train(args) => handle_train(args),
        Command::Init(args) => handle_init(args),
        Command::Tui(args) => crate::tui::run(&args),
    }
}

fn handle_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let paths = DataPaths::resolve(args.data.data_dir.as_deref());
    let loaded = pipeline::load_context(&paths)?;

    if args.verbose {
        print!("{}", crate::report::format_load_summary(&loaded.ingest));
    }

    let request = EstimateRequest {
        crop: args.crop.clone(),
        area_acres: args.area,
        seed_type: args.seed_type,
        location: args.location.clone(),
    };

    let result = crate::estimate::estimate(&loaded.ctx, &request)?;
    let crop = loaded
        .ctx
        .reference()
        .crop(&request.crop)
        .ok_or_else(|| AppError::internal("Crop disappeared from the loaded table."))?;

    print!(
        "{}",
        crate::report::format_estimate_report(&request, crop, &result)
    );

    if args.chart && !args.no_chart {
        println!();
        print!("{}", crate::plot::render_cost_income_bars(&result, args.width));
        println!();
        print!(
            "{}",
            crate::plot::render_cost_breakdown_bars(crop, request.area_acres, args.width)
        );
    }

    if let Some(path) = &args.export {
        let file = File::create(path)
            .map_err(|e| AppError::data(format!("Failed to create export '{}': {e}", path.display())))?;
        serde_json::to_writer_pretty(file, &result)
            .map_err(|e| AppError::data(format!("Failed to write export: {e}")))?;
    }

    Ok(())
}

fn handle_train(args: TrainArgs) -> Result<(), AppError> {
    let paths = DataPaths::resolve(args.data.data_dir.as_deref());
    let input = args.input.clone().unwrap_or_else(|| paths.training_data());
    let output = args.output.clone().unwrap_or_else(|| paths.model_artifact());

    let trained_on = chrono::Local::now().date_naive();
    let train = crate::train::train_file(&input, &output, trained_on)?;

    print!("{}", crate::report::format_train_summary(&train));
    println!("Wrote model artifact: {}", output.display());
    Ok(())
}

fn handle_init(args: InitArgs) -> Result<(), AppError> {
    let paths = DataPaths::resolve(args.data.data_dir.as_deref());
    let config = DemoConfig {
        count: args.count,
        seed: args.seed,
        noise_sd: args.noise_sd,
    };

    crate::data::write_demo_dataset(&paths, &config)?;
    println!("Wrote demo dataset to {}", paths.dir().display());

    if !args.no_train {
        let trained_on = chrono::Local::now().date_naive();
        let train =
            crate::train::train_file(&paths.training_data(), &paths.model_artifact(), trained_on)?;
        print!("{}", crate::report::format_train_summary(&train));
        println!("Wrote model artifact: {}", paths.model_artifact().display());
    }

    Ok(())
}

/// Rewrite argv so `agrimate` defaults to `agrimate tui`.
///
/// Rules:
/// - `agrimate`                      -> `agrimate tui`
/// - `agrimate --data-dir X ...`     -> `agrimate tui --data-dir X ...`
/// - `agrimate --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "estimate" | "train" | "init" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["agrimate"])), args(&["agrimate", "tui"]));
    }

    #[test]
    fn leading_flag_routes_to_tui() {
        assert_eq!(
            rewrite_args(args(&["agrimate", "--data-dir", "demo"])),
            args(&["agrimate", "tui", "--data-dir", "demo"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["agrimate", "estimate", "-c", "Wheat"])),
            args(&["agrimate", "estimate", "-c", "Wheat"])
        );
        assert_eq!(rewrite_args(args(&["agrimate", "--help"])), args(&["agrimate", "--help"]));
    }
}
