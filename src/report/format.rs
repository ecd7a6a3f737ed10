//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the estimation/training code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{CropRecord, EstimateRequest, EstimationResult};
use crate::io::ingest::{IngestedReference, RowError};
use crate::train::TrainOutput;

/// Format the full estimation report (inputs, metrics, cost breakdown).
pub fn format_estimate_report(
    request: &EstimateRequest,
    crop: &CropRecord,
    result: &EstimationResult,
) -> String {
    let mut out = String::new();

    out.push_str("=== AgriMate - Crop Budget & Profit Estimate ===\n");
    out.push_str(&format!(
        "Crop: {} | Area: {} acres | Seed: {} | Location: {}\n",
        request.crop,
        request.area_acres,
        request.seed_type,
        request.location.trim(),
    ));
    out.push('\n');

    out.push_str(&format!("Total Input Cost     : Rs. {}\n", fmt_money(result.input_cost)));
    out.push_str(&format!("Predicted Yield      : {:.2} quintals\n", result.predicted_yield));
    out.push_str(&format!(
        "Market Price         : Rs. {}/quintal{}\n",
        fmt_money(result.market_price),
        if result.used_fallback {
            " (mean across markets; no quote for this location)"
        } else {
            ""
        },
    ));
    out.push_str(&format!("Estimated Income     : Rs. {}\n", fmt_money(result.estimated_income)));
    out.push_str(&format!("Estimated Profit     : Rs. {}\n", fmt_money(result.profit)));
    out.push('\n');

    let seed_total = crop.seed_cost_per_acre * request.area_acres;
    let fert_total = crop.fertilizer_cost_per_acre * request.area_acres;
    out.push_str("Input cost breakdown:\n");
    out.push_str(&format!(
        "- Seed       : Rs. {} ({:.1}%)\n",
        fmt_money(seed_total),
        share_pct(seed_total, result.input_cost),
    ));
    out.push_str(&format!(
        "- Fertilizer : Rs. {} ({:.1}%)\n",
        fmt_money(fert_total),
        share_pct(fert_total, result.input_cost),
    ));

    out
}

/// Format the startup load summary (row counts + skipped-row diagnostics).
pub fn format_load_summary(ingest: &IngestedReference) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Loaded {} crops ({} rows read) and {} price quotes ({} rows read).\n",
        ingest.reference.crop_rows().len(),
        ingest.crop_rows_read,
        ingest.reference.price_rows().len(),
        ingest.price_rows_read,
    ));
    append_row_errors(&mut out, "crop table", &ingest.crop_errors);
    append_row_errors(&mut out, "price table", &ingest.price_errors);
    out
}

/// Format the training run summary.
pub fn format_train_summary(output: &TrainOutput) -> String {
    let artifact = &output.artifact;
    let mut out = String::new();

    out.push_str("=== AgriMate - Yield Model Training ===\n");
    out.push_str(&format!(
        "Rows: {} used / {} read\n",
        artifact.n_obs, output.rows_read
    ));
    out.push_str(&format!("Seed labels: {}\n", artifact.seed_labels.join(", ")));
    out.push_str(&format!(
        "Model: yield/acre = {:.4} + {:.4}*area + {:.4}*seed_code\n",
        artifact.model.intercept, artifact.model.coef_area, artifact.model.coef_seed
    ));
    out.push_str(&format!(
        "Quality: RMSE={:.4} R²={:.4} (n={})\n",
        artifact.quality.rmse, artifact.quality.r_squared, artifact.quality.n
    ));
    append_row_errors(&mut out, "training data", &output.row_errors);
    out
}

fn append_row_errors(out: &mut String, table: &str, errors: &[RowError]) {
    if errors.is_empty() {
        return;
    }
    out.push_str(&format!("Skipped {} row(s) in the {table}:\n", errors.len()));
    for e in errors {
        out.push_str(&format!("- line {}: {}\n", e.line, e.message));
    }
}

fn share_pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// Format a currency amount with thousands separators and two decimals,
/// e.g. `78400` -> `78,400.00`.
pub fn fmt_money(v: f64) -> String {
    let negative = v < 0.0;
    let raw = format!("{:.2}", v.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeedType;

    #[test]
    fn money_formatting_groups_thousands() {
        assert_eq!(fmt_money(0.0), "0.00");
        assert_eq!(fmt_money(999.5), "999.50");
        assert_eq!(fmt_money(1600.0), "1,600.00");
        assert_eq!(fmt_money(80000.0), "80,000.00");
        assert_eq!(fmt_money(1234567.891), "1,234,567.89");
        assert_eq!(fmt_money(-78400.0), "-78,400.00");
    }

    #[test]
    fn estimate_report_mentions_fallback_pricing() {
        let request = EstimateRequest {
            crop: "Wheat".to_string(),
            area_acres: 2.0,
            seed_type: SeedType::Hybrid,
            location: "Pune".to_string(),
        };
        let crop = CropRecord {
            crop: "Wheat".to_string(),
            seed_cost_per_acre: 500.0,
            fertilizer_cost_per_acre: 300.0,
            expected_yield_per_acre: 18.0,
        };
        let result = EstimationResult {
            input_cost: 1600.0,
            predicted_yield: 40.0,
            market_price: 2000.0,
            estimated_income: 80000.0,
            profit: 78400.0,
            used_fallback: true,
        };

        let report = format_estimate_report(&request, &crop, &result);
        assert!(report.contains("Rs. 78,400.00"));
        assert!(report.contains("mean across markets"));
        assert!(report.contains("Seed       : Rs. 1,000.00 (62.5%)"));
        assert!(report.contains("Fertilizer : Rs. 600.00 (37.5%)"));
    }

    #[test]
    fn estimate_report_omits_fallback_note_on_exact_match() {
        let request = EstimateRequest {
            crop: "Wheat".to_string(),
            area_acres: 2.0,
            seed_type: SeedType::Hybrid,
            location: "Nashik".to_string(),
        };
        let crop = CropRecord {
            crop: "Wheat".to_string(),
            seed_cost_per_acre: 500.0,
            fertilizer_cost_per_acre: 300.0,
            expected_yield_per_acre: 18.0,
        };
        let result = EstimationResult {
            input_cost: 1600.0,
            predicted_yield: 40.0,
            market_price: 2000.0,
            estimated_income: 80000.0,
            profit: 78400.0,
            used_fallback: false,
        };

        let report = format_estimate_report(&request, &crop, &result);
        assert!(!report.contains("mean across markets"));
    }
}
