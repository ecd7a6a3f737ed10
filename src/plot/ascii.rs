//! ASCII bar charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-width bars), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)

use crate::domain::{CropRecord, EstimationResult};
use crate::report::fmt_money;

/// Render the cost-vs-income comparison as horizontal bars.
pub fn render_cost_income_bars(result: &EstimationResult, width: usize) -> String {
    let rows = [
        ("Input Cost", result.input_cost),
        ("Est. Income", result.estimated_income),
    ];
    render_bars("Input Cost vs Estimated Income (Rs.)", &rows, width)
}

/// Render the input cost breakdown (seed vs fertilizer) as horizontal bars.
pub fn render_cost_breakdown_bars(crop: &CropRecord, area_acres: f64, width: usize) -> String {
    let rows = [
        ("Seed", crop.seed_cost_per_acre * area_acres),
        ("Fertilizer", crop.fertilizer_cost_per_acre * area_acres),
    ];
    render_bars("Input Cost Breakdown (Rs.)", &rows, width)
}

fn render_bars(title: &str, rows: &[(&str, f64)], width: usize) -> String {
    let width = width.max(10);
    let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let max_value = rows
        .iter()
        .map(|&(_, v)| v)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    for &(label, value) in rows {
        let filled = if max_value > 0.0 && value.is_finite() {
            ((value / max_value) * width as f64).round() as usize
        } else {
            0
        };
        let filled = filled.min(width);
        out.push_str(&format!(
            "{label:<label_width$} | {}{} {}\n",
            "█".repeat(filled),
            " ".repeat(width - filled),
            fmt_money(value),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_the_largest_value() {
        let result = EstimationResult {
            input_cost: 1600.0,
            predicted_yield: 40.0,
            market_price: 2000.0,
            estimated_income: 80000.0,
            profit: 78400.0,
            used_fallback: false,
        };
        let chart = render_cost_income_bars(&result, 40);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 3);

        let income_bar = lines[2].matches('█').count();
        let cost_bar = lines[1].matches('█').count();
        assert_eq!(income_bar, 40);
        // 1600/80000 of 40 cells rounds to 1.
        assert_eq!(cost_bar, 1);
        assert!(lines[2].contains("80,000.00"));
    }

    #[test]
    fn breakdown_handles_zero_costs() {
        let crop = CropRecord {
            crop: "Wheat".to_string(),
            seed_cost_per_acre: 0.0,
            fertilizer_cost_per_acre: 0.0,
            expected_yield_per_acre: 18.0,
        };
        let chart = render_cost_breakdown_bars(&crop, 2.0, 20);
        assert!(chart.lines().count() == 3);
        assert!(!chart.contains('█'));
    }
}
