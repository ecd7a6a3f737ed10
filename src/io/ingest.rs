//! CSV ingest for the two reference tables.
//!
//! This module turns the crop economics and mandi price CSVs into an
//! immutable `ReferenceData` that is safe to estimate against.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden coercions)
//! - **Separation of concerns**: no estimation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{CropRecord, MarketPriceRecord, ReferenceData};
use crate::error::AppError;
use crate::io::paths::DataPaths;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the loaded tables plus per-table row diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedReference {
    pub reference: ReferenceData,
    pub crop_errors: Vec<RowError>,
    pub price_errors: Vec<RowError>,
    pub crop_rows_read: usize,
    pub price_rows_read: usize,
}

/// Load both reference tables from the data directory.
pub fn load_reference_data(paths: &DataPaths) -> Result<IngestedReference, AppError> {
    let crop_path = paths.crop_table();
    let price_path = paths.price_table();

    let crop_file = open_table(&crop_path)?;
    let (crops, crop_errors, crop_rows_read) = read_crop_table(crop_file)?;
    if crops.is_empty() {
        return Err(AppError::data(format!(
            "No valid rows in crop table '{}'.",
            crop_path.display()
        )));
    }

    let price_file = open_table(&price_path)?;
    let (prices, price_errors, price_rows_read) = read_price_table(price_file)?;
    if prices.is_empty() {
        return Err(AppError::data(format!(
            "No valid rows in price table '{}'.",
            price_path.display()
        )));
    }

    Ok(IngestedReference {
        reference: ReferenceData::new(crops, prices),
        crop_errors,
        price_errors,
        crop_rows_read,
        price_rows_read,
    })
}

fn open_table(path: &Path) -> Result<File, AppError> {
    File::open(path)
        .map_err(|e| AppError::data(format!("Failed to open '{}': {e}", path.display())))
}

/// Read the crop economics table.
///
/// Schema: `Crop, Seed_Cost_per_Acre, Fertilizer_Cost, Expected_Yield_per_Acre`.
/// Crop names are a unique key: duplicate rows after the first are reported
/// and skipped.
pub fn read_crop_table<R: Read>(input: R) -> Result<(Vec<CropRecord>, Vec<RowError>, usize), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let header_map = build_header_map(&mut reader)?;
    for col in ["crop", "seed_cost_per_acre", "fertilizer_cost", "expected_yield_per_acre"] {
        if !header_map.contains_key(col) {
            return Err(AppError::data(format!(
                "Crop table is missing required column: `{col}`"
            )));
        }
    }

    let mut crops: Vec<CropRecord> = Vec::new();
    let mut errors = Vec::new();
    let mut rows_read = 0usize;

    for_each_record(&mut reader, &mut errors, &mut rows_read, |_line, record| {
        let row = parse_crop_row(record, &header_map)?;
        if crops.iter().any(|c| c.crop == row.crop) {
            return Err(format!("Duplicate crop `{}`; first row wins.", row.crop));
        }
        crops.push(row);
        Ok(())
    });

    Ok((crops, errors, rows_read))
}

/// Read the mandi price table.
///
/// Schema: `Crop, Location, Market_Price`. Multiple rows per crop (one per
/// location) are expected.
pub fn read_price_table<R: Read>(
    input: R,
) -> Result<(Vec<MarketPriceRecord>, Vec<RowError>, usize), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let header_map = build_header_map(&mut reader)?;
    for col in ["crop", "location", "market_price"] {
        if !header_map.contains_key(col) {
            return Err(AppError::data(format!(
                "Price table is missing required column: `{col}`"
            )));
        }
    }

    let mut prices = Vec::new();
    let mut errors = Vec::new();
    let mut rows_read = 0usize;

    for_each_record(&mut reader, &mut errors, &mut rows_read, |_line, record| {
        prices.push(parse_price_row(record, &header_map)?);
        Ok(())
    });

    Ok((prices, errors, rows_read))
}

/// One historical observation used for model fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub area_acres: f64,
    pub seed_type: String,
    pub yield_per_acre: f64,
}

/// Read the training dataset.
///
/// Schema: `Area, Seed_Type, Yield_per_Acre`; extra columns are ignored.
pub fn read_training_rows<R: Read>(
    input: R,
) -> Result<(Vec<TrainingRow>, Vec<RowError>, usize), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let header_map = build_header_map(&mut reader)?;
    for col in ["area", "seed_type", "yield_per_acre"] {
        if !header_map.contains_key(col) {
            return Err(AppError::data(format!(
                "Training data is missing required column: `{col}`"
            )));
        }
    }

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut rows_read = 0usize;

    for_each_record(&mut reader, &mut errors, &mut rows_read, |_line, record| {
        let area_acres = parse_positive(get_required(record, &header_map, "area")?, "Area")?;
        let seed_type = get_required(record, &header_map, "seed_type")?.to_string();
        let yield_per_acre =
            parse_positive(get_required(record, &header_map, "yield_per_acre")?, "Yield_per_Acre")?;
        rows.push(TrainingRow {
            area_acres,
            seed_type,
            yield_per_acre,
        });
        Ok(())
    });

    Ok((rows, errors, rows_read))
}

/// Drive row iteration with shared line-numbering and error collection.
fn for_each_record<R: Read>(
    reader: &mut csv::Reader<R>,
    errors: &mut Vec<RowError>,
    rows_read: &mut usize,
    mut on_row: impl FnMut(usize, &StringRecord) -> Result<(), String>,
) {
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        *rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if let Err(message) = on_row(line, &record) {
            errors.push(RowError { line, message });
        }
    }
}

fn parse_crop_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<CropRecord, String> {
    let crop = get_required(record, header_map, "crop")?.to_string();
    let seed_cost_per_acre = parse_money(get_required(record, header_map, "seed_cost_per_acre")?, "Seed_Cost_per_Acre")?;
    let fertilizer_cost_per_acre = parse_money(get_required(record, header_map, "fertilizer_cost")?, "Fertilizer_Cost")?;
    let expected_yield_per_acre =
        parse_positive(get_required(record, header_map, "expected_yield_per_acre")?, "Expected_Yield_per_Acre")?;

    Ok(CropRecord {
        crop,
        seed_cost_per_acre,
        fertilizer_cost_per_acre,
        expected_yield_per_acre,
    })
}

fn parse_price_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<MarketPriceRecord, String> {
    let crop = get_required(record, header_map, "crop")?.to_string();
    let location = get_required(record, header_map, "location")?.to_string();
    let market_price = parse_positive(get_required(record, header_map, "market_price")?, "Market_Price")?;

    Ok(MarketPriceRecord {
        crop,
        location,
        market_price,
    })
}

fn build_header_map<R: Read>(reader: &mut csv::Reader<R>) -> Result<HashMap<String, usize>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::data(format!("Failed to read CSV headers: {e}")))?;
    Ok(headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect())
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿Crop"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_money(s: &str, name: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}'."))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("Invalid `{name}` (must be finite and >= 0)."));
    }
    Ok(v)
}

fn parse_positive(s: &str, name: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}'."))?;
    if !v.is_finite() || v <= 0.0 {
        return Err(format!("Invalid `{name}` (must be finite and > 0)."));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROP_CSV: &str = "\
Crop,Seed_Cost_per_Acre,Fertilizer_Cost,Expected_Yield_per_Acre
Wheat,500,300,18
Rice,700,400,22
";

    const PRICE_CSV: &str = "\
Crop,Location,Market_Price
Wheat,Nashik,2000
Wheat,Indore,1800
Rice,Nashik,2400
";

    #[test]
    fn crop_table_parses_clean_file() {
        let (crops, errors, rows_read) = read_crop_table(CROP_CSV.as_bytes()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(rows_read, 2);
        assert_eq!(crops.len(), 2);
        assert_eq!(crops[0].crop, "Wheat");
        assert!((crops[0].seed_cost_per_acre - 500.0).abs() < 1e-12);
        assert!((crops[0].fertilizer_cost_per_acre - 300.0).abs() < 1e-12);
        assert!((crops[0].expected_yield_per_acre - 18.0).abs() < 1e-12);
    }

    #[test]
    fn crop_table_reports_duplicates_and_keeps_first() {
        let csv = "\
Crop,Seed_Cost_per_Acre,Fertilizer_Cost,Expected_Yield_per_Acre
Wheat,500,300,18
Wheat,999,999,99
";
        let (crops, errors, _) = read_crop_table(csv.as_bytes()).unwrap();
        assert_eq!(crops.len(), 1);
        assert!((crops[0].seed_cost_per_acre - 500.0).abs() < 1e-12);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 3);
        assert!(errors[0].message.contains("Duplicate crop"));
    }

    #[test]
    fn crop_table_skips_bad_rows_but_keeps_good_ones() {
        let csv = "\
Crop,Seed_Cost_per_Acre,Fertilizer_Cost,Expected_Yield_per_Acre
Wheat,500,300,18
Rice,not-a-number,400,22
Maize,600,-5,20
";
        let (crops, errors, rows_read) = read_crop_table(csv.as_bytes()).unwrap();
        assert_eq!(rows_read, 3);
        assert_eq!(crops.len(), 1);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn crop_table_rejects_missing_columns() {
        let csv = "Crop,Seed_Cost_per_Acre\nWheat,500\n";
        let err = read_crop_table(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("fertilizer_cost"));
    }

    #[test]
    fn price_table_parses_clean_file() {
        let (prices, errors, _) = read_price_table(PRICE_CSV.as_bytes()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(prices.len(), 3);
        assert_eq!(prices[1].location, "Indore");
        assert!((prices[1].market_price - 1800.0).abs() < 1e-12);
    }

    #[test]
    fn price_table_rejects_non_positive_prices() {
        let csv = "Crop,Location,Market_Price\nWheat,Nashik,0\n";
        let (prices, errors, _) = read_price_table(csv.as_bytes()).unwrap();
        assert!(prices.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn training_rows_parse_and_ignore_extra_columns() {
        let csv = "\
Crop,Area,Seed_Type,Yield_per_Acre,Notes
Wheat,2.0,Hybrid,21.5,good season
Wheat,1.5,Local,17.0,
Rice,3.0,Organic,19.2,flooded
";
        let (rows, errors, rows_read) = read_training_rows(csv.as_bytes()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(rows_read, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].seed_type, "Local");
        assert!((rows[2].yield_per_acre - 19.2).abs() < 1e-12);
    }

    #[test]
    fn training_rows_reject_non_positive_area() {
        let csv = "Area,Seed_Type,Yield_per_Acre\n0,Hybrid,20\n2.0,Hybrid,20\n";
        let (rows, errors, _) = read_training_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
    }

    #[test]
    fn header_match_is_case_insensitive_and_bom_tolerant() {
        let csv = "\u{feff}CROP,location,MARKET_price\nWheat,Nashik,2000\n";
        let (prices, errors, _) = read_price_table(csv.as_bytes()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(prices.len(), 1);
    }
}
