//! CSV ingest and normalization.
//!
//! This module is responsible for turning a published census CSV into a
//! clean per-year series that is safe to fit: one non-negative value per
//! year, sorted ascending.
//!
//! Design goals:
//! - **Strict schema** for required fields (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no fitting logic here
//!
//! The expected schema is by column *name*, never by position: `year`, one
//! or more metric columns (`entrants`, `graduates`, `total`), and an
//! optional `level` column (academic level). When `level` exists, only rows
//! matching the requested level are kept — the published tables repeat each
//! year once per academic level plus a pre-aggregated total row.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{DatasetStats, Metric, MetricKind, SeriesPoint};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized series + resolved metric + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedSeries {
    /// Clean series, sorted ascending by year, one value per year.
    pub points: Vec<SeriesPoint>,
    pub metric: MetricKind,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and normalize a CSV file into a per-year series.
pub fn load_series_csv(path: &Path, metric: Metric, level: &str) -> Result<IngestedSeries, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_series(file, metric, level)
}

/// Normalize CSV content from any reader (file, HTTP body, test string).
pub fn read_series<R: Read>(reader: R, metric: Metric, level: &str) -> Result<IngestedSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    // Resolve `--metric auto` to an actual column based on what exists.
    let metric_kind = resolve_metric(metric, &header_map)?;

    if !header_map.contains_key("year") {
        return Err(AppError::new(2, "Missing required column: `year`"));
    }
    let has_level = header_map.contains_key("level");

    let mut points: Vec<SeriesPoint> = Vec::new();
    let mut seen_years: HashSet<i32> = HashSet::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if has_level {
            match get_optional(&record, &header_map, "level") {
                Some(v) if v.eq_ignore_ascii_case(level.trim()) => {}
                Some(_) => continue, // other academic level, filtered out
                None => {
                    row_errors.push(RowError {
                        line,
                        message: "Missing `level` value.".to_string(),
                    });
                    continue;
                }
            }
        }

        match parse_row(&record, &header_map, metric_kind) {
            Ok(point) => {
                if seen_years.insert(point.year) {
                    points.push(point);
                } else {
                    row_errors.push(RowError {
                        line,
                        message: format!("Duplicate year {} after level filtering.", point.year),
                    });
                }
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if points.is_empty() {
        return Err(AppError::new(
            3,
            "No valid rows remain after filtering/validation.",
        ));
    }

    points.sort_by_key(|p| p.year);
    let rows_used = points.len();

    let stats = DatasetStats::from_points(&points).ok_or_else(|| {
        AppError::new(3, "No valid points remain after filtering/validation.")
    })?;

    Ok(IngestedSeries {
        points,
        metric: metric_kind,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿year"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_metric(metric: Metric, header_map: &HashMap<String, usize>) -> Result<MetricKind, AppError> {
    if let Some(kind) = metric.to_kind() {
        if !header_map.contains_key(kind.column_name()) {
            return Err(AppError::new(
                2,
                format!("Missing required column for `--metric`: `{}`", kind.column_name()),
            ));
        }
        return Ok(kind);
    }

    // Auto resolution: entrants > graduates > total.
    for kind in [MetricKind::Entrants, MetricKind::Graduates, MetricKind::Total] {
        if header_map.contains_key(kind.column_name()) {
            return Ok(kind);
        }
    }

    Err(AppError::new(
        2,
        "Could not resolve `--metric auto`: none of `entrants`, `graduates`, or `total` columns were found.",
    ))
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    metric: MetricKind,
) -> Result<SeriesPoint, String> {
    let year_raw = get_required(record, header_map, "year")?;
    let year = year_raw
        .parse::<i32>()
        .map_err(|_| format!("Invalid `year` value '{year_raw}'."))?;

    let column = metric.column_name();
    let value_raw = get_required(record, header_map, column)?;
    let value = value_raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid `{column}` value '{value_raw}'."))?;

    if value < 0.0 {
        return Err(format!("Negative `{column}` value {value}."));
    }

    Ok(SeriesPoint { year, value })
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

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingest(csv: &str, metric: Metric, level: &str) -> Result<IngestedSeries, AppError> {
        read_series(csv.as_bytes(), metric, level)
    }

    #[test]
    fn reads_minimal_series() {
        let csv = "year,entrants\n2020,1000\n2021,1100\n2022,1210\n";
        let out = ingest(csv, Metric::Auto, "total").unwrap();

        assert_eq!(out.metric, MetricKind::Entrants);
        assert_eq!(out.points.len(), 3);
        assert_eq!(out.points[0].year, 2020);
        assert!((out.points[2].value - 1210.0).abs() < 1e-12);
        assert!(out.row_errors.is_empty());
        assert_eq!(out.rows_read, 3);
        assert_eq!(out.rows_used, 3);
    }

    #[test]
    fn auto_metric_prefers_entrants_over_total() {
        let csv = "year,total,entrants\n2020,5000,1000\n";
        let out = ingest(csv, Metric::Auto, "total").unwrap();
        assert_eq!(out.metric, MetricKind::Entrants);
        assert!((out.points[0].value - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn explicit_metric_requires_its_column() {
        let csv = "year,entrants\n2020,1000\n";
        let err = ingest(csv, Metric::Graduates, "total").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("graduates"));
    }

    #[test]
    fn level_filter_keeps_requested_rows_only() {
        let csv = "year,level,total\n\
                   2020,total,5000\n\
                   2020,bachelor,3000\n\
                   2021,Total,5400\n\
                   2021,bachelor,3200\n";
        let out = ingest(csv, Metric::Total, "total").unwrap();

        assert_eq!(out.points.len(), 2);
        assert!((out.points[0].value - 5000.0).abs() < 1e-12);
        assert!((out.points[1].value - 5400.0).abs() < 1e-12);
        assert!(out.row_errors.is_empty());
    }

    #[test]
    fn duplicate_years_are_row_errors() {
        let csv = "year,total\n2020,5000\n2020,5100\n2021,5200\n";
        let out = ingest(csv, Metric::Total, "total").unwrap();

        assert_eq!(out.points.len(), 2);
        assert_eq!(out.row_errors.len(), 1);
        assert!(out.row_errors[0].message.contains("Duplicate year 2020"));
    }

    #[test]
    fn bad_values_are_row_errors_not_failures() {
        let csv = "year,total\n2020,5000\nnot-a-year,5100\n2022,-3\n2023,abc\n2024,6000\n";
        let out = ingest(csv, Metric::Total, "total").unwrap();

        assert_eq!(out.points.len(), 2);
        assert_eq!(out.row_errors.len(), 3);
        assert_eq!(out.rows_read, 5);
    }

    #[test]
    fn unsorted_input_comes_out_sorted() {
        let csv = "year,total\n2022,3\n2020,1\n2021,2\n";
        let out = ingest(csv, Metric::Total, "total").unwrap();
        let years: Vec<i32> = out.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
    }

    #[test]
    fn bom_header_is_tolerated() {
        let csv = "\u{feff}year,total\n2020,5000\n";
        let out = ingest(csv, Metric::Total, "total").unwrap();
        assert_eq!(out.points.len(), 1);
    }

    #[test]
    fn all_rows_filtered_is_an_error() {
        let csv = "year,level,total\n2020,bachelor,3000\n";
        let err = ingest(csv, Metric::Total, "total").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_year_column_is_an_error() {
        let csv = "ano,total\n2020,5000\n";
        let err = ingest(csv, Metric::Total, "total").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("year"));
    }
}
