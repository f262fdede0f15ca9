//! Read/write forecast JSON files.
//!
//! Forecast JSON is the "portable" representation of a forecast run:
//! - which forecaster produced it (and the polynomial model, if any)
//! - run metadata (metric, source, generation timestamp)
//! - the full row list for re-plotting without refitting
//!
//! The schema is defined by `domain::ForecastFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::ForecastFile;
use crate::error::AppError;

/// Write a forecast JSON file.
pub fn write_forecast_json(path: &Path, forecast: &ForecastFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create forecast JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, forecast)
        .map_err(|e| AppError::new(2, format!("Failed to write forecast JSON: {e}")))?;

    Ok(())
}

/// Read a forecast JSON file.
pub fn read_forecast_json(path: &Path) -> Result<ForecastFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open forecast JSON '{}': {e}", path.display()))
    })?;
    let forecast: ForecastFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid forecast JSON: {e}")))?;
    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastKind, ForecastRow, MetricKind, PolyModel, SeriesLabel};

    #[test]
    fn forecast_file_round_trips_through_json() {
        let original = ForecastFile {
            tool: "enroll".to_string(),
            generated: "2026-01-01T00:00:00+00:00".to_string(),
            metric: MetricKind::Entrants,
            source: "synthetic sample (seed 42)".to_string(),
            kind: ForecastKind::Poly,
            model: Some(PolyModel {
                year0: 2015,
                coefficients: vec![2.0, 3.0, 0.5],
            }),
            rows: vec![
                ForecastRow {
                    year: 2015,
                    value: 2.0,
                    label: SeriesLabel::Historical,
                },
                ForecastRow {
                    year: 2016,
                    value: 5.5,
                    label: SeriesLabel::Forecast,
                },
            ],
        };

        let json = serde_json::to_string(&original).unwrap();
        let parsed: ForecastFile = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.kind, ForecastKind::Poly);
        assert_eq!(parsed.metric, MetricKind::Entrants);
        assert_eq!(parsed.rows, original.rows);
        assert_eq!(parsed.model.unwrap().coefficients, vec![2.0, 3.0, 0.5]);
    }
}
