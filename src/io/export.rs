//! Export forecast rows to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per output point, with the series label spelled out.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ForecastRow;
use crate::error::AppError;

/// Write forecast rows to a CSV file.
pub fn write_rows_csv(path: &Path, rows: &[ForecastRow]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "year,value,series")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        writeln!(
            file,
            "{},{:.4},{}",
            row.year,
            row.value,
            row.label.display_name()
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
