//! Debug bundle writer for inspecting the input series and fitted models.
//!
//! This is the "debug panel" side channel for coefficient diagnostics: a
//! timestamped markdown file with the exact series that was fit, the trend
//! betas, the polynomial coefficient table, and the evaluated curve over the
//! historical + forecast year range.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::SeriesData;
use crate::domain::{PolyConfig, RunConfig};
use crate::error::AppError;
use crate::fit::{fit_polynomial, forecast_trend};

pub fn write_debug_bundle(series: &SeriesData, config: &RunConfig) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("enroll_debug_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;

    writeln!(file, "# enroll debug bundle")
        .map_err(|e| AppError::new(4, format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339())
        .map_err(|e| AppError::new(4, format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- source: {}", series.source)
        .map_err(|e| AppError::new(4, format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- metric: {}", series.metric.display_name())
        .map_err(|e| AppError::new(4, format!("Failed to write debug header: {e}")))?;
    writeln!(
        file,
        "- points: n={} | years=[{}, {}]",
        series.stats.n_points, series.stats.year_min, series.stats.year_max
    )
    .map_err(|e| AppError::new(4, format!("Failed to write debug header: {e}")))?;
    writeln!(
        file,
        "- horizon: {} | degree: {} | fit_curve: {}",
        config.horizon, config.degree, config.include_fit_curve
    )
    .map_err(|e| AppError::new(4, format!("Failed to write debug header: {e}")))?;

    writeln!(file, "\n## Series")
        .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
    writeln!(file, "| year | value |")
        .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - |")
        .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
    for p in &series.points {
        writeln!(file, "| {} | {:.3} |", p.year, p.value)
            .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
    }

    writeln!(file, "\n## Trend model")
        .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
    let trend = forecast_trend(&series.points, config.horizon);
    match &trend.model {
        Some(model) => {
            writeln!(
                file,
                "betas [intercept, trend, lag1, rolling_mean2]: {}",
                fmt_vec(&model.betas)
            )
            .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
        }
        None => {
            writeln!(file, "not fitted (history too short)")
                .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
        }
    }

    writeln!(file, "\n## Polynomial model (degree {})", config.degree)
        .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
    let poly_config = PolyConfig {
        horizon: config.horizon,
        degree: config.degree,
        include_fit_curve: true,
    };
    match fit_polynomial(&series.points, &poly_config) {
        Ok(fit) => {
            writeln!(file, "| power | coefficient |")
                .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
            writeln!(file, "| - | - |")
                .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
            for (power, coefficient) in fit.model.terms() {
                writeln!(file, "| x^{power} | {coefficient:.6} |")
                    .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
            }

            writeln!(file, "\n### Curve grid")
                .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
            writeln!(file, "| year | fitted |")
                .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
            writeln!(file, "| - | - |")
                .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
            let last_year = series.stats.year_max + config.horizon as i32;
            for year in series.stats.year_min..=last_year {
                writeln!(file, "| {} | {:.3} |", year, fit.model.predict(year))
                    .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
            }
        }
        Err(err) => {
            writeln!(file, "fit failed: {err}")
                .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;
        }
    }

    Ok(path)
}

fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
