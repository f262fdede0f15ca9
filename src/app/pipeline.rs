//! Shared forecast pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! source resolution -> forecast -> rows/model
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! The pipeline itself holds no state: configuration goes in, outputs come
//! out, and every call works on its own copy of the series.

use crate::data::{generate_sample, CensusClient};
use crate::domain::{
    DatasetStats, ForecastKind, ForecastRow, MetricKind, PolyConfig, PolyModel, RunConfig,
    SeriesPoint,
};
use crate::error::AppError;
use crate::fit::{fit_polynomial, forecast_trend, TrendModel};
use crate::io::ingest::load_series_csv;

/// A resolved historical series, independent of where it came from.
#[derive(Debug, Clone)]
pub struct SeriesData {
    pub points: Vec<SeriesPoint>,
    pub metric: MetricKind,
    pub stats: DatasetStats,
    /// Where the series came from (path, URL, or sample note).
    pub source: String,
    /// Rows dropped by ingest validation (0 for synthetic data).
    pub skipped_rows: usize,
}

/// All computed outputs of a single forecast run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: SeriesData,
    pub kind: ForecastKind,
    pub rows: Vec<ForecastRow>,
    /// Present for trend runs that had enough history.
    pub trend_model: Option<TrendModel>,
    /// Present for polynomial runs.
    pub poly_model: Option<PolyModel>,
}

/// Resolve the historical series from the configured source.
///
/// Precedence: local CSV file, then remote census CSV, then the synthetic
/// sample generator.
pub fn load_series(config: &RunConfig) -> Result<SeriesData, AppError> {
    if let Some(path) = &config.input {
        let ingest = load_series_csv(path, config.metric, &config.level)?;
        return Ok(SeriesData {
            points: ingest.points,
            metric: ingest.metric,
            stats: ingest.stats,
            source: path.display().to_string(),
            skipped_rows: ingest.row_errors.len(),
        });
    }

    if config.remote {
        let client = CensusClient::from_env();
        let source = client.url().to_string();
        let ingest = client.fetch_series(config.metric, &config.level)?;
        return Ok(SeriesData {
            points: ingest.points,
            metric: ingest.metric,
            stats: ingest.stats,
            source,
            skipped_rows: ingest.row_errors.len(),
        });
    }

    let metric = config.metric.to_kind().unwrap_or(MetricKind::Entrants);
    let sample = generate_sample(config.sample_years, config.sample_seed, metric)?;
    Ok(SeriesData {
        points: sample.points,
        metric,
        stats: sample.stats,
        source: format!("synthetic sample (seed {})", config.sample_seed),
        skipped_rows: 0,
    })
}

/// Run the configured forecaster over an already-resolved series.
///
/// A trend run over too-short history is not an error: the rows come back
/// empty (with no model) and the presentation layer says so. A polynomial
/// fit that hits a singular normal-equation matrix *is* an error, surfaced
/// with a hint to lower the degree.
pub fn run_forecast(config: &RunConfig, series: &SeriesData) -> Result<RunOutput, AppError> {
    match config.kind {
        ForecastKind::Trend => {
            let forecast = forecast_trend(&series.points, config.horizon);
            Ok(RunOutput {
                series: series.clone(),
                kind: ForecastKind::Trend,
                rows: forecast.rows,
                trend_model: forecast.model,
                poly_model: None,
            })
        }
        ForecastKind::Poly => {
            let poly_config = PolyConfig {
                horizon: config.horizon,
                degree: config.degree,
                include_fit_curve: config.include_fit_curve,
            };
            let forecast = fit_polynomial(&series.points, &poly_config)?;
            Ok(RunOutput {
                series: series.clone(),
                kind: ForecastKind::Poly,
                rows: forecast.rows,
                trend_model: None,
                poly_model: Some(forecast.model),
            })
        }
    }
}

/// Execute the full pipeline: resolve the source, then forecast.
pub fn run(config: &RunConfig) -> Result<RunOutput, AppError> {
    let series = load_series(config)?;
    run_forecast(config, &series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metric;

    fn sample_config(kind: ForecastKind) -> RunConfig {
        RunConfig {
            input: None,
            remote: false,
            metric: Metric::Auto,
            level: "total".to_string(),
            kind,
            horizon: 3,
            degree: 2,
            include_fit_curve: true,
            sample_years: 15,
            sample_seed: 42,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_rows: None,
            export_forecast: None,
        }
    }

    #[test]
    fn sample_source_runs_both_forecasters() {
        let trend = run(&sample_config(ForecastKind::Trend)).unwrap();
        assert_eq!(trend.kind, ForecastKind::Trend);
        assert!(trend.trend_model.is_some());
        assert_eq!(trend.rows.len(), 15 + 3);

        let poly = run(&sample_config(ForecastKind::Poly)).unwrap();
        assert_eq!(poly.kind, ForecastKind::Poly);
        let model = poly.poly_model.as_ref().unwrap();
        assert_eq!(model.coefficients.len(), 3);
        // historical + fitted + forecast
        assert_eq!(poly.rows.len(), 15 + 15 + 3);
    }

    #[test]
    fn excess_degree_surfaces_as_app_error() {
        let mut config = sample_config(ForecastKind::Poly);
        config.sample_years = 2;
        config.degree = 5;

        let err = run(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("singular"));
    }

    #[test]
    fn short_trend_history_yields_empty_rows_not_error() {
        let mut config = sample_config(ForecastKind::Trend);
        config.sample_years = 3;

        let run = run(&config).unwrap();
        assert!(run.rows.is_empty());
        assert!(run.trend_model.is_none());
    }
}
