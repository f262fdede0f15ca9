//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which series a row of output belongs to.
///
/// The output of a forecast run is a flat, ordered list of rows partitioned
/// by this label: historical observations first, then (optionally) the
/// in-sample fitted curve, then the extrapolated forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesLabel {
    Historical,
    Fitted,
    Forecast,
}

impl SeriesLabel {
    /// Human-readable label for terminal output and chart legends.
    pub fn display_name(self) -> &'static str {
        match self {
            SeriesLabel::Historical => "historical",
            SeriesLabel::Fitted => "fitted",
            SeriesLabel::Forecast => "forecast",
        }
    }
}

/// One observed point of the annual series.
///
/// Years are unique within a series; every fitter sorts its own copy
/// ascending by year before doing anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// One row of forecast output, ready to plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub year: i32,
    pub value: f64,
    pub label: SeriesLabel,
}

/// Which metric column of the census CSV to forecast.
///
/// `Auto` means: prefer `entrants` if present, else `graduates`, else `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Auto,
    Entrants,
    Graduates,
    Total,
}

/// Concrete metric actually used after resolving `Metric::Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Entrants,
    Graduates,
    Total,
}

impl Metric {
    pub fn to_kind(self) -> Option<MetricKind> {
        match self {
            Metric::Auto => None,
            Metric::Entrants => Some(MetricKind::Entrants),
            Metric::Graduates => Some(MetricKind::Graduates),
            Metric::Total => Some(MetricKind::Total),
        }
    }
}

impl From<MetricKind> for Metric {
    fn from(value: MetricKind) -> Self {
        match value {
            MetricKind::Entrants => Metric::Entrants,
            MetricKind::Graduates => Metric::Graduates,
            MetricKind::Total => Metric::Total,
        }
    }
}

impl MetricKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            MetricKind::Entrants => "entrants",
            MetricKind::Graduates => "graduates",
            MetricKind::Total => "total enrollment",
        }
    }

    /// CSV column holding this metric.
    pub fn column_name(self) -> &'static str {
        match self {
            MetricKind::Entrants => "entrants",
            MetricKind::Graduates => "graduates",
            MetricKind::Total => "total",
        }
    }
}

/// Which forecaster to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ForecastKind {
    /// Autoregressive linear trend on lag/rolling-mean features.
    Trend,
    /// Polynomial curve fit over normalized years.
    Poly,
}

impl ForecastKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ForecastKind::Trend => "linear trend (autoregressive)",
            ForecastKind::Poly => "polynomial",
        }
    }
}

/// Settings for a single polynomial fit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolyConfig {
    /// Number of future years to extrapolate.
    pub horizon: usize,
    /// Degree of the fitted polynomial (0 = constant).
    pub degree: usize,
    /// Emit the in-sample fitted curve alongside historical and forecast rows.
    pub include_fit_curve: bool,
}

/// Fitted polynomial model parameters.
///
/// Coefficients are in ascending power order over the normalized year
/// `x = year - year0`. Normalization keeps high powers of the input small;
/// raw calendar years raised to e.g. the 5th power would burn most of the
/// f64 mantissa before the solve even starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyModel {
    /// Year subtracted from every input year before basis expansion.
    pub year0: i32,
    /// One coefficient per power term, `x^0 ..= x^degree`.
    pub coefficients: Vec<f64>,
}

impl PolyModel {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate the fitted curve at a calendar year.
    pub fn predict(&self, year: i32) -> f64 {
        crate::math::eval_poly(&self.coefficients, f64::from(year - self.year0))
    }

    /// Coefficients as `(power, value)` pairs for diagnostics.
    pub fn terms(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.coefficients.iter().copied().enumerate()
    }
}

/// Summary stats about the points actually used for fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub year_min: i32,
    pub year_max: i32,
    pub value_min: f64,
    pub value_max: f64,
}

impl DatasetStats {
    /// Compute stats over a series. `None` when the series is empty or
    /// contains non-finite values.
    pub fn from_points(points: &[SeriesPoint]) -> Option<Self> {
        let mut year_min = i32::MAX;
        let mut year_max = i32::MIN;
        let mut value_min = f64::INFINITY;
        let mut value_max = f64::NEG_INFINITY;

        for p in points {
            year_min = year_min.min(p.year);
            year_max = year_max.max(p.year);
            value_min = value_min.min(p.value);
            value_max = value_max.max(p.value);
        }

        if points.is_empty() || !value_min.is_finite() || !value_max.is_finite() {
            return None;
        }

        Some(Self {
            n_points: points.len(),
            year_min,
            year_max,
            value_min,
            value_max,
        })
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Local CSV with the historical series. Takes precedence over `remote`.
    pub input: Option<PathBuf>,
    /// Fetch the published census CSV instead of reading a local file.
    pub remote: bool,
    pub metric: Metric,
    /// Academic-level filter applied when the CSV carries a `level` column.
    pub level: String,

    pub kind: ForecastKind,
    pub horizon: usize,
    pub degree: usize,
    pub include_fit_curve: bool,

    /// Synthetic-series settings, used when neither `input` nor `remote` is set.
    pub sample_years: usize,
    pub sample_seed: u64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_rows: Option<PathBuf>,
    pub export_forecast: Option<PathBuf>,
}

/// A saved forecast file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    /// RFC 3339 timestamp of when the file was written.
    pub generated: String,
    pub metric: MetricKind,
    /// Where the historical series came from (path, URL, or sample note).
    pub source: String,
    pub kind: ForecastKind,
    /// Present for polynomial forecasts only.
    pub model: Option<PolyModel>,
    pub rows: Vec<ForecastRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_auto_resolves_to_none() {
        assert_eq!(Metric::Auto.to_kind(), None);
        assert_eq!(Metric::Graduates.to_kind(), Some(MetricKind::Graduates));
    }

    #[test]
    fn stats_span_years_and_values() {
        let points = vec![
            SeriesPoint { year: 2021, value: 12.0 },
            SeriesPoint { year: 2019, value: 7.0 },
            SeriesPoint { year: 2020, value: 9.5 },
        ];
        let stats = DatasetStats::from_points(&points).unwrap();
        assert_eq!(stats.n_points, 3);
        assert_eq!(stats.year_min, 2019);
        assert_eq!(stats.year_max, 2021);
        assert!((stats.value_min - 7.0).abs() < 1e-12);
        assert!((stats.value_max - 12.0).abs() < 1e-12);
    }

    #[test]
    fn stats_reject_empty_series() {
        assert!(DatasetStats::from_points(&[]).is_none());
    }

    #[test]
    fn poly_model_predicts_with_normalized_year() {
        // y = 1 + 2x over x = year - 2015.
        let model = PolyModel {
            year0: 2015,
            coefficients: vec![1.0, 2.0],
        };
        assert!((model.predict(2015) - 1.0).abs() < 1e-12);
        assert!((model.predict(2020) - 11.0).abs() < 1e-12);
        assert_eq!(model.degree(), 1);
    }
}
