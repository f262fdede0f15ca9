//! Autoregressive linear trend forecaster.
//!
//! The model regresses each year's value on three engineered features:
//!
//! - `trend`: 0-based position of the observation in year order
//! - `lag1`: the previous year's value
//! - `rolling_mean2`: the mean of the two preceding years' values
//!
//! The first two chronological points have incomplete lag features and are
//! dropped, so at least four points are needed for a fit (two surviving
//! feature rows).
//!
//! Forecasting is iterative: each step feeds its own prediction back in as
//! `lag1` and into the rolling mean for the next step. Forecast errors
//! therefore compound over the horizon; that is the model's semantics, not
//! an accident, and it must not be "fixed" to use only observed values.

use nalgebra::{DMatrix, DVector};

use crate::domain::{ForecastRow, SeriesLabel, SeriesPoint};
use crate::math::solve_least_squares;

/// One engineered observation. Only rows with complete lag features exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub year: i32,
    /// 0-based position in the year-sorted series (not in the feature set).
    pub trend: f64,
    pub lag1: f64,
    pub rolling_mean2: f64,
    /// Observed value this row predicts.
    pub value: f64,
}

/// Fitted trend model.
///
/// Betas are ordered `[intercept, trend, lag1, rolling_mean2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendModel {
    pub betas: [f64; 4],
}

impl TrendModel {
    /// Fit ordinary least squares over the feature rows.
    ///
    /// With exactly two rows the system is underdetermined (four
    /// coefficients); the SVD solver's minimum-norm solution still fits the
    /// rows exactly, which is the behavior the iterative forecast relies on.
    pub fn fit(rows: &[FeatureRow]) -> Option<Self> {
        if rows.len() < 2 {
            return None;
        }

        let n = rows.len();
        let mut x = DMatrix::<f64>::zeros(n, 4);
        let mut y = DVector::<f64>::zeros(n);
        for (i, r) in rows.iter().enumerate() {
            x[(i, 0)] = 1.0;
            x[(i, 1)] = r.trend;
            x[(i, 2)] = r.lag1;
            x[(i, 3)] = r.rolling_mean2;
            y[i] = r.value;
        }

        let beta = solve_least_squares(&x, &y)?;
        Some(Self {
            betas: [beta[0], beta[1], beta[2], beta[3]],
        })
    }

    /// Predict a value from a feature vector.
    pub fn predict(&self, trend: f64, lag1: f64, rolling_mean2: f64) -> f64 {
        self.betas[0] + self.betas[1] * trend + self.betas[2] * lag1 + self.betas[3] * rolling_mean2
    }
}

/// Trend forecast output: plot-ready rows plus the fitted model for
/// diagnostics. `model` is `None` exactly when `rows` is empty.
#[derive(Debug, Clone)]
pub struct TrendForecast {
    pub rows: Vec<ForecastRow>,
    pub model: Option<TrendModel>,
}

/// Build feature rows from a year-sorted series.
///
/// The first two points are dropped: `lag1` needs one predecessor and
/// `rolling_mean2` needs two.
pub fn build_feature_rows(sorted: &[SeriesPoint]) -> Vec<FeatureRow> {
    let mut out = Vec::with_capacity(sorted.len().saturating_sub(2));
    for i in 2..sorted.len() {
        out.push(FeatureRow {
            year: sorted[i].year,
            trend: i as f64,
            lag1: sorted[i - 1].value,
            rolling_mean2: (sorted[i - 2].value + sorted[i - 1].value) / 2.0,
            value: sorted[i].value,
        });
    }
    out
}

/// Forecast `horizon` future years from the historical series.
///
/// The input need not be sorted; a copy is sorted by year here. Duplicate
/// years are the caller's responsibility and are not re-validated.
///
/// Fewer than two usable feature rows (i.e. fewer than four points) is a
/// defined degenerate input and yields an empty result rather than an error.
pub fn forecast_trend(history: &[SeriesPoint], horizon: usize) -> TrendForecast {
    let mut sorted = history.to_vec();
    sorted.sort_by_key(|p| p.year);

    let features = build_feature_rows(&sorted);
    if features.len() < 2 {
        return TrendForecast {
            rows: Vec::new(),
            model: None,
        };
    }

    let Some(model) = TrendModel::fit(&features) else {
        // A non-finite solve on real data; treated like the degenerate case
        // since the contract defines no trend-side error surface.
        return TrendForecast {
            rows: Vec::new(),
            model: None,
        };
    };

    let mut rows: Vec<ForecastRow> = sorted
        .iter()
        .map(|p| ForecastRow {
            year: p.year,
            value: p.value,
            label: SeriesLabel::Historical,
        })
        .collect();

    let n = sorted.len();
    let last_year = sorted[n - 1].year;
    let last_trend = (n - 1) as f64;
    let mut last_value = sorted[n - 1].value;
    let mut prev_value = sorted[n - 2].value;

    for i in 0..horizon {
        let trend = last_trend + 1.0 + i as f64;
        let rolling_mean2 = (last_value + prev_value) / 2.0;
        let predicted = model.predict(trend, last_value, rolling_mean2);

        rows.push(ForecastRow {
            year: last_year + 1 + i as i32,
            value: predicted,
            label: SeriesLabel::Forecast,
        });

        // Slide the window forward using the fresh prediction.
        prev_value = last_value;
        last_value = predicted;
    }

    TrendForecast {
        rows,
        model: Some(model),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pairs: &[(i32, f64)]) -> Vec<SeriesPoint> {
        pairs
            .iter()
            .map(|&(year, value)| SeriesPoint { year, value })
            .collect()
    }

    #[test]
    fn feature_rows_drop_first_two_points() {
        let history = series(&[(2015, 1000.0), (2016, 1050.0), (2017, 1100.0), (2018, 1180.0)]);
        let rows = build_feature_rows(&history);

        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].year, 2017);
        assert!((rows[0].trend - 2.0).abs() < 1e-12);
        assert!((rows[0].lag1 - 1050.0).abs() < 1e-12);
        assert!((rows[0].rolling_mean2 - 1025.0).abs() < 1e-12);
        assert!((rows[0].value - 1100.0).abs() < 1e-12);

        assert_eq!(rows[1].year, 2018);
        assert!((rows[1].trend - 3.0).abs() < 1e-12);
        assert!((rows[1].lag1 - 1100.0).abs() < 1e-12);
        assert!((rows[1].rolling_mean2 - 1075.0).abs() < 1e-12);
        assert!((rows[1].value - 1180.0).abs() < 1e-12);
    }

    #[test]
    fn short_history_yields_empty_forecast() {
        // Two points leave zero feature rows; three leave only one.
        let two = series(&[(2019, 100.0), (2020, 110.0)]);
        let forecast = forecast_trend(&two, 3);
        assert!(forecast.rows.is_empty());
        assert!(forecast.model.is_none());

        let three = series(&[(2019, 100.0), (2020, 110.0), (2021, 121.0)]);
        assert!(forecast_trend(&three, 3).rows.is_empty());
    }

    #[test]
    fn four_point_history_produces_full_output() {
        let history = series(&[(2015, 1000.0), (2016, 1050.0), (2017, 1100.0), (2018, 1180.0)]);
        let forecast = forecast_trend(&history, 2);

        let historical: Vec<&ForecastRow> = forecast
            .rows
            .iter()
            .filter(|r| r.label == SeriesLabel::Historical)
            .collect();
        let future: Vec<&ForecastRow> = forecast
            .rows
            .iter()
            .filter(|r| r.label == SeriesLabel::Forecast)
            .collect();

        // Every input pair passes through unmodified, in year order.
        assert_eq!(historical.len(), 4);
        for (row, point) in historical.iter().zip(history.iter()) {
            assert_eq!(row.year, point.year);
            assert!((row.value - point.value).abs() < 1e-12);
        }

        // Exactly `horizon` forecast rows, contiguous after the last year.
        assert_eq!(future.len(), 2);
        assert_eq!(future[0].year, 2019);
        assert_eq!(future[1].year, 2020);
        assert!(future.iter().all(|r| r.value.is_finite()));

        assert!(forecast.model.is_some());
    }

    #[test]
    fn unsorted_input_is_sorted_before_fitting() {
        let shuffled = series(&[(2017, 1100.0), (2015, 1000.0), (2018, 1180.0), (2016, 1050.0)]);
        let sorted = series(&[(2015, 1000.0), (2016, 1050.0), (2017, 1100.0), (2018, 1180.0)]);

        let a = forecast_trend(&shuffled, 2);
        let b = forecast_trend(&sorted, 2);
        assert_eq!(a.rows, b.rows);
    }

    #[test]
    fn constant_series_forecasts_the_constant() {
        // All feature rows fit exactly, and the future feature vectors stay
        // inside the fitted affine family, so feedback keeps the level flat.
        let history = series(&[(2015, 100.0), (2016, 100.0), (2017, 100.0), (2018, 100.0), (2019, 100.0)]);
        let forecast = forecast_trend(&history, 4);

        for row in forecast.rows.iter().filter(|r| r.label == SeriesLabel::Forecast) {
            assert!((row.value - 100.0).abs() < 1e-6, "year {}: {}", row.year, row.value);
        }
    }

    #[test]
    fn linear_series_extrapolates_linearly() {
        // y grows by exactly 10/year, so the consistent system is fit exactly
        // and the feedback loop extends the line.
        let history = series(&[
            (2015, 100.0),
            (2016, 110.0),
            (2017, 120.0),
            (2018, 130.0),
            (2019, 140.0),
        ]);
        let forecast = forecast_trend(&history, 3);
        let future: Vec<&ForecastRow> = forecast
            .rows
            .iter()
            .filter(|r| r.label == SeriesLabel::Forecast)
            .collect();

        assert_eq!(future.len(), 3);
        assert!((future[0].value - 150.0).abs() < 1e-6);
        assert!((future[1].value - 160.0).abs() < 1e-6);
        assert!((future[2].value - 170.0).abs() < 1e-6);
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let history = series(&[(2010, 50.0), (2011, 57.0), (2012, 61.0), (2013, 72.0), (2014, 80.0)]);
        let a = forecast_trend(&history, 5);
        let b = forecast_trend(&history, 5);
        assert_eq!(a.rows, b.rows);
    }

    #[test]
    fn zero_horizon_returns_history_only() {
        let history = series(&[(2015, 1.0), (2016, 2.0), (2017, 3.0), (2018, 4.0)]);
        let forecast = forecast_trend(&history, 0);
        assert_eq!(forecast.rows.len(), 4);
        assert!(forecast
            .rows
            .iter()
            .all(|r| r.label == SeriesLabel::Historical));
    }
}
