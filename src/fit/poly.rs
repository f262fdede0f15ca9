//! Polynomial curve fitter.
//!
//! Fits a degree-`d` polynomial to the series by solving the normal
//! equations `β = (XᵀX)⁻¹Xᵀy` over the power basis of the normalized year
//! `x = year - min(year)`, then evaluates the curve in-sample and
//! extrapolates it past the last observed year.
//!
//! There is no regularization, model-order selection, or interval estimate
//! here: one user-chosen degree, ordinary least squares, nothing more.

use nalgebra::DVector;

use crate::domain::{ForecastRow, PolyConfig, PolyModel, SeriesLabel, SeriesPoint};
use crate::error::FitError;
use crate::math::{design_matrix, solve_normal_equations};

/// Polynomial fit output: plot-ready rows plus the fitted model.
///
/// `rows` is ordered historical → fitted (when requested) → forecast. The
/// model carries the coefficient vector for diagnostics and exports.
#[derive(Debug, Clone)]
pub struct PolyForecast {
    pub rows: Vec<ForecastRow>,
    pub model: PolyModel,
}

/// Fit a polynomial of `config.degree` and extrapolate `config.horizon` years.
///
/// The input need not be sorted; a copy is sorted by year here. Duplicate
/// years are the caller's responsibility and are not re-validated.
///
/// # Errors
/// - `InvalidConfiguration` when the series is empty.
/// - `SingularMatrix` when `XᵀX` is not invertible. This includes the
///   rank-deficient case `degree + 1 > n`, which is rejected up front rather
///   than left for the float inverse to notice.
pub fn fit_polynomial(history: &[SeriesPoint], config: &PolyConfig) -> Result<PolyForecast, FitError> {
    if history.is_empty() {
        return Err(FitError::InvalidConfiguration(
            "cannot fit a polynomial to an empty series".to_string(),
        ));
    }

    let mut sorted = history.to_vec();
    sorted.sort_by_key(|p| p.year);

    let n = sorted.len();
    let degree = config.degree;
    if degree + 1 > n {
        return Err(FitError::SingularMatrix { degree, n_points: n });
    }

    let year0 = sorted[0].year;
    let xs: Vec<f64> = sorted.iter().map(|p| f64::from(p.year - year0)).collect();
    let x = design_matrix(&xs, degree);
    let y = DVector::from_iterator(n, sorted.iter().map(|p| p.value));

    let beta = solve_normal_equations(&x, &y)
        .ok_or(FitError::SingularMatrix { degree, n_points: n })?;

    let model = PolyModel {
        year0,
        coefficients: beta.iter().copied().collect(),
    };

    let mut rows: Vec<ForecastRow> = sorted
        .iter()
        .map(|p| ForecastRow {
            year: p.year,
            value: p.value,
            label: SeriesLabel::Historical,
        })
        .collect();

    if config.include_fit_curve {
        for p in &sorted {
            rows.push(ForecastRow {
                year: p.year,
                value: model.predict(p.year),
                label: SeriesLabel::Fitted,
            });
        }
    }

    let last_year = sorted[n - 1].year;
    for i in 0..config.horizon {
        let year = last_year + 1 + i as i32;
        rows.push(ForecastRow {
            year,
            value: model.predict(year),
            label: SeriesLabel::Forecast,
        });
    }

    Ok(PolyForecast { rows, model })
}
