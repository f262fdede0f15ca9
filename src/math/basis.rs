//! Power-basis (Vandermonde-style) expansion for polynomial fitting.
//!
//! The design matrix has one row per observation and columns
//! `[x^0, x^1, ..., x^degree]` over the normalized input `x`.
//!
//! Numerical notes:
//! - Callers normalize years to `x = year - year0` before expansion. Raw
//!   calendar years (~2e3) raised to even modest powers would dwarf the
//!   low-order columns and wreck the conditioning of `XᵀX`.
//! - Evaluation uses Horner's scheme rather than summing `c_k * x^k` terms.

use nalgebra::DMatrix;

/// Fill one design row `[x^0 ..= x^degree]`.
///
/// The constant term comes first (intercept).
///
/// # Panics
/// Panics if `out` does not have length `degree + 1`. Callers should size the
/// buffer correctly.
pub fn power_basis_row(x: f64, degree: usize, out: &mut [f64]) {
    let mut p = 1.0;
    for j in 0..=degree {
        out[j] = p;
        p *= x;
    }
}

/// Build the full design matrix for the given normalized inputs.
pub fn design_matrix(xs: &[f64], degree: usize) -> DMatrix<f64> {
    let mut m = DMatrix::<f64>::zeros(xs.len(), degree + 1);
    let mut row = vec![0.0; degree + 1];

    for (i, &x) in xs.iter().enumerate() {
        power_basis_row(x, degree, &mut row);
        for (j, &v) in row.iter().enumerate() {
            m[(i, j)] = v;
        }
    }

    m
}

/// Evaluate a polynomial at `x`. Coefficients are in ascending power order.
pub fn eval_poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_row_is_successive_powers() {
        let mut row = vec![0.0; 4];
        power_basis_row(2.0, 3, &mut row);
        assert_eq!(row, vec![1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn design_matrix_has_intercept_column() {
        let m = design_matrix(&[0.0, 1.0, 3.0], 2);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 3);
        for i in 0..3 {
            assert_eq!(m[(i, 0)], 1.0);
        }
        assert_eq!(m[(2, 1)], 3.0);
        assert_eq!(m[(2, 2)], 9.0);
    }

    #[test]
    fn horner_matches_term_sum() {
        let coeffs = [2.0, -1.5, 0.25, 3.0];
        for &x in &[-2.0f64, 0.0, 0.5, 1.0, 4.0] {
            let expected: f64 = coeffs
                .iter()
                .enumerate()
                .map(|(k, &c)| c * x.powi(k as i32))
                .sum();
            assert!((eval_poly(&coeffs, x) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn degree_zero_is_constant() {
        assert_eq!(eval_poly(&[7.5], 1234.0), 7.5);
    }
}
