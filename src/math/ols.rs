//! Ordinary least squares solvers.
//!
//! In this project we solve two flavors of small regression problems:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! - `solve_least_squares` uses SVD. The trend model fits four coefficients
//!   and may legitimately see as few as two usable rows; an underdetermined
//!   system takes the SVD's minimum-norm solution instead of failing.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - `solve_normal_equations` computes `β = (XᵀX)⁻¹Xᵀy` by explicit inverse.
//!   Singularity is detected and reported as `None` so the caller can signal
//!   a real error instead of shipping garbage coefficients.
//!
//! Parameter dimension is tiny (≤ 10 columns for any sane polynomial degree),
//! so neither path needs to be fast.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve the normal equations `β = (XᵀX)⁻¹Xᵀy` by direct matrix inverse.
///
/// Returns `None` when `XᵀX` is not invertible (e.g. more coefficients than
/// observations, or exactly collinear basis columns) or when the solution is
/// not finite.
pub fn solve_normal_equations(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let xt = x.transpose();
    let xtx = &xt * x;
    let inverse = xtx.try_inverse()?;
    let beta = inverse * (xt * y);

    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_handles_underdetermined_system() {
        // Two rows, three unknowns: consistent, so residuals must be zero.
        let x = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0, 3.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        let fitted = &x * &beta;
        assert!((fitted[0] - 1.0).abs() < 1e-9);
        assert!((fitted[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn normal_equations_solve_simple_system() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_normal_equations(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn normal_equations_reject_singular_system() {
        // Two identical rows, two unknowns: XᵀX has exact rank 1.
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);

        assert!(solve_normal_equations(&x, &y).is_none());
    }
}
