//! Ordinary least squares.
//!
//! Used by the linear-trend decomposition, which regresses a series on an
//! intercept and a time index:
//!
//! ```text
//! minimize Σ (y_t - β0 - β1 t)^2
//! ```
//!
//! Implementation choices:
//! - SVD rather than QR, because `nalgebra`'s `QR::solve` expects square systems
//!   and our design matrix is tall (N × 2).
//! - Progressive tolerances so a nearly flat time index still solves.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y_t = β0 + β1 t` for `t = 0..N-1` and return the fitted values.
pub fn fit_linear_trend(y: &[f64]) -> Option<Vec<f64>> {
    let n = y.len();
    if n < 2 {
        return None;
    }
    let x = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { row as f64 });
    let yv = DVector::from_column_slice(y);
    let beta = solve_least_squares(&x, &yv)?;
    Some((x * beta).iter().copied().collect())
}
