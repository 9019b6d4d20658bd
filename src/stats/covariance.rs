//! # Covariance and Standard Errors
//!
//! The asymptotic covariance of the maximum-likelihood coefficients is the
//! inverse of the observed information, `-H⁻¹`, where `H` is the Hessian of
//! the log-likelihood at the solution.

use ndarray::Array2;

use crate::error::Result;
use crate::utils::linalg::invert;

/// Calculate the coefficient covariance matrix from the log-likelihood Hessian.
///
/// Returns `None` if the Hessian is not invertible.
pub fn covariance_from_hessian(hessian: &Array2<f64>) -> Result<Option<Array2<f64>>> {
    Ok(invert(hessian)?.map(|inv| -inv))
}

/// Extract standard errors from the covariance matrix.
///
/// Standard errors are the square roots of the diagonal elements, reshaped to
/// `(K-1) x p` with the `idx = (k-1)*p + j` layout. A negative or non-finite
/// variance yields NaN for that coefficient.
pub fn standard_errors_from_covariance(covar: &Array2<f64>, n_free: usize, p: usize) -> Array2<f64> {
    Array2::from_shape_fn((n_free, p), |(k, j)| {
        let idx = k * p + j;
        let variance = covar[[idx, idx]];
        if variance.is_finite() && variance >= 0.0 {
            variance.sqrt()
        } else {
            f64::NAN
        }
    })
}

/// Standard errors for a fit whose covariance is unavailable.
pub fn unavailable_standard_errors(n_free: usize, p: usize) -> Array2<f64> {
    Array2::from_elem((n_free, p), f64::NAN)
}

/// Calculate correlation matrix from covariance matrix.
///
/// The correlation matrix is calculated as:
///   correl[i,j] = covar[i,j] / sqrt(covar[i,i] * covar[j,j])
pub fn calculate_correlation(covar: &Array2<f64>) -> Array2<f64> {
    let n = covar.nrows();
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            return 1.0;
        }
        let denom = (covar[[i, i]] * covar[[j, j]]).sqrt();
        if denom > 0.0 {
            covar[[i, j]] / denom
        } else {
            0.0
        }
    })
}
