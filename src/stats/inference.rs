//! Wald inference for fitted coefficients.
//!
//! z-statistics, two-sided p-values, and confidence intervals all use the
//! standard normal approximation to the sampling distribution of the
//! maximum-likelihood estimates.

use ndarray::{Array2, Zip};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{MultinomError, Result};

fn standard_normal() -> Option<Normal> {
    Normal::new(0.0, 1.0).ok()
}

/// Two-sided standard normal critical value for a confidence level in `(0, 1)`.
///
/// # Errors
///
/// * `MultinomError::InvalidInput` if `level` is outside `(0, 1)`
pub fn critical_value(level: f64) -> Result<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(MultinomError::InvalidInput(format!(
            "confidence level must be in (0, 1), got {}",
            level
        )));
    }
    Ok(standard_normal().map_or(f64::NAN, |n| n.inverse_cdf(0.5 + level / 2.0)))
}

/// Wald z-statistics, `coef / se`. NaN wherever the standard error is NaN.
pub fn z_statistics(coefficients: &Array2<f64>, standard_errors: &Array2<f64>) -> Array2<f64> {
    Zip::from(coefficients)
        .and(standard_errors)
        .map_collect(|&b, &se| b / se)
}

/// Two-sided p-values for z-statistics.
///
/// Uses the normal survival function directly so that tail probabilities far
/// below machine epsilon are not lost to `1 - cdf` cancellation.
pub fn p_values(z: &Array2<f64>) -> Array2<f64> {
    let normal = standard_normal();
    z.mapv(|z| match &normal {
        Some(n) if !z.is_nan() => 2.0 * n.sf(z.abs()),
        _ => f64::NAN,
    })
}

/// Wald confidence intervals at the given level, e.g. 0.95.
///
/// Returns `(lower, upper)` matrices with the shape of the coefficients.
pub fn wald_intervals(
    coefficients: &Array2<f64>,
    standard_errors: &Array2<f64>,
    level: f64,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let z = critical_value(level)?;
    let lower = Zip::from(coefficients)
        .and(standard_errors)
        .map_collect(|&b, &se| b - z * se);
    let upper = Zip::from(coefficients)
        .and(standard_errors)
        .map_collect(|&b, &se| b + z * se);
    Ok((lower, upper))
}
