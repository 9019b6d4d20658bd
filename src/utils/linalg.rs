//! Dense linear-algebra operations used by the Newton iteration.
//!
//! Both operations go through an LU factorization with partial pivoting. A
//! matrix is treated as singular when its smallest pivot is negligible
//! relative to its largest one, so that near-singular Hessians are reported
//! instead of producing enormous, meaningless steps.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

use super::matrix_convert::{
    nalgebra_to_ndarray, nalgebra_vec_to_ndarray, ndarray_to_nalgebra, ndarray_vec_to_nalgebra,
};
use crate::error::{MultinomError, Result};

/// Relative pivot size below which a matrix is considered singular.
const PIVOT_TOLERANCE: f64 = 1e-13;

/// Outcome of solving a square linear system.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// The system was solved; holds the solution vector.
    Success(Array1<f64>),

    /// The matrix is numerically singular.
    Singular,
}

impl SolveOutcome {
    /// Returns true if the system could not be solved.
    pub fn is_singular(&self) -> bool {
        matches!(self, SolveOutcome::Singular)
    }
}

fn check_square(a: &Array2<f64>) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(MultinomError::DimensionMismatch(format!(
            "Expected a square matrix, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    Ok(())
}

/// Returns true if the pivots of the LU factor `u` indicate a singular matrix.
fn is_numerically_singular(u: &DMatrix<f64>) -> bool {
    let pivots: Vec<f64> = (0..u.nrows()).map(|i| u[(i, i)].abs()).collect();
    let max_pivot = pivots.iter().copied().fold(0.0_f64, f64::max);
    if !max_pivot.is_finite() || max_pivot == 0.0 {
        return true;
    }
    pivots
        .iter()
        .any(|&p| !p.is_finite() || p <= PIVOT_TOLERANCE * max_pivot)
}

/// Solves `a * x = b` for square `a`.
///
/// # Errors
///
/// * `MultinomError::DimensionMismatch` if `a` is not square or `b` has the wrong length
pub fn solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<SolveOutcome> {
    check_square(a)?;
    if b.len() != a.nrows() {
        return Err(MultinomError::DimensionMismatch(format!(
            "Right-hand side has length {}, expected {}",
            b.len(),
            a.nrows()
        )));
    }
    if a.nrows() == 0 {
        return Ok(SolveOutcome::Success(Array1::zeros(0)));
    }

    let lu = ndarray_to_nalgebra(a.view()).lu();
    if is_numerically_singular(&lu.u()) {
        return Ok(SolveOutcome::Singular);
    }

    match lu.solve(&ndarray_vec_to_nalgebra(b.view())) {
        Some(x) if x.iter().all(|v| v.is_finite()) => {
            Ok(SolveOutcome::Success(nalgebra_vec_to_ndarray(&x)))
        }
        _ => Ok(SolveOutcome::Singular),
    }
}

/// Inverts a square matrix, returning `None` if it is numerically singular.
///
/// # Errors
///
/// * `MultinomError::DimensionMismatch` if `a` is not square
pub fn invert(a: &Array2<f64>) -> Result<Option<Array2<f64>>> {
    check_square(a)?;
    if a.nrows() == 0 {
        return Ok(Some(Array2::zeros((0, 0))));
    }

    let lu = ndarray_to_nalgebra(a.view()).lu();
    if is_numerically_singular(&lu.u()) {
        return Ok(None);
    }

    Ok(lu
        .try_inverse()
        .filter(|inv| inv.iter().all(|v| v.is_finite()))
        .map(|inv| nalgebra_to_ndarray(&inv)))
}
