//! Design-matrix preparation shared by fitting and prediction.

use ndarray::{Array2, ArrayView2, CowArray, Ix2};

use crate::error::{MultinomError, Result};

/// Returns `x` with a leading column of ones.
pub fn add_intercept_column(x: ArrayView2<'_, f64>) -> Array2<f64> {
    Array2::from_shape_fn((x.nrows(), x.ncols() + 1), |(i, j)| {
        if j == 0 {
            1.0
        } else {
            x[[i, j - 1]]
        }
    })
}

/// Checks that every entry of `x` is finite and, if requested, prepends the
/// intercept column.
///
/// The caller's matrix is borrowed unless an intercept has to be added.
pub fn prepare_design(x: ArrayView2<'_, f64>, intercept: bool) -> Result<CowArray<'_, f64, Ix2>> {
    if let Some(((i, j), v)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(MultinomError::InvalidInput(format!(
            "design matrix entry ({}, {}) is {}",
            i, j, v
        )));
    }
    if intercept {
        Ok(CowArray::from(add_intercept_column(x)))
    } else {
        Ok(CowArray::from(x))
    }
}
