//! Matrix conversion utilities for the multinom-rs library.
//!
//! The public API works in ndarray (Array2, Array1), while the dense
//! factorizations come from nalgebra (DMatrix, DVector). These functions move
//! data between the two representations.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

// === ndarray <-> nalgebra conversions ===

/// Convert an ndarray matrix view to a nalgebra DMatrix.
///
/// ndarray is row-major by default, nalgebra is column-major; elements are
/// copied by index so either layout of the source view works.
pub fn ndarray_to_nalgebra(arr: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(arr.nrows(), arr.ncols(), |i, j| arr[[i, j]])
}

/// Convert a nalgebra DMatrix to an ndarray Array2.
pub fn nalgebra_to_ndarray(mat: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((mat.nrows(), mat.ncols()), |(i, j)| mat[(i, j)])
}

/// Convert an ndarray vector view to a nalgebra DVector.
pub fn ndarray_vec_to_nalgebra(arr: ArrayView1<'_, f64>) -> DVector<f64> {
    DVector::from_iterator(arr.len(), arr.iter().copied())
}

/// Convert a nalgebra DVector to an ndarray Array1.
pub fn nalgebra_vec_to_ndarray(vec: &DVector<f64>) -> Array1<f64> {
    vec.iter().copied().collect()
}
