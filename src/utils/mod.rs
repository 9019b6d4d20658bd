//! Utility functions and helpers for the multinom-rs library.

pub mod linalg;
pub mod matrix_convert;
pub mod parallel;

// Re-export commonly used utilities
pub use linalg::{invert, solve, SolveOutcome};
pub use matrix_convert::{
    nalgebra_to_ndarray, nalgebra_vec_to_ndarray, ndarray_to_nalgebra, ndarray_vec_to_nalgebra,
};
pub use parallel::evaluate_parallel;
