//! Parallel evaluation of the multinomial likelihood.
//!
//! The Hessian accumulation costs O(n·K²·p²) per iteration and dominates the
//! fit. Observations are split into contiguous blocks that are reduced with
//! Rayon; every block accumulates into its own buffers so no state is shared
//! between threads.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;

use crate::likelihood::{accumulate_block, Evaluation};

/// Smallest number of observations handed to a single task.
const MIN_BLOCK_SIZE: usize = 64;

fn block_size(n: usize) -> usize {
    let tasks = rayon::current_num_threads().max(1) * 4;
    (n / tasks).max(MIN_BLOCK_SIZE)
}

/// Computes log-likelihood, score, and Hessian in parallel.
///
/// Produces the same result as [`crate::likelihood::evaluate`] up to
/// floating-point summation order. The Hessian buffer is fully overwritten.
pub fn evaluate_parallel(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    coefficients: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    hessian: &mut Array2<f64>,
) -> Evaluation {
    let n = x.nrows();
    let dim = coefficients.nrows() * x.ncols();
    let size = block_size(n);
    let starts: Vec<usize> = (0..n).step_by(size).collect();

    let (log_likelihood, gradient, hess) = starts
        .into_par_iter()
        .map(|start| {
            let end = (start + size).min(n);
            let mut grad = Array1::zeros(dim);
            let mut hess = Array2::zeros((dim, dim));
            let ll = accumulate_block(
                x.slice(s![start..end, ..]),
                &y[start..end],
                start,
                coefficients,
                weights,
                &mut grad,
                &mut hess,
            );
            (ll, grad, hess)
        })
        .reduce(
            || (0.0, Array1::zeros(dim), Array2::zeros((dim, dim))),
            |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2),
        );

    hessian.assign(&hess);
    Evaluation {
        log_likelihood,
        gradient,
    }
}
