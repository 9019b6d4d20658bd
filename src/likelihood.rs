//! Multinomial log-likelihood, score vector, and Hessian.
//!
//! All quantities use the flattened parameter layout `idx = (k - 1) * p + j`
//! for class `k` in `1..K` and feature `j` in `0..p`. The Hessian is the
//! second derivative of the log-likelihood (negative semi-definite); for the
//! multinomial logit the observed and expected information coincide.
//!
//! None of the functions here validate their inputs: the fitting loop checks
//! shapes and label ranges before the first evaluation.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use crate::softmax::class_probabilities;

/// Floor applied to a probability before taking its logarithm.
pub const PROBABILITY_FLOOR: f64 = 1e-15;

/// Log-likelihood and score at one coefficient matrix.
///
/// The Hessian is written into a caller-owned buffer alongside it.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Log-likelihood of the observations
    pub log_likelihood: f64,

    /// Score vector, length `(K - 1) * p`
    pub gradient: Array1<f64>,
}

#[inline]
fn weight_of(weights: Option<ArrayView1<'_, f64>>, i: usize) -> f64 {
    weights.map_or(1.0, |w| w[i])
}

/// Log-likelihood of the labels under the given coefficients.
pub fn log_likelihood(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    coefficients: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
) -> f64 {
    x.outer_iter()
        .zip(y.iter())
        .enumerate()
        .map(|(i, (row, &label))| {
            let probs = class_probabilities(coefficients, row);
            weight_of(weights, i) * probs[label].max(PROBABILITY_FLOOR).ln()
        })
        .sum()
}

/// Score vector: `g[(k-1)p + j] = Σ_i w_i (1{y_i = k} - p_ik) x_ij`.
pub fn gradient(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    coefficients: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
) -> Array1<f64> {
    let p = x.ncols();
    let n_free = coefficients.nrows();
    let mut grad = Array1::zeros(n_free * p);

    for (i, (row, &label)) in x.outer_iter().zip(y.iter()).enumerate() {
        let probs = class_probabilities(coefficients, row);
        let w = weight_of(weights, i);
        for k in 1..=n_free {
            let indicator = if label == k { 1.0 } else { 0.0 };
            let residual = w * (indicator - probs[k]);
            let mut block = grad.slice_mut(s![(k - 1) * p..k * p]);
            block.scaled_add(residual, &row);
        }
    }

    grad
}

/// Adds one observation's contribution to the Hessian.
fn accumulate_hessian(out: &mut Array2<f64>, row: ArrayView1<'_, f64>, probs: &Array1<f64>, w: f64) {
    let p = row.len();
    let n_free = probs.len() - 1;
    for k1 in 1..=n_free {
        for k2 in 1..=n_free {
            let indicator = if k1 == k2 { 1.0 } else { 0.0 };
            let c = w * probs[k1] * (indicator - probs[k2]);
            if c == 0.0 {
                continue;
            }
            for j1 in 0..p {
                let cx = c * row[j1];
                let r = (k1 - 1) * p + j1;
                for j2 in 0..p {
                    out[[r, (k2 - 1) * p + j2]] -= cx * row[j2];
                }
            }
        }
    }
}

/// Writes the Hessian into `out`, overwriting any previous contents.
///
/// `out` must be square with side `(K - 1) * p`.
pub fn hessian_into(
    x: ArrayView2<'_, f64>,
    coefficients: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    out: &mut Array2<f64>,
) {
    out.fill(0.0);
    for (i, row) in x.outer_iter().enumerate() {
        let probs = class_probabilities(coefficients, row);
        accumulate_hessian(out, row, &probs, weight_of(weights, i));
    }
}

/// Allocates and returns the Hessian.
pub fn hessian(
    x: ArrayView2<'_, f64>,
    coefficients: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
) -> Array2<f64> {
    let dim = coefficients.nrows() * x.ncols();
    let mut out = Array2::zeros((dim, dim));
    hessian_into(x, coefficients, weights, &mut out);
    out
}

/// Accumulates log-likelihood, score, and Hessian over a block of rows.
///
/// `offset` is the index of the first row of `x` in the full data set, used
/// to look up weights. Sums are added to the existing contents of the
/// accumulators.
pub(crate) fn accumulate_block(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    offset: usize,
    coefficients: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    grad: &mut Array1<f64>,
    hess: &mut Array2<f64>,
) -> f64 {
    let p = x.ncols();
    let n_free = coefficients.nrows();
    let mut loglik = 0.0;

    for (local, (row, &label)) in x.outer_iter().zip(y.iter()).enumerate() {
        let probs = class_probabilities(coefficients, row);
        let w = weight_of(weights, offset + local);
        loglik += w * probs[label].max(PROBABILITY_FLOOR).ln();

        for k in 1..=n_free {
            let indicator = if label == k { 1.0 } else { 0.0 };
            let mut block = grad.slice_mut(s![(k - 1) * p..k * p]);
            block.scaled_add(w * (indicator - probs[k]), &row);
        }

        accumulate_hessian(hess, row, &probs, w);
    }

    loglik
}

/// Computes log-likelihood, score, and Hessian in a single pass.
///
/// The Hessian buffer is fully overwritten, so it can be reused across
/// iterations.
pub fn evaluate(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    coefficients: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    hessian: &mut Array2<f64>,
) -> Evaluation {
    let mut gradient = Array1::zeros(coefficients.nrows() * x.ncols());
    hessian.fill(0.0);
    let log_likelihood = accumulate_block(x, y, 0, coefficients, weights, &mut gradient, hessian);
    Evaluation {
        log_likelihood,
        gradient,
    }
}

/// Fitted class probabilities, one row per observation (n x K).
pub fn fitted_probabilities(x: ArrayView2<'_, f64>, coefficients: ArrayView2<'_, f64>) -> Array2<f64> {
    let n_classes = coefficients.nrows() + 1;
    let mut out = Array2::zeros((x.nrows(), n_classes));
    for (row, mut out_row) in x.outer_iter().zip(out.outer_iter_mut()) {
        out_row.assign(&class_probabilities(coefficients, row));
    }
    out
}

/// Log-likelihood of the intercept-only model.
///
/// Each observation is assigned its class's (weighted) empirical proportion,
/// which is the closed-form maximum-likelihood estimate of the null model.
/// Returns the log-likelihood and the class proportions.
pub fn null_log_likelihood(
    y: &[usize],
    n_classes: usize,
    weights: Option<ArrayView1<'_, f64>>,
) -> (f64, Array1<f64>) {
    let mut totals = Array1::<f64>::zeros(n_classes);
    for (i, &label) in y.iter().enumerate() {
        totals[label] += weight_of(weights, i);
    }
    let grand_total = totals.sum();
    let proportions = if grand_total > 0.0 {
        totals / grand_total
    } else {
        Array1::from_elem(n_classes, 1.0 / n_classes as f64)
    };

    let loglik = y
        .iter()
        .enumerate()
        .map(|(i, &label)| weight_of(weights, i) * proportions[label].max(PROBABILITY_FLOOR).ln())
        .sum();

    (loglik, proportions)
}
