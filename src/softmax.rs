//! Softmax evaluation for baseline-category logits.
//!
//! Class 0 is the reference class: its logit is fixed at exactly zero and it
//! has no coefficient row. Row `k - 1` of a coefficient matrix holds the
//! linear-predictor weights of class `k`.

use ndarray::{Array1, ArrayView1, ArrayView2};

/// Numerically stable softmax.
///
/// The maximum logit is subtracted before exponentiating, so the largest
/// term is always `exp(0) = 1` and the normalizing sum is at least one.
/// Any finite input, however large in magnitude, produces finite output.
pub fn softmax(logits: ArrayView1<'_, f64>) -> Array1<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut exps = logits.mapv(|z| (z - max).exp());
    let sum = exps.sum();
    exps.mapv_inplace(|e| e / sum);
    exps
}

/// Builds the K-length logit vector for one observation.
///
/// Index 0 is the reference class and is always exactly zero; index `k` is
/// `coefficients[k - 1] · row`.
pub fn class_logits(coefficients: ArrayView2<'_, f64>, row: ArrayView1<'_, f64>) -> Array1<f64> {
    let n_classes = coefficients.nrows() + 1;
    let mut logits = Array1::zeros(n_classes);
    for (k, beta) in coefficients.outer_iter().enumerate() {
        logits[k + 1] = beta.dot(&row);
    }
    logits
}

/// Class probabilities for one observation.
pub fn class_probabilities(
    coefficients: ArrayView2<'_, f64>,
    row: ArrayView1<'_, f64>,
) -> Array1<f64> {
    softmax(class_logits(coefficients, row).view())
}

/// Index of the largest probability; ties go to the lowest index.
pub fn argmax(probabilities: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (k, &p) in probabilities.iter().enumerate().skip(1) {
        if p > probabilities[best] {
            best = k;
        }
    }
    best
}
