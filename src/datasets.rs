//! Synthetic classification data.
//!
//! Generators for seeded test and benchmark data sets. Labels are returned in
//! class-major order (all of class 0, then class 1, ...).

use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::error::{MultinomError, Result};

/// Draws `per_class` points around each center with isotropic Gaussian noise.
///
/// Class `k` is centered on `centers[k]`. All centers must have the same
/// dimension.
pub fn gaussian_clusters<R: Rng + ?Sized>(
    centers: &[Vec<f64>],
    per_class: usize,
    std_dev: f64,
    rng: &mut R,
) -> Result<(Array2<f64>, Vec<usize>)> {
    let dim = centers.first().map_or(0, Vec::len);
    if centers.iter().any(|c| c.len() != dim) {
        return Err(MultinomError::DimensionMismatch(
            "all cluster centers must have the same dimension".to_string(),
        ));
    }
    let noise = Normal::new(0.0, std_dev)
        .map_err(|e| MultinomError::InvalidInput(format!("invalid standard deviation: {}", e)))?;

    let n = centers.len() * per_class;
    let mut x = Array2::zeros((n, dim));
    let mut y = Vec::with_capacity(n);
    for (k, center) in centers.iter().enumerate() {
        for r in 0..per_class {
            let mut row = x.row_mut(k * per_class + r);
            for (j, c) in center.iter().enumerate() {
                row[j] = c + noise.sample(rng);
            }
            y.push(k);
        }
    }
    Ok((x, y))
}

/// Balanced labels with standard-normal features that carry no class signal.
pub fn null_classification<R: Rng + ?Sized>(
    per_class: usize,
    n_classes: usize,
    n_features: usize,
    rng: &mut R,
) -> (Array2<f64>, Vec<usize>) {
    let n = per_class * n_classes;
    let x = Array2::from_shape_simple_fn((n, n_features), || StandardNormal.sample(rng));
    let y = (0..n_classes)
        .flat_map(|k| std::iter::repeat(k).take(per_class))
        .collect();
    (x, y)
}
