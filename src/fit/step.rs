//! Step calculation for the Newton-Raphson iteration.
//!
//! The Newton step solves `H · δ = -g`. When the Hessian is numerically
//! singular the step degrades to a fixed-size gradient-ascent update
//! `δ = α · g`.

use ndarray::{Array1, Array2};

use crate::error::Result;
use crate::utils::linalg::{solve, SolveOutcome};

/// A coefficient update.
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    /// Full Newton step.
    Newton(Array1<f64>),

    /// Gradient-ascent fallback taken because the Hessian was singular.
    GradientAscent(Array1<f64>),
}

impl StepKind {
    /// The flattened update vector.
    pub fn delta(&self) -> &Array1<f64> {
        match self {
            StepKind::Newton(delta) | StepKind::GradientAscent(delta) => delta,
        }
    }

    /// Returns true if this is the gradient-ascent fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, StepKind::GradientAscent(_))
    }
}

/// Handles step calculation for the Newton-Raphson iteration.
pub struct NewtonStep;

impl NewtonStep {
    /// Computes the update for the current Hessian and score.
    ///
    /// # Arguments
    ///
    /// * `hessian` - Hessian of the log-likelihood, `(K-1)p` square
    /// * `gradient` - Score vector, length `(K-1)p`
    /// * `fallback_step` - Step size used if the Hessian is singular
    pub fn compute(
        hessian: &Array2<f64>,
        gradient: &Array1<f64>,
        fallback_step: f64,
    ) -> Result<StepKind> {
        let rhs = -gradient;
        match solve(hessian, &rhs)? {
            SolveOutcome::Success(delta) => Ok(StepKind::Newton(delta)),
            SolveOutcome::Singular => Ok(StepKind::GradientAscent(gradient * fallback_step)),
        }
    }

    /// Reshapes a flattened update into `(K-1) x p` using `idx = (k-1)*p + j`.
    pub fn reshape(delta: &Array1<f64>, n_free: usize, p: usize) -> Array2<f64> {
        Array2::from_shape_fn((n_free, p), |(k, j)| delta[k * p + j])
    }

    /// Adds a flattened update to the coefficient matrix in place.
    pub fn apply(coefficients: &mut Array2<f64>, step: &StepKind) {
        let (n_free, p) = coefficients.dim();
        let delta = Self::reshape(step.delta(), n_free, p);
        *coefficients += &delta;
    }
}
