//! Configuration options for the multinomial Newton-Raphson fit.

use serde::{Deserialize, Serialize};

use crate::error::{MultinomError, Result};

/// Configuration options for fitting a multinomial logistic regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultinomialConfig {
    /// Whether to prepend a constant column for the intercept. Default: true
    pub intercept: bool,

    /// Maximum number of Newton iterations. Default: 100
    pub max_iterations: usize,

    /// Tolerance for the absolute change in log-likelihood. Default: 1e-6
    pub tol: f64,

    /// Step size of the gradient-ascent update used when the Hessian is singular. Default: 0.01
    pub fallback_step: f64,

    /// Non-negative observation weights, one per row. Default: None (all ones)
    pub weights: Option<Vec<f64>>,

    /// Whether to accumulate the likelihood, score, and Hessian in parallel. Default: false
    pub parallel: bool,
}

impl Default for MultinomialConfig {
    fn default() -> Self {
        Self {
            intercept: true,
            max_iterations: 100,
            tol: 1e-6,
            fallback_step: 0.01,
            weights: None,
            parallel: false,
        }
    }
}

impl MultinomialConfig {
    /// Checks the numeric settings.
    ///
    /// Weight length is checked against the data at fit time.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(MultinomError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(MultinomError::InvalidConfig(format!(
                "tol must be positive and finite, got {}",
                self.tol
            )));
        }
        if !(self.fallback_step.is_finite() && self.fallback_step > 0.0) {
            return Err(MultinomError::InvalidConfig(format!(
                "fallback_step must be positive and finite, got {}",
                self.fallback_step
            )));
        }
        if let Some(weights) = &self.weights {
            if let Some((i, w)) = weights
                .iter()
                .enumerate()
                .find(|(_, w)| !(w.is_finite() && **w >= 0.0))
            {
                return Err(MultinomError::InvalidConfig(format!(
                    "weight {} is {}, weights must be finite and non-negative",
                    i, w
                )));
            }
        }
        Ok(())
    }
}
