//! Newton-Raphson fitting of the multinomial logistic regression.
//!
//! The loop maximizes the log-likelihood over the `(K-1) x p` coefficient
//! matrix. Every evaluation produces the log-likelihood, score, and Hessian
//! together, so the Hessian left in the buffer when the loop stops is the one
//! at the final coefficients and is reused for the standard errors.

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::design::prepare_design;
use crate::error::{MultinomError, Result};
use crate::likelihood::{self, fitted_probabilities, null_log_likelihood, Evaluation};
use crate::model::MultinomialFit;
use crate::stats::{
    covariance_from_hessian, standard_errors_from_covariance, unavailable_standard_errors,
    FitStatistics,
};
use crate::utils::parallel::evaluate_parallel;

use super::config::MultinomialConfig;
use super::convergence::{ConvergenceCriteria, FitStatus};
use super::diagnostics::{Diagnostic, Diagnostics};
use super::step::NewtonStep;

/// The multinomial logistic regression estimator.
#[derive(Debug, Clone, Default)]
pub struct MultinomialRegression {
    /// Configuration options
    config: MultinomialConfig,
}

impl MultinomialRegression {
    /// Create a new estimator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new estimator with the given configuration.
    pub fn with_config(config: MultinomialConfig) -> Self {
        Self { config }
    }

    /// The current configuration.
    pub fn config(&self) -> &MultinomialConfig {
        &self.config
    }

    /// Set whether to prepend an intercept column.
    pub fn with_intercept(mut self, intercept: bool) -> Self {
        self.config.intercept = intercept;
        self
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the log-likelihood convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    /// Set the gradient-ascent step size used on singular Hessians.
    pub fn with_fallback_step(mut self, step: f64) -> Self {
        self.config.fallback_step = step;
        self
    }

    /// Set per-observation weights.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.config.weights = Some(weights);
        self
    }

    /// Set whether to evaluate the likelihood in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Fit the model.
    ///
    /// # Arguments
    ///
    /// * `x` - Design matrix, one row per observation, without an intercept column
    /// * `y` - Class labels in `0..K`; class 0 is the reference class
    ///
    /// # Errors
    ///
    /// * `MultinomError::InvalidClassCount` if fewer than 3 classes are present
    /// * `MultinomError::DimensionMismatch` if `x`, `y`, and the weights disagree in length
    /// * `MultinomError::InvalidInput` for empty or non-finite data
    /// * `MultinomError::InvalidConfig` for invalid settings
    ///
    /// Numerical trouble during the iteration never fails the fit; it is
    /// recorded in the returned model's diagnostics.
    pub fn fit(&self, x: ArrayView2<'_, f64>, y: &[usize]) -> Result<MultinomialFit> {
        let n_classes = self.validate(x, y)?;
        let config = &self.config;

        let design = prepare_design(x, config.intercept)?;
        let x = design.view();
        let weights = config
            .weights
            .as_ref()
            .map(|w| ArrayView1::from(w.as_slice()));

        let n_obs = x.nrows();
        let p = x.ncols();
        let n_free = n_classes - 1;
        let dim = n_free * p;

        let mut coefficients = Array2::<f64>::zeros((n_free, p));
        let mut hessian = Array2::<f64>::zeros((dim, dim));
        let mut diagnostics = Diagnostics::new();
        let criteria = ConvergenceCriteria::new(config.tol, config.max_iterations);

        let mut current = self.evaluate(x, y, coefficients.view(), weights, &mut hessian);
        let mut trace = vec![current.log_likelihood];
        let mut iterations = 0;

        let status = loop {
            iterations += 1;

            let step = NewtonStep::compute(&hessian, &current.gradient, config.fallback_step)?;
            if step.is_fallback() {
                diagnostics.record(Diagnostic::SingularHessian {
                    iteration: iterations,
                });
            }
            NewtonStep::apply(&mut coefficients, &step);

            let previous = current.log_likelihood;
            current = self.evaluate(x, y, coefficients.view(), weights, &mut hessian);
            if !current.log_likelihood.is_finite() {
                diagnostics.record(Diagnostic::NonFiniteLogLikelihood {
                    iteration: iterations,
                });
            }
            trace.push(current.log_likelihood);

            log::debug!(
                "iteration {}: log-likelihood {:.10e}, change {:.3e}",
                iterations,
                current.log_likelihood,
                current.log_likelihood - previous
            );

            if let Some(status) = criteria.check(previous, current.log_likelihood, iterations) {
                break status;
            }
        };

        log::info!(
            "multinomial fit finished after {} iterations: {}",
            iterations,
            status.description()
        );

        // The buffer holds the Hessian at the final coefficients.
        let covariance = covariance_from_hessian(&hessian)?;
        let standard_errors = match &covariance {
            Some(covar) => standard_errors_from_covariance(covar, n_free, p),
            None => {
                diagnostics.record(Diagnostic::StandardErrorsUnavailable);
                unavailable_standard_errors(n_free, p)
            }
        };

        let (null_ll, _) = null_log_likelihood(y, n_classes, weights);
        let lr_df = n_free * (p - usize::from(config.intercept));
        let statistics = FitStatistics::compute(current.log_likelihood, null_ll, n_obs, dim, lr_df);
        let fitted = fitted_probabilities(x, coefficients.view());

        Ok(MultinomialFit {
            coefficients,
            standard_errors,
            covariance,
            fitted_probabilities: fitted,
            statistics,
            iterations,
            status,
            log_likelihood_trace: trace,
            diagnostics,
            n_obs,
            n_features: p,
            n_classes,
            intercept: config.intercept,
        })
    }

    fn evaluate(
        &self,
        x: ArrayView2<'_, f64>,
        y: &[usize],
        coefficients: ArrayView2<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
        hessian: &mut Array2<f64>,
    ) -> Evaluation {
        if self.config.parallel {
            evaluate_parallel(x, y, coefficients, weights, hessian)
        } else {
            likelihood::evaluate(x, y, coefficients, weights, hessian)
        }
    }

    /// Checks inputs and returns the number of classes.
    fn validate(&self, x: ArrayView2<'_, f64>, y: &[usize]) -> Result<usize> {
        self.config.validate()?;

        if y.is_empty() {
            return Err(MultinomError::InvalidInput(
                "at least one observation is required".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(MultinomError::DimensionMismatch(format!(
                "design matrix has {} rows but {} labels were given",
                x.nrows(),
                y.len()
            )));
        }
        if let Some(weights) = &self.config.weights {
            if weights.len() != y.len() {
                return Err(MultinomError::DimensionMismatch(format!(
                    "{} weights given for {} observations",
                    weights.len(),
                    y.len()
                )));
            }
        }

        let n_classes = match y.iter().copied().max() {
            Some(max_label) => max_label.checked_add(1).ok_or_else(|| {
                MultinomError::InvalidInput(format!("class label {} is too large", max_label))
            })?,
            None => 0,
        };
        if n_classes < 3 {
            return Err(MultinomError::InvalidClassCount { classes: n_classes });
        }
        if !self.config.intercept && x.ncols() == 0 {
            return Err(MultinomError::InvalidInput(
                "design matrix has no columns and no intercept".to_string(),
            ));
        }

        // The (K-1)p square Hessian must be addressable before it is allocated.
        let p = x.ncols() + usize::from(self.config.intercept);
        let hessian_bytes = (n_classes - 1)
            .checked_mul(p)
            .and_then(|dim| dim.checked_mul(dim))
            .and_then(|len| len.checked_mul(std::mem::size_of::<f64>()))
            .filter(|&bytes| bytes <= isize::MAX as usize);
        if hessian_bytes.is_none() {
            return Err(MultinomError::InvalidInput(format!(
                "{} classes with {} design columns exceed the addressable Hessian size",
                n_classes, p
            )));
        }
        Ok(n_classes)
    }
}

/// Fits a multinomial logistic regression with the given configuration.
///
/// Equivalent to `MultinomialRegression::with_config(config.clone()).fit(x, y)`.
pub fn fit_multinomial(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    config: &MultinomialConfig,
) -> Result<MultinomialFit> {
    MultinomialRegression::with_config(config.clone()).fit(x, y)
}
