//! # Post-Fit Statistics
//!
//! Goodness-of-fit measures and coefficient uncertainty for a fitted
//! multinomial model:
//!
//! - Standard errors and covariance from the inverse observed information
//! - Deviance and the null deviance of the intercept-only model
//! - McFadden's pseudo-R², AIC, and BIC
//! - Likelihood-ratio statistic against the null model
//! - Wald z-statistics, p-values, and confidence intervals

mod covariance;
mod inference;

pub use covariance::{
    calculate_correlation, covariance_from_hessian, standard_errors_from_covariance,
    unavailable_standard_errors,
};
pub use inference::{critical_value, p_values, wald_intervals, z_statistics};

use serde::{Deserialize, Serialize};

/// Deviance-based fit statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitStatistics {
    /// Log-likelihood at the fitted coefficients
    pub log_likelihood: f64,
    /// `-2 * log_likelihood`
    pub deviance: f64,
    /// Log-likelihood of the intercept-only model
    pub null_log_likelihood: f64,
    /// `-2 * null_log_likelihood`
    pub null_deviance: f64,
    /// McFadden's pseudo-R², `1 - deviance / null_deviance`
    pub pseudo_r_squared: f64,
    /// Akaike information criterion
    pub aic: f64,
    /// Bayesian information criterion
    pub bic: f64,
    /// Number of free parameters, `(K-1) * p`
    pub n_params: usize,
    /// Likelihood-ratio statistic, `null_deviance - deviance`
    pub lr_statistic: f64,
    /// Degrees of freedom of the likelihood-ratio statistic
    pub lr_df: usize,
}

impl FitStatistics {
    /// Derives all statistics from the two log-likelihoods.
    ///
    /// # Arguments
    ///
    /// * `log_likelihood` - Log-likelihood of the fitted model
    /// * `null_log_likelihood` - Log-likelihood of the intercept-only model
    /// * `n_obs` - Number of observations
    /// * `n_params` - Number of free parameters
    /// * `lr_df` - Parameters fixed at zero to obtain the null model
    pub fn compute(
        log_likelihood: f64,
        null_log_likelihood: f64,
        n_obs: usize,
        n_params: usize,
        lr_df: usize,
    ) -> Self {
        let deviance = -2.0 * log_likelihood;
        let null_deviance = -2.0 * null_log_likelihood;
        let pseudo_r_squared = if null_deviance > 0.0 {
            1.0 - deviance / null_deviance
        } else {
            0.0
        };
        let k = n_params as f64;

        Self {
            log_likelihood,
            deviance,
            null_log_likelihood,
            null_deviance,
            pseudo_r_squared,
            aic: deviance + 2.0 * k,
            bic: deviance + (n_obs as f64).ln() * k,
            n_params,
            lr_statistic: null_deviance - deviance,
            lr_df,
        }
    }
}
