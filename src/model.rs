//! Fitted multinomial models and prediction.
//!
//! A [`MultinomialFit`] is produced by
//! [`MultinomialRegression::fit`](crate::fit::MultinomialRegression::fit) and
//! is immutable afterwards. It predicts class probabilities or arg-max labels
//! for new rows, reports Wald inference for its coefficients, and can be
//! persisted as JSON.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::design::prepare_design;
use crate::error::{MultinomError, Result};
use crate::fit::{Diagnostics, FitStatus};
use crate::likelihood::fitted_probabilities;
use crate::softmax::argmax;
use crate::stats::{calculate_correlation, p_values, wald_intervals, z_statistics, FitStatistics};

/// What [`MultinomialFit::predict`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionType {
    /// Arg-max class label per row.
    #[default]
    Class,

    /// Full class-probability vector per row.
    Probabilities,
}

impl FromStr for PredictionType {
    type Err = MultinomError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "class" | "response" => Ok(PredictionType::Class),
            "probs" | "proba" | "probabilities" => Ok(PredictionType::Probabilities),
            other => Err(MultinomError::InvalidInput(format!(
                "unknown prediction type '{}'",
                other
            ))),
        }
    }
}

/// Predictions for a batch of rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Class labels, one per row
    Classes(Vec<usize>),

    /// Probabilities, n x K
    Probabilities(Array2<f64>),
}

/// Serializes matrices that may contain NaN, which JSON cannot represent.
mod nan_matrix {
    use ndarray::Array2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Repr {
        rows: usize,
        cols: usize,
        data: Vec<Option<f64>>,
    }

    pub fn serialize<S: Serializer>(m: &Array2<f64>, s: S) -> Result<S::Ok, S::Error> {
        Repr {
            rows: m.nrows(),
            cols: m.ncols(),
            data: m.iter().map(|v| if v.is_nan() { None } else { Some(*v) }).collect(),
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Array2<f64>, D::Error> {
        let repr = Repr::deserialize(d)?;
        let data = repr
            .data
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        Array2::from_shape_vec((repr.rows, repr.cols), data).map_err(serde::de::Error::custom)
    }
}

/// A fitted multinomial logistic regression.
///
/// Class 0 is the reference class. Row `k - 1` of `coefficients` holds the
/// weights of class `k`; column 0 is the intercept when `intercept` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialFit {
    /// Coefficients, `(K-1) x p`
    pub coefficients: Array2<f64>,

    /// Standard errors, `(K-1) x p`; NaN where unavailable
    #[serde(with = "nan_matrix")]
    pub standard_errors: Array2<f64>,

    /// Covariance of the flattened coefficients, if the Hessian was invertible
    pub covariance: Option<Array2<f64>>,

    /// Fitted probabilities for the training rows, `n x K`
    pub fitted_probabilities: Array2<f64>,

    /// Deviance-based fit statistics
    pub statistics: FitStatistics,

    /// Number of Newton iterations performed
    pub iterations: usize,

    /// How the fitting loop terminated
    pub status: FitStatus,

    /// Log-likelihood before the first iteration and after each one
    pub log_likelihood_trace: Vec<f64>,

    /// Recoverable numerical events
    pub diagnostics: Diagnostics,

    /// Number of observations
    pub n_obs: usize,

    /// Number of design columns, including the intercept
    pub n_features: usize,

    /// Number of outcome classes
    pub n_classes: usize,

    /// Whether an intercept column was prepended
    pub intercept: bool,
}

impl MultinomialFit {
    /// Returns true if the fit converged.
    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }

    /// Log-likelihood at the fitted coefficients.
    pub fn log_likelihood(&self) -> f64 {
        self.statistics.log_likelihood
    }

    /// Residual deviance.
    pub fn deviance(&self) -> f64 {
        self.statistics.deviance
    }

    /// Deviance of the intercept-only model.
    pub fn null_deviance(&self) -> f64 {
        self.statistics.null_deviance
    }

    /// McFadden's pseudo-R².
    pub fn pseudo_r_squared(&self) -> f64 {
        self.statistics.pseudo_r_squared
    }

    /// Akaike information criterion.
    pub fn aic(&self) -> f64 {
        self.statistics.aic
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> f64 {
        self.statistics.bic
    }

    /// Wald z-statistics for every coefficient.
    pub fn z_statistics(&self) -> Array2<f64> {
        z_statistics(&self.coefficients, &self.standard_errors)
    }

    /// Two-sided p-values for every coefficient.
    pub fn p_values(&self) -> Array2<f64> {
        p_values(&self.z_statistics())
    }

    /// Wald confidence intervals at `level`, as `(lower, upper)`.
    pub fn confidence_intervals(&self, level: f64) -> Result<(Array2<f64>, Array2<f64>)> {
        wald_intervals(&self.coefficients, &self.standard_errors, level)
    }

    /// Correlation matrix of the flattened coefficients, if the covariance exists.
    pub fn correlation(&self) -> Option<Array2<f64>> {
        self.covariance.as_ref().map(calculate_correlation)
    }

    /// Predicts labels or probabilities for new rows.
    ///
    /// `x` must have the same columns as the training data, without the
    /// intercept column; it is added here exactly as at fit time.
    pub fn predict(&self, x: ArrayView2<'_, f64>, kind: PredictionType) -> Result<Prediction> {
        Ok(match kind {
            PredictionType::Probabilities => Prediction::Probabilities(self.predict_proba(x)?),
            PredictionType::Class => Prediction::Classes(self.predict_class(x)?),
        })
    }

    /// Class probabilities for new rows, `n x K`.
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let expected = self.n_features - usize::from(self.intercept);
        if x.ncols() != expected {
            return Err(MultinomError::DimensionMismatch(format!(
                "Expected {} feature columns, got {}",
                expected,
                x.ncols()
            )));
        }
        let design = prepare_design(x, self.intercept)?;
        Ok(fitted_probabilities(design.view(), self.coefficients.view()))
    }

    /// Arg-max class labels for new rows; ties go to the lowest class index.
    pub fn predict_class(&self, x: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        let probs = self.predict_proba(x)?;
        Ok(probs.outer_iter().map(|row| argmax(row)).collect())
    }

    /// Serializes the model to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores a model from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the model as JSON to `path`.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reads a model saved with [`save_json`](Self::save_json).
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn feature_name(&self, j: usize) -> String {
        match (self.intercept, j) {
            (true, 0) => "(Intercept)".to_string(),
            (true, j) => format!("x{}", j),
            (false, j) => format!("x{}", j + 1),
        }
    }
}

impl fmt::Display for MultinomialFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Multinomial Logistic Regression (reference class 0):")?;
        writeln!(f, "  Status: {}", self.status.description())?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(
            f,
            "  Observations: {}  Classes: {}  Parameters: {}",
            self.n_obs, self.n_classes, self.statistics.n_params
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "  {:>6} {:>12} {:>12} {:>12} {:>9} {:>9}",
            "class", "term", "estimate", "std.error", "z", "p"
        )?;

        let z = self.z_statistics();
        let p = self.p_values();
        for ((k, j), beta) in self.coefficients.indexed_iter() {
            writeln!(
                f,
                "  {:>6} {:>12} {:>12.6} {:>12.6} {:>9.3} {:>9.4}",
                k + 1,
                self.feature_name(j),
                beta,
                self.standard_errors[[k, j]],
                z[[k, j]],
                p[[k, j]]
            )?;
        }

        writeln!(f)?;
        writeln!(f, "  Log-likelihood: {:.6}", self.statistics.log_likelihood)?;
        writeln!(f, "  Residual deviance: {:.6}", self.statistics.deviance)?;
        writeln!(f, "  Null deviance: {:.6}", self.statistics.null_deviance)?;
        writeln!(f, "  Pseudo R-squared: {:.6}", self.statistics.pseudo_r_squared)?;
        writeln!(
            f,
            "  LR chi-squared: {:.6} on {} df",
            self.statistics.lr_statistic, self.statistics.lr_df
        )?;
        writeln!(f, "  AIC: {:.6}  BIC: {:.6}", self.statistics.aic, self.statistics.bic)?;
        for event in self.diagnostics.events() {
            writeln!(f, "  Warning: {}", event)?;
        }
        Ok(())
    }
}
