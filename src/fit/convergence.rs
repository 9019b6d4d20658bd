//! Termination states of the Newton-Raphson fit.

use serde::{Deserialize, Serialize};

/// How the fitting loop terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitStatus {
    /// The change in log-likelihood fell below the tolerance.
    Converged,

    /// The iteration budget ran out before the tolerance was met.
    MaxIterationsReached,
}

impl FitStatus {
    /// Returns true if the fit converged.
    pub fn is_converged(&self) -> bool {
        matches!(self, FitStatus::Converged)
    }

    /// Returns a description of the status.
    pub fn description(&self) -> &'static str {
        match self {
            FitStatus::Converged => "Converged: small log-likelihood change",
            FitStatus::MaxIterationsReached => "Terminated: maximum iterations reached",
        }
    }
}

/// Log-likelihood convergence test.
#[derive(Debug, Clone)]
pub struct ConvergenceCriteria {
    /// Tolerance for the absolute change in log-likelihood.
    pub tol: f64,

    /// Maximum number of iterations.
    pub max_iterations: usize,
}

impl ConvergenceCriteria {
    /// Creates a new set of convergence criteria.
    pub fn new(tol: f64, max_iterations: usize) -> Self {
        Self {
            tol,
            max_iterations,
        }
    }

    /// Decides whether to stop after `iteration` (1-based) completed iterations.
    ///
    /// Returns `None` while the loop should continue. A non-finite change never
    /// counts as convergence.
    pub fn check(&self, previous: f64, current: f64, iteration: usize) -> Option<FitStatus> {
        let change = (current - previous).abs();
        if change.is_finite() && change < self.tol {
            return Some(FitStatus::Converged);
        }
        if iteration >= self.max_iterations {
            return Some(FitStatus::MaxIterationsReached);
        }
        None
    }
}
