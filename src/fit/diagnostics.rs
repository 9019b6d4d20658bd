//! Recoverable numerical events recorded during a fit.
//!
//! None of these abort fitting. Each event is also emitted through the `log`
//! facade at warn level when it is recorded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recoverable numerical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// The Hessian could not be solved; a gradient-ascent step was taken instead.
    SingularHessian {
        /// 1-based iteration in which the fallback happened
        iteration: usize,
    },

    /// The log-likelihood became non-finite after an update.
    NonFiniteLogLikelihood {
        /// 1-based iteration in which it happened
        iteration: usize,
    },

    /// The final Hessian is not invertible; standard errors are NaN.
    StandardErrorsUnavailable,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SingularHessian { iteration } => write!(
                f,
                "singular Hessian at iteration {}, took a gradient-ascent step",
                iteration
            ),
            Diagnostic::NonFiniteLogLikelihood { iteration } => {
                write!(f, "non-finite log-likelihood at iteration {}", iteration)
            }
            Diagnostic::StandardErrorsUnavailable => {
                write!(f, "final Hessian is not invertible, standard errors unavailable")
            }
        }
    }
}

/// Ordered log of diagnostics for one fit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event and logs it.
    pub fn record(&mut self, event: Diagnostic) {
        log::warn!("multinomial fit: {}", event);
        self.events.push(event);
    }

    /// All recorded events in order.
    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of gradient-ascent fallbacks taken.
    pub fn singular_hessian_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Diagnostic::SingularHessian { .. }))
            .count()
    }

    /// Returns true if standard errors could not be computed.
    pub fn standard_errors_unavailable(&self) -> bool {
        self.events.contains(&Diagnostic::StandardErrorsUnavailable)
    }
}
