//! Newton-Raphson fitting of multinomial logistic regression.
//!
//! The fit starts from zero coefficients and repeatedly solves
//! `H · δ = -g` for the Newton update, where `g` and `H` are the score and
//! Hessian of the log-likelihood. A numerically singular Hessian degrades the
//! step to a small gradient-ascent update instead of failing; such events are
//! collected in [`Diagnostics`]. Fitting stops once the log-likelihood changes
//! by less than the tolerance or the iteration budget runs out.

pub mod algorithm;
pub mod config;
pub mod convergence;
pub mod diagnostics;
pub mod step;

// Re-export key types
pub use algorithm::{fit_multinomial, MultinomialRegression};
pub use config::MultinomialConfig;
pub use convergence::{ConvergenceCriteria, FitStatus};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use step::{NewtonStep, StepKind};
