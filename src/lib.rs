//! # multinom-rs
//!
//! `multinom-rs` fits multinomial (baseline-category) logistic regression
//! models by Newton-Raphson iteration.
//!
//! The library provides:
//! - A numerically stable softmax with class 0 as the reference category
//! - Analytic log-likelihood, score, and Hessian, optionally accumulated in parallel
//! - A Newton-Raphson fit that falls back to gradient ascent on singular Hessians
//! - Standard errors, Wald inference, deviance, pseudo-R², AIC, and BIC
//! - Prediction of class probabilities or labels for new data
//!
//! ## Basic Usage
//!
//! ```
//! use multinom_rs::{MultinomialRegression, PredictionType, Prediction};
//! use ndarray::array;
//!
//! let x = array![
//!     [-2.0], [-1.6], [-1.1], [0.9], [-1.4],
//!     [-0.3], [0.1], [0.5], [-0.7], [1.2],
//!     [1.5], [2.1], [-0.5], [1.3], [2.4],
//! ];
//! let y = [0, 0, 0, 0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 1, 2];
//!
//! let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
//! assert!(fit.converged());
//!
//! let labels = fit.predict_class(array![[-2.0], [2.0]].view()).unwrap();
//! assert_eq!(labels, vec![0, 2]);
//!
//! if let Prediction::Probabilities(p) = fit.predict(x.view(), PredictionType::Probabilities).unwrap() {
//!     assert_eq!(p.ncols(), 3);
//! }
//! ```

// Public modules
pub mod error;

pub mod datasets;
pub mod design;
pub mod fit;
pub mod likelihood;
pub mod model;
pub mod softmax;
pub mod stats;
pub mod utils;

// Re-exports for convenience
pub use error::{MultinomError, Result};
pub use fit::{fit_multinomial, Diagnostic, Diagnostics, FitStatus, MultinomialConfig, MultinomialRegression};
pub use model::{MultinomialFit, Prediction, PredictionType};
pub use softmax::softmax;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
