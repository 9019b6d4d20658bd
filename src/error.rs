use thiserror::Error;

/// Error types for the multinom-rs library.
///
/// Only conditions that make a fit meaningless are errors. Numerical
/// degeneracy during or after fitting (a singular Hessian, standard errors
/// that cannot be computed) is recorded in
/// [`Diagnostics`](crate::fit::Diagnostics) instead.
#[derive(Error, Debug)]
pub enum MultinomError {
    /// Fewer than three outcome classes were found in the labels.
    #[error("Multinomial regression requires at least 3 classes, found {classes}; use a binary model instead")]
    InvalidClassCount {
        /// Number of classes inferred as `max(label) + 1`.
        classes: usize,
    },

    /// Error indicating a mismatch in matrix dimensions.
    #[error("Matrix dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid fitting configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for multinom-rs operations.
pub type Result<T> = std::result::Result<T, MultinomError>;
