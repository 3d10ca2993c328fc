//! Error types for soft-bisim
//!
//! Distance and similarity are total functions and never return errors.
//! Errors only arise when configuring a scorer or an optimizer run.

use thiserror::Error;

/// Result type for soft-bisim operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building scorers, loading training data,
/// or configuring the optimizer
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A cost coefficient is negative, NaN, or infinite
    #[error("Invalid cost '{name}': {value} (costs must be finite and non-negative)")]
    InvalidCost { name: &'static str, value: f64 },

    /// Fitness over zero pairs is undefined
    #[error("Training set is empty")]
    EmptyTrainingSet,

    /// The requested objective needs pairs with a label that is absent
    #[error("Training set has no {0} pairs")]
    MissingLabel(&'static str),

    /// Optimizer or evaluator configuration is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A line of tabular training data could not be parsed
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// JSON training data or model could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading training data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}
