//! Error type shared by the whole crate.

use thiserror::Error;

/// Everything that can go wrong between loading data and reporting accuracy.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Flat parameter vector does not match `n_hidden*(n_input+1) + n_class*(n_hidden+1)`.
    #[error("parameter vector has length {actual}, expected {expected}")]
    ParameterLength { expected: usize, actual: usize },

    /// A class label outside `[1, n_class]`.
    #[error("label {label} at row {index} is outside [1, {n_class}]")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        n_class: usize,
    },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
