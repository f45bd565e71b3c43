//! Error types for the pipeline.

use thiserror::Error;

/// Errors returned by every fallible pipeline operation.
///
/// Out-of-vocabulary terms, zero-norm vectors and empty corpora are not errors;
/// they produce zero vectors or empty results instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Document body is missing or not text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Query target is absent from the corpus
    #[error("Not found: {0}")]
    NotFound(String),

    /// Vector count and label count differ
    #[error("Label mismatch: {vectors} vectors but {labels} labels")]
    LabelMismatch { vectors: usize, labels: usize },

    /// Training set has no samples
    #[error("Empty training set")]
    EmptyTrainingSet,

    /// Label value outside {0, 1}
    #[error("Invalid label: {0} (expected 0 or 1)")]
    InvalidLabel(usize),

    /// Option value violates its constraint
    #[error("Invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// Vector or model dimension differs from the vocabulary it is used with
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Persisted state is incompatible with this version or with its vocabulary
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// CBOR encode/decode error
    #[error("Serialization error: {0}")]
    Cbor(#[from] serde_cbor::Error),

    /// Configuration parse error
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub(crate) fn invalid_option(name: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}
