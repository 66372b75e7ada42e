//! Error types for progression operations.
//!
//! Every fallible library call returns [`Result`], so the binaries can decide
//! whether an error is fatal (training, startup) or request-scoped (serving).

use thiserror::Error;

/// Main error type for progression operations.
///
/// # Examples
///
/// ```
/// use progression::error::ProgressionError;
///
/// let err = ProgressionError::DimensionMismatch {
///     expected: "353x10".to_string(),
///     actual: "353x9".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum ProgressionError {
    /// Matrix/vector dimensions don't match for the operation.
    #[error("Matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// The normal equations could not be solved.
    #[error("Singular matrix detected: {context}, cannot solve")]
    SingularMatrix {
        /// Where the solve was attempted
        context: String,
    },

    /// Invalid hyperparameter value provided.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// A caller-supplied argument is not one of the accepted values.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An estimator was used before `fit`.
    #[error("{0} is not fitted; call fit() first")]
    NotFitted(&'static str),

    /// Inference ran but could not produce a usable prediction.
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid or corrupt model artifact.
    #[error("Invalid model format: {message}")]
    FormatError {
        /// Error description
        message: String,
    },

    /// Artifact written by an incompatible format version.
    #[error("Unsupported format version: found {found}, max supported {supported}")]
    UnsupportedVersion {
        /// Version found
        found: u16,
        /// Maximum supported version
        supported: u16,
    },

    /// Checksum verification failed.
    #[error("Checksum mismatch: expected 0x{expected:08X}, got 0x{actual:08X}")]
    ChecksumMismatch {
        /// Expected checksum
        expected: u32,
        /// Actual checksum
        actual: u32,
    },

    /// Generic error with string message.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for ProgressionError {
    fn from(msg: &str) -> Self {
        ProgressionError::Other(msg.to_string())
    }
}

impl From<String> for ProgressionError {
    fn from(msg: String) -> Self {
        ProgressionError::Other(msg)
    }
}

impl From<bincode::Error> for ProgressionError {
    fn from(err: bincode::Error) -> Self {
        ProgressionError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ProgressionError {
    fn from(err: serde_json::Error) -> Self {
        ProgressionError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ProgressionError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, csv::Position::line);
        ProgressionError::FormatError {
            message: format!("csv line {line}: {err}"),
        }
    }
}

impl ProgressionError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ProgressionError>;
