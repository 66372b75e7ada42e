//! Error types for progression-cli

use progression::ProgressionError;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Bad command-line value (unknown model kind, bad address)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Model artifacts could not be loaded at server startup
    #[error("Startup failed: {0}")]
    StartupFailure(String),

    /// Fitting or evaluation failed
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP server could not bind or stopped with an error
    #[error("Server error: {0}")]
    ServerError(String),
}

impl CliError {
    /// Get exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidArgument(_) => ExitCode::from(2),
            Self::StartupFailure(_) => ExitCode::from(3),
            Self::TrainingFailed(_) => ExitCode::from(4),
            Self::ServerError(_) => ExitCode::from(5),
            Self::Io(_) => ExitCode::from(7),
        }
    }
}

impl From<ProgressionError> for CliError {
    fn from(e: ProgressionError) -> Self {
        match e {
            ProgressionError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            ProgressionError::Io(e) => Self::Io(e),
            other => Self::TrainingFailed(other.to_string()),
        }
    }
}
