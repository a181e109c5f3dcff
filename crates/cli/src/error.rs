//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Recording execution error
    #[error("Recording failed: {message}")]
    RecordingExecution { message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn recording_execution(message: impl Into<String>) -> Self {
        Self::RecordingExecution {
            message: message.into(),
        }
    }
}
