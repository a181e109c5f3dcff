//! Dispatcher error types

use thiserror::Error;

/// Dispatcher errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink could not be created (e.g. unwritable output directory)
    #[error("failed to create sink '{sink_name}': {message}")]
    SinkCreation { sink_name: String, message: String },
}

impl DispatcherError {
    /// Create sink creation error
    pub fn sink_creation(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
