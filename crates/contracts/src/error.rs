//! Layered error definitions
//!
//! Categorized by source: config / sensor / sink. Capability and
//! subscription failures are ordinary recoverable values, never panics.

use thiserror::Error;

use crate::SensorKind;

/// Unified error type
#[derive(Debug, Error)]
pub enum RecorderError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sensor Errors =====
    /// One or both required sensor types absent on the device
    #[error("sensor unavailable: {kind}")]
    SensorUnavailable { kind: SensorKind },

    /// Recording already active; second start refused
    #[error("recording already active")]
    AlreadyRecording,

    /// Registration with the host sensor subsystem failed
    #[error("subscription failed for {kind}: {message}")]
    Subscription { kind: SensorKind, message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl RecorderError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create subscription failure error
    pub fn subscription(kind: SensorKind, message: impl Into<String>) -> Self {
        Self::Subscription {
            kind,
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
