//! RecorderBlueprint - config loader output
//!
//! Describes a complete recording session: sampling-rate preset, rate
//! estimator tuning, and output routing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::RatePreset;

/// Default logger flush threshold (lines buffered before a forced write)
pub const DEFAULT_FLUSH_THRESHOLD: usize = 300;

/// Csv sink param key: output directory
pub const PARAM_OUTPUT_DIR: &str = "output_dir";

/// Csv sink param key: flush threshold override
pub const PARAM_FLUSH_THRESHOLD: &str = "flush_threshold";

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete recording session blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Acquisition settings
    #[serde(default)]
    pub recorder: RecorderConfig,

    /// Rate estimator settings
    #[serde(default)]
    pub estimator: EstimatorConfig,

    /// Output routing configuration
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

/// Acquisition settings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Sampling-period hint passed to the sensor subsystem
    #[serde(default)]
    pub rate: RatePreset,
}

/// Rate estimator settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Sliding window capacity (inter-sample deltas), must be >= 1
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
        }
    }
}

fn default_window_size() -> usize {
    20
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Queue capacity of the sink's isolated worker queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    100
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Delimited text file output
    Csv,
    /// Log output via tracing
    Log,
}

impl RecorderBlueprint {
    /// Blueprint with a single csv sink writing under `output_dir`
    ///
    /// Used when a config file names no sinks at all: a recorder without a
    /// destination records nothing, so csv is the implied default.
    pub fn with_default_csv_sink(mut self, output_dir: impl Into<String>) -> Self {
        if self.sinks.is_empty() {
            self.sinks.push(SinkConfig {
                name: "csv".to_string(),
                sink_type: SinkType::Csv,
                queue_capacity: default_queue_capacity(),
                params: HashMap::from([(PARAM_OUTPUT_DIR.to_string(), output_dir.into())]),
            });
        }
        self
    }

    /// Iterate csv sinks only
    pub fn csv_sinks(&self) -> impl Iterator<Item = &SinkConfig> {
        self.sinks
            .iter()
            .filter(|sink| sink.sink_type == SinkType::Csv)
    }
}

impl Default for RecorderBlueprint {
    fn default() -> Self {
        Self {
            version: ConfigVersion::V1,
            recorder: RecorderConfig::default(),
            estimator: EstimatorConfig::default(),
            sinks: Vec::new(),
        }
    }
}
