//! # Acquisition
//!
//! Sensor stream acquisition and merging.
//!
//! Responsibilities:
//! - Subscribe to the two tracked axis-group sources (accelerometer, gyroscope)
//! - Merge their asynchronous event streams into unified six-axis samples
//! - Gate delivery with an atomic recording flag so `stop` cannot race an
//!   in-flight event into a late callback
//! - Expose acquisition counters for diagnostics
//!
//! ## Usage Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use acquisition::SensorStreamMerger;
//! use contracts::RatePreset;
//!
//! let merger = SensorStreamMerger::new(Some(accel_source), Some(gyro_source));
//! merger.start(RatePreset::Hz100, Arc::new(|sample| {
//!     println!("{} {:?}", sample.t_ns, sample.accel());
//! }))?;
//! // ... record ...
//! merger.stop();
//! ```

mod merger;
mod metrics;
mod mock;

// Re-exports
pub use merger::{SampleCallback, SensorStreamMerger};
pub use metrics::{AcquisitionMetrics, MetricsSnapshot};
pub use mock::MockImuSource;

pub use contracts::{ImuSample, SensorEvent, SensorKind, SensorSource};
