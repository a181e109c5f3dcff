//! # Estimator
//!
//! Streaming sampling-rate estimation.
//!
//! Responsibilities:
//! - Convert a stream of (ideally) increasing timestamps into inter-sample deltas
//! - Maintain a bounded sliding window of deltas
//! - Report a smoothed rate estimate in Hz
//!
//! ## Usage Example
//!
//! ```
//! use estimator::SampleRateEstimator;
//!
//! let mut estimator = SampleRateEstimator::new(20);
//! assert_eq!(estimator.on_sample(0), 0.0);
//! let hz = estimator.on_sample(20_000_000); // 20ms later
//! assert!((hz - 50.0).abs() < 1e-9);
//! ```

mod rate;

pub use rate::SampleRateEstimator;

// Re-export contracts types
pub use contracts::EstimatorConfig;
