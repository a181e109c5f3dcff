//! SampleSink trait - dispatcher output interface
//!
//! Defines the abstract interface for sinks consuming the merged stream.

use crate::{ImuSample, RecorderError};

/// Sample output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(SampleSink: Send)]
pub trait LocalSampleSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one merged sample
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, sample: &ImuSample) -> Result<(), RecorderError>;

    /// Flush buffered output (if any), durably
    async fn flush(&mut self) -> Result<(), RecorderError>;

    /// Close sink, releasing its destination; nothing buffered may be lost
    async fn close(&mut self) -> Result<(), RecorderError>;
}
