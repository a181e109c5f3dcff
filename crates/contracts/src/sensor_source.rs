//! SensorSource trait - sensor data source abstraction
//!
//! Defines a unified interface over the host sensor subsystem, decoupling
//! the stream merger from concrete sensor implementations so mock and real
//! sources are handled the same way.

use std::sync::Arc;

use crate::{RatePreset, RecorderError, SensorEvent, SensorKind};

/// Sensor event callback type
///
/// When a source produces a reading, it delivers a `SensorEvent` through
/// this callback, synchronously, on whatever thread the source chooses.
/// Uses `Arc` so one callback can be shared across both axis-group sources.
pub type SensorEventCallback = Arc<dyn Fn(SensorEvent) + Send + Sync>;

/// Sensor data source trait
///
/// Abstracts one axis group of the host sensor subsystem. The merger
/// subscribes to two of these (accelerometer + gyroscope) and fuses their
/// event streams.
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn SensorSource> = host.accelerometer();
/// source.listen(RatePreset::Hz100, Arc::new(|event| {
///     println!("{} at {}", event.kind, event.t_ns);
/// }))?;
/// // ... consume events ...
/// source.stop();
/// ```
pub trait SensorSource: Send + Sync {
    /// Which axis group this source produces
    fn kind(&self) -> SensorKind;

    /// Register a data callback at the requested sampling period
    ///
    /// The period is a best-effort hint to the underlying hardware layer.
    /// Registration itself can fail (e.g. the host subsystem refuses the
    /// subscription); the caller is responsible for unwinding any sibling
    /// subscription it already holds.
    ///
    /// If already listening, a repeated call must be idempotent and must
    /// not register a second callback.
    fn listen(&self, period: RatePreset, callback: SensorEventCallback)
        -> Result<(), RecorderError>;

    /// Stop delivering events and release the registered callback
    ///
    /// Safe to call whether or not listening.
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
