//! SensorStreamMerger - fuses two axis-group event streams
//!
//! Emits one `ImuSample` per raw hardware event from either source: the
//! triggering source contributes its fresh vector, the other source its
//! most recently observed vector. No time alignment is attempted — the
//! merger reports "best known state so far" at each event's arrival,
//! prioritizing latency over cross-axis synchrony.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use contracts::{
    ImuSample, RatePreset, RecorderError, SensorEventCallback, SensorKind, SensorSource,
};
use tracing::{debug, warn};

use crate::metrics::AcquisitionMetrics;

/// Merged sample callback type
///
/// Invoked synchronously on the event-delivery thread, once per qualifying
/// hardware event, before the event handler returns.
pub type SampleCallback = Arc<dyn Fn(ImuSample) + Send + Sync>;

/// Last-known values for both axis groups
///
/// Zeroed on every `start`: early merged samples may pair a fresh axis
/// group with a still-zeroed other group. That cold-start approximation is
/// intentional and preserved.
#[derive(Debug, Default)]
struct AxisState {
    last_accel: [f64; 3],
    last_gyro: [f64; 3],
}

/// Merges accelerometer and gyroscope streams into six-axis samples
///
/// Single authority on whether the pipeline is active: the atomic
/// `recording` flag is the sole gate controlling whether events propagate
/// downstream, and it is swapped, not raced, by `start`/`stop`.
pub struct SensorStreamMerger {
    accelerometer: Option<Box<dyn SensorSource>>,
    gyroscope: Option<Box<dyn SensorSource>>,
    recording: Arc<AtomicBool>,
    metrics: Arc<AcquisitionMetrics>,
}

impl SensorStreamMerger {
    /// Create a merger over whatever axis-group sources the host offers
    ///
    /// An absent source marks that sensor as unavailable on this device;
    /// `start` will refuse until both are present.
    pub fn new(
        accelerometer: Option<Box<dyn SensorSource>>,
        gyroscope: Option<Box<dyn SensorSource>>,
    ) -> Self {
        Self {
            accelerometer,
            gyroscope,
            recording: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(AcquisitionMetrics::new()),
        }
    }

    /// Device has an accelerometer
    pub fn has_accelerometer(&self) -> bool {
        self.accelerometer.is_some()
    }

    /// Device has a gyroscope
    pub fn has_gyroscope(&self) -> bool {
        self.gyroscope.is_some()
    }

    /// Both required sensor types are present
    pub fn is_available(&self) -> bool {
        self.has_accelerometer() && self.has_gyroscope()
    }

    /// Recording is currently active
    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Relaxed)
    }

    /// Shared acquisition counters
    pub fn metrics(&self) -> Arc<AcquisitionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Start recording: subscribe both sources and begin emitting samples
    ///
    /// `period` is a best-effort sampling hint forwarded to both sources.
    ///
    /// # Errors
    /// - `SensorUnavailable` if either source is absent (no side effect)
    /// - `AlreadyRecording` if already started (no side effect)
    /// - `Subscription` if registration fails; a partial subscription is
    ///   unwound before returning, so no half-subscribed state is
    ///   observable
    pub fn start(&self, period: RatePreset, on_sample: SampleCallback) -> Result<(), RecorderError> {
        let accelerometer = self.accelerometer.as_deref().ok_or(
            RecorderError::SensorUnavailable {
                kind: SensorKind::Accelerometer,
            },
        )?;
        let gyroscope = self
            .gyroscope
            .as_deref()
            .ok_or(RecorderError::SensorUnavailable {
                kind: SensorKind::Gyroscope,
            })?;

        if self.recording.swap(true, Ordering::SeqCst) {
            return Err(RecorderError::AlreadyRecording);
        }

        // Fresh axis state per recording: cold-start zero vectors
        let state = Arc::new(Mutex::new(AxisState::default()));
        let recording = Arc::clone(&self.recording);
        let metrics = Arc::clone(&self.metrics);

        let callback: SensorEventCallback = Arc::new(move |event| {
            if !recording.load(Ordering::Acquire) {
                return;
            }

            metrics.record_event(event.kind);

            let sample = {
                // A poisoned lock only means a consumer panicked mid-event;
                // the axis state itself is still usable.
                let mut state = match state.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                match event.kind {
                    SensorKind::Accelerometer => state.last_accel = event.values,
                    SensorKind::Gyroscope => state.last_gyro = event.values,
                }
                ImuSample::from_axes(event.t_ns, state.last_accel, state.last_gyro)
            };

            on_sample(sample);
            metrics.record_sample();
        });

        if let Err(e) = accelerometer.listen(period, Arc::clone(&callback)) {
            warn!(error = %e, "accelerometer subscription failed");
            self.recording.store(false, Ordering::SeqCst);
            return Err(e);
        }

        if let Err(e) = gyroscope.listen(period, callback) {
            // Unwind the subscription that did succeed
            warn!(error = %e, "gyroscope subscription failed, unwinding accelerometer");
            accelerometer.stop();
            self.recording.store(false, Ordering::SeqCst);
            return Err(e);
        }

        debug!(period = %period, "sensor stream merger started");
        Ok(())
    }

    /// Stop recording: unsubscribe both sources and gate out late events
    ///
    /// Idempotent and safe concurrently with an in-flight delivery: the
    /// gate is flipped first, so no event delivered strictly after `stop`
    /// returns produces a callback. An event already past the gate may
    /// still emit one final sample; buffer state is never corrupted.
    pub fn stop(&self) {
        if self.recording.swap(false, Ordering::SeqCst) {
            if let Some(source) = self.accelerometer.as_deref() {
                source.stop();
            }
            if let Some(source) = self.gyroscope.as_deref() {
                source.stop();
            }
            debug!("sensor stream merger stopped");
        }
    }
}

impl Drop for SensorStreamMerger {
    fn drop(&mut self) {
        self.stop();
    }
}
