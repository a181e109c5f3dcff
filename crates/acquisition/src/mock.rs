//! Mock sensor sources
//!
//! Stand-in for the host sensor subsystem when no hardware is attached.
//! Each source runs a dedicated delivery thread, honoring the requested
//! period hint with monotonic nanosecond timestamps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use contracts::{
    RatePreset, RecorderError, SensorEvent, SensorEventCallback, SensorKind, SensorSource,
};
use tracing::debug;

/// Synthetic axis-group source
///
/// Accelerometer output sits near (0, 0, 9.81) with a slow deterministic
/// wobble; gyroscope output is a small oscillating angular rate. Enough
/// signal to exercise the pipeline end to end without hardware.
pub struct MockImuSource {
    kind: SensorKind,
    // Each delivery thread owns its session flag; a stop/start cycle gets
    // a fresh flag so a not-yet-exited old thread can never be re-armed.
    session: Mutex<Option<Arc<AtomicBool>>>,
}

impl MockImuSource {
    /// Create a mock source for one axis group
    pub fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            session: Mutex::new(None),
        }
    }

    /// Create a mock accelerometer
    pub fn accelerometer() -> Self {
        Self::new(SensorKind::Accelerometer)
    }

    /// Create a mock gyroscope
    pub fn gyroscope() -> Self {
        Self::new(SensorKind::Gyroscope)
    }

    fn values_at(kind: SensorKind, t_s: f64) -> [f64; 3] {
        match kind {
            SensorKind::Accelerometer => [
                0.05 * (2.0 * t_s).sin(),
                0.05 * (2.0 * t_s).cos(),
                9.81 + 0.02 * (0.5 * t_s).sin(),
            ],
            SensorKind::Gyroscope => [
                0.01 * (3.0 * t_s).sin(),
                0.01 * (3.0 * t_s).cos(),
                0.002,
            ],
        }
    }

    fn session_lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<AtomicBool>>> {
        match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SensorSource for MockImuSource {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn listen(
        &self,
        period: RatePreset,
        callback: SensorEventCallback,
    ) -> Result<(), RecorderError> {
        let mut session = self.session_lock();
        if session.is_some() {
            return Ok(());
        }

        let running = Arc::new(AtomicBool::new(true));
        let thread_flag = Arc::clone(&running);
        let kind = self.kind;
        let interval = Duration::from_micros(u64::from(period.period_us()));

        thread::Builder::new()
            .name(format!("mock-{kind}"))
            .spawn(move || {
                let epoch = Instant::now();
                debug!(%kind, period_us = interval.as_micros() as u64, "mock source started");

                while thread_flag.load(Ordering::Relaxed) {
                    let t_ns = epoch.elapsed().as_nanos() as i64;
                    let t_s = t_ns as f64 * 1e-9;

                    callback(SensorEvent {
                        kind,
                        t_ns,
                        values: Self::values_at(kind, t_s),
                    });

                    thread::sleep(interval);
                }

                debug!(%kind, "mock source stopped");
            })
            .map_err(|e| RecorderError::subscription(kind, e.to_string()))?;

        *session = Some(running);
        Ok(())
    }

    fn stop(&self) {
        if let Some(running) = self.session_lock().take() {
            running.store(false, Ordering::SeqCst);
        }
    }

    fn is_listening(&self) -> bool {
        self.session_lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_delivers_monotonic_events() {
        let source = MockImuSource::accelerometer();
        let events: Arc<Mutex<Vec<SensorEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        source
            .listen(
                RatePreset::Hz100,
                Arc::new(move |event| {
                    sink.lock().unwrap().push(event);
                }),
            )
            .unwrap();

        thread::sleep(Duration::from_millis(80));
        source.stop();
        thread::sleep(Duration::from_millis(30));

        let events = events.lock().unwrap();
        assert!(events.len() >= 3, "expected a few events, got {}", events.len());
        assert!(events.windows(2).all(|w| w[1].t_ns > w[0].t_ns));
        assert!(events.iter().all(|e| e.kind == SensorKind::Accelerometer));
        // Gravity dominates the z axis
        assert!(events.iter().all(|e| (e.values[2] - 9.81).abs() < 0.1));
    }

    #[test]
    fn test_listen_is_idempotent() {
        let source = MockImuSource::gyroscope();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let callback: SensorEventCallback = Arc::new(move |_| {
            flag.store(true, Ordering::Relaxed);
        });
        source.listen(RatePreset::Hz50, Arc::clone(&callback)).unwrap();
        // Second listen must not spawn a second delivery thread
        source.listen(RatePreset::Hz50, callback).unwrap();
        assert!(source.is_listening());
        source.stop();
        assert!(!source.is_listening());
    }

    #[test]
    fn test_stop_start_cycle_is_clean() {
        let source = MockImuSource::accelerometer();
        let callback: SensorEventCallback = Arc::new(|_| {});

        source.listen(RatePreset::Hz100, Arc::clone(&callback)).unwrap();
        source.stop();
        // Immediate restart gets a fresh session even if the old delivery
        // thread has not exited yet
        source.listen(RatePreset::Hz100, callback).unwrap();
        assert!(source.is_listening());
        source.stop();
    }
}
