//! Sliding-window sampling-rate estimation.
//!
//! A moving-average low-pass filter on instantaneous period: window size
//! trades responsiveness for smoothness.

use contracts::EstimatorConfig;
use ringbuf::{traits::*, HeapRb};
use tracing::trace;

const NANOS_PER_SEC: f64 = 1e9;

/// Streaming estimate of the effective sampling rate
///
/// Keeps a bounded FIFO of positive inter-sample deltas (nanoseconds) and
/// reports `1e9 / mean(delta)` as the current rate. Non-positive deltas
/// (duplicate or out-of-order timestamps, expected under clock jitter) are
/// rejected without corrupting the window.
pub struct SampleRateEstimator {
    /// Ring buffer of admitted deltas; oldest overwritten at capacity
    window: HeapRb<i64>,
    /// Timestamp of the previous sample, if any since the last reset
    previous_t_ns: Option<i64>,
}

impl SampleRateEstimator {
    /// Create an estimator with the given window capacity
    ///
    /// A zero capacity is clamped to 1 so the estimator always has a window.
    pub fn new(window_size: usize) -> Self {
        Self {
            window: HeapRb::new(window_size.max(1)),
            previous_t_ns: None,
        }
    }

    /// Create an estimator from blueprint configuration
    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self::new(config.window_size)
    }

    /// Window capacity
    pub fn window_size(&self) -> usize {
        self.window.capacity().get()
    }

    /// Clear the window and the remembered previous timestamp
    ///
    /// Callable at any time; the next `on_sample` call behaves like the
    /// first one after construction.
    pub fn reset(&mut self) {
        self.window.clear();
        self.previous_t_ns = None;
    }

    /// Feed one sample timestamp, returning the updated rate estimate in Hz
    ///
    /// The previous timestamp is always updated, regardless of delta sign,
    /// so a single backwards jump costs at most one rejected delta.
    pub fn on_sample(&mut self, t_ns: i64) -> f64 {
        let previous = self.previous_t_ns.replace(t_ns);

        let Some(previous) = previous else {
            // First sample after construction or reset: no delta yet
            return 0.0;
        };

        let delta_ns = t_ns - previous;
        if delta_ns <= 0 {
            trace!(delta_ns, "non-monotonic timestamp, delta rejected");
            return self.current_hz();
        }

        self.window.push_overwrite(delta_ns);
        self.current_hz()
    }

    /// Rate implied by the deltas currently in the window
    ///
    /// Returns 0.0 for an empty window. The non-positive-mean guard is
    /// defensive: only positive deltas are admitted, so the mean of a
    /// non-empty window is always positive today.
    pub fn current_hz(&self) -> f64 {
        let len = self.window.occupied_len();
        if len == 0 {
            return 0.0;
        }

        let sum: i64 = self.window.iter().sum();
        let mean_delta_ns = sum as f64 / len as f64;
        if mean_delta_ns <= 0.0 {
            return 0.0;
        }

        NANOS_PER_SEC / mean_delta_ns
    }
}

impl std::fmt::Debug for SampleRateEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleRateEstimator")
            .field("window_len", &self.window.occupied_len())
            .field("window_size", &self.window_size())
            .field("previous_t_ns", &self.previous_t_ns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_20: i64 = 20_000_000;
    const MS_10: i64 = 10_000_000;

    #[test]
    fn test_first_sample_returns_zero() {
        let mut est = SampleRateEstimator::new(20);
        assert_eq!(est.on_sample(1_000), 0.0);
    }

    #[test]
    fn test_converges_to_50hz_on_20ms_deltas() {
        let mut est = SampleRateEstimator::new(20);
        let mut hz = 0.0;
        for i in 0..30 {
            hz = est.on_sample(i * MS_20);
        }
        assert!((hz - 50.0).abs() < 1e-9, "expected 50 Hz, got {hz}");
    }

    #[test]
    fn test_duplicate_timestamp_leaves_rate_unchanged() {
        let mut est = SampleRateEstimator::new(20);
        est.on_sample(0);
        let before = est.on_sample(MS_10);
        let after = est.on_sample(MS_10); // duplicate
        assert!((before - 100.0).abs() < 1e-9);
        assert_eq!(after, before);
        assert!(after.is_finite());
    }

    #[test]
    fn test_backwards_timestamp_rejected_but_remembered() {
        let mut est = SampleRateEstimator::new(20);
        est.on_sample(0);
        est.on_sample(MS_20);
        let rejected = est.on_sample(MS_10); // backwards
        assert!((rejected - 50.0).abs() < 1e-9);

        // previous was still updated to 10ms, so the next delta is 10ms
        est.on_sample(2 * MS_10);
        // window now holds [20ms, 10ms] -> mean 15ms
        let hz = est.current_hz();
        assert!((hz - 1e9 / 15_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_window_eviction_tracks_rate_change() {
        let window = 10;
        let mut est = SampleRateEstimator::new(window);

        // Fill with 20ms deltas (50 Hz)
        let mut t = 0;
        for _ in 0..=window {
            est.on_sample(t);
            t += MS_20;
        }
        assert!((est.current_hz() - 50.0).abs() < 1e-9);

        // Switch to 10ms deltas (100 Hz); within `window` samples the old
        // deltas must all be evicted
        for _ in 0..window {
            t += MS_10;
            est.on_sample(t);
        }
        assert!((est.current_hz() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut est = SampleRateEstimator::new(20);
        est.on_sample(0);
        est.on_sample(MS_20);
        assert!(est.current_hz() > 0.0);

        est.reset();
        assert_eq!(est.current_hz(), 0.0);
        // First sample after reset returns zero again
        assert_eq!(est.on_sample(5 * MS_20), 0.0);
    }

    #[test]
    fn test_zero_window_size_clamped() {
        let est = SampleRateEstimator::new(0);
        assert_eq!(est.window_size(), 1);
    }

    #[test]
    fn test_single_entry_window_is_instantaneous_rate() {
        let mut est = SampleRateEstimator::new(1);
        est.on_sample(0);
        est.on_sample(MS_20);
        assert!((est.current_hz() - 50.0).abs() < 1e-9);
        est.on_sample(MS_20 + MS_10);
        assert!((est.current_hz() - 100.0).abs() < 1e-9);
    }
}
