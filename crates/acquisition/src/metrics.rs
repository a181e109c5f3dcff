//! Acquisition counters

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::SensorKind;

/// Acquisition metrics
///
/// Shared between the merger's event handler and whoever reports stats;
/// plain relaxed atomics, updated on the event-delivery thread.
#[derive(Debug, Default)]
pub struct AcquisitionMetrics {
    /// Accelerometer events received
    pub accel_events: AtomicU64,

    /// Gyroscope events received
    pub gyro_events: AtomicU64,

    /// Merged samples emitted downstream
    pub samples_emitted: AtomicU64,
}

impl AcquisitionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one received axis-group event
    pub fn record_event(&self, kind: SensorKind) {
        match kind {
            SensorKind::Accelerometer => self.accel_events.fetch_add(1, Ordering::Relaxed),
            SensorKind::Gyroscope => self.gyro_events.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record one emitted merged sample
    pub fn record_sample(&self) {
        self.samples_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            accel_events: self.accel_events.load(Ordering::Relaxed),
            gyro_events: self.gyro_events.load(Ordering::Relaxed),
            samples_emitted: self.samples_emitted.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    /// Accelerometer events received
    pub accel_events: u64,

    /// Gyroscope events received
    pub gyro_events: u64,

    /// Merged samples emitted downstream
    pub samples_emitted: u64,
}
