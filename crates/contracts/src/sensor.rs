//! SensorEvent - raw per-axis-group hardware event
//!
//! What the host sensor subsystem delivers before merging.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two tracked axis groups
///
/// The merger only subscribes to these two kinds; anything else the host
/// subsystem might offer is never registered and therefore never delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Linear acceleration, m/s²
    Accelerometer,
    /// Angular velocity, rad/s
    Gyroscope,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Accelerometer => write!(f, "accelerometer"),
            SensorKind::Gyroscope => write!(f, "gyroscope"),
        }
    }
}

/// Raw three-component reading from one axis group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorEvent {
    /// Which axis group produced the event
    pub kind: SensorKind,

    /// Monotonic hardware clock timestamp (nanoseconds)
    pub t_ns: i64,

    /// The three axis values, in the axis group's native unit
    pub values: [f64; 3],
}

/// Sampling period hint passed to the host sensor subsystem
///
/// A best-effort request, not a hard guarantee; hardware delivers at its
/// own native cadence around the hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePreset {
    /// 50 Hz nominal (20000 µs period)
    Hz50,
    /// 100 Hz nominal (10000 µs period)
    #[default]
    Hz100,
}

impl RatePreset {
    /// Requested sampling period in microseconds
    pub fn period_us(self) -> u32 {
        match self {
            RatePreset::Hz50 => 20_000,
            RatePreset::Hz100 => 10_000,
        }
    }

    /// Nominal rate in Hz
    pub fn nominal_hz(self) -> f64 {
        1_000_000.0 / self.period_us() as f64
    }
}

impl fmt::Display for RatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatePreset::Hz50 => write!(f, "hz50"),
            RatePreset::Hz100 => write!(f, "hz100"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_periods() {
        assert_eq!(RatePreset::Hz50.period_us(), 20_000);
        assert_eq!(RatePreset::Hz100.period_us(), 10_000);
        assert_eq!(RatePreset::Hz50.nominal_hz(), 50.0);
        assert_eq!(RatePreset::Hz100.nominal_hz(), 100.0);
    }

    #[test]
    fn test_preset_serde_names() {
        assert_eq!(serde_json::to_string(&RatePreset::Hz50).unwrap(), "\"hz50\"");
        let parsed: RatePreset = serde_json::from_str("\"hz100\"").unwrap();
        assert_eq!(parsed, RatePreset::Hz100);
    }
}
