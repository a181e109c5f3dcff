//! ImuSample - merger output
//!
//! One fused six-axis reading with a single timestamp.

use serde::{Deserialize, Serialize};

/// Fused six-axis inertial sample
///
/// Produced exactly once per qualifying sensor event by the stream merger:
/// the triggering axis group carries the fresh hardware values, the other
/// axis group carries its most recently observed values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    /// Event timestamp from the monotonic hardware clock (nanoseconds)
    pub t_ns: i64,

    /// Linear acceleration X (m/s², not gravity-compensated)
    pub ax: f64,

    /// Linear acceleration Y (m/s²)
    pub ay: f64,

    /// Linear acceleration Z (m/s²)
    pub az: f64,

    /// Angular velocity X (rad/s)
    pub gx: f64,

    /// Angular velocity Y (rad/s)
    pub gy: f64,

    /// Angular velocity Z (rad/s)
    pub gz: f64,
}

impl ImuSample {
    /// Build a sample from the two axis-group vectors
    pub fn from_axes(t_ns: i64, accel: [f64; 3], gyro: [f64; 3]) -> Self {
        Self {
            t_ns,
            ax: accel[0],
            ay: accel[1],
            az: accel[2],
            gx: gyro[0],
            gy: gyro[1],
            gz: gyro[2],
        }
    }

    /// Accelerometer axis group as a vector
    pub fn accel(&self) -> [f64; 3] {
        [self.ax, self.ay, self.az]
    }

    /// Gyroscope axis group as a vector
    pub fn gyro(&self) -> [f64; 3] {
        [self.gx, self.gy, self.gz]
    }
}
