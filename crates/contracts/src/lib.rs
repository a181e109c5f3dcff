//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Uses the monotonic hardware sensor clock (nanoseconds, i64) as primary clock
//! - Timestamps are not wall-clock time and are only comparable within one recording

mod blueprint;
mod error;
mod sample;
mod sensor;
mod sensor_source;
mod sink;

pub use blueprint::*;
pub use error::*;
pub use sample::*;
pub use sensor::*;
pub use sensor_source::{SensorEventCallback, SensorSource};
pub use sink::*;
