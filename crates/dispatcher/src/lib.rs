//! # Dispatcher
//!
//! Sample distribution module.
//!
//! Responsibilities:
//! - Consume merged `ImuSample`s from the acquisition side
//! - Fan-out to multiple sinks over isolated per-sink queues
//! - Keep slow sink I/O off the event-delivery thread
//! - Flush and close every sink on shutdown, losing nothing buffered

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{ImuSample, SampleSink};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{CsvSink, CsvSinkConfig, LogSink, CSV_HEADER};
