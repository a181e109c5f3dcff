//! Built-in sink implementations

pub mod csv;
pub mod log;

pub use csv::{CsvSink, CsvSinkConfig, CSV_HEADER};
pub use log::LogSink;
