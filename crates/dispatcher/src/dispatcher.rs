//! Dispatcher - main loop for fan-out to sinks

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use contracts::{ImuSample, SinkConfig, SinkType};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{CsvSink, LogSink};

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Sink configurations
    pub sinks: Vec<SinkConfig>,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    input_rx: mpsc::Receiver<ImuSample>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(config: DispatcherConfig, input_rx: mpsc::Receiver<ImuSample>) -> Self {
        Self { config, input_rx }
    }

    /// Build and start the dispatcher
    #[instrument(name = "dispatcher_builder_build", skip(self))]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let mut handles = Vec::with_capacity(self.config.sinks.len());
        let mut output_files = Vec::new();

        for sink_config in &self.config.sinks {
            let (handle, path) = create_sink_handle(sink_config)?;
            handles.push(handle);
            output_files.extend(path);
        }

        Ok(Dispatcher {
            handles,
            input_rx: self.input_rx,
            output_files,
        })
    }
}

/// Create a SinkHandle from configuration
///
/// For file-backed sinks the opened recording path is returned alongside
/// the handle, so callers can report where data landed.
#[instrument(
    name = "dispatcher_create_sink_handle",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink_handle(
    config: &SinkConfig,
) -> Result<(SinkHandle, Option<PathBuf>), DispatcherError> {
    match config.sink_type {
        SinkType::Log => {
            let sink = LogSink::new(&config.name);
            Ok((SinkHandle::spawn(sink, config.queue_capacity), None))
        }
        SinkType::Csv => {
            let sink = CsvSink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            let path = sink.current_path().map(PathBuf::from);
            Ok((SinkHandle::spawn(sink, config.queue_capacity), path))
        }
    }
}

/// The main Dispatcher that fans out samples to sinks
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
    input_rx: mpsc::Receiver<ImuSample>,
    output_files: Vec<PathBuf>,
}

impl Dispatcher {
    /// Create a dispatcher with custom sink handles (for testing)
    pub fn with_handles(handles: Vec<SinkHandle>, input_rx: mpsc::Receiver<ImuSample>) -> Self {
        Self {
            handles,
            input_rx,
            output_files: Vec::new(),
        }
    }

    /// Recording files opened by file-backed sinks
    pub fn output_files(&self) -> &[PathBuf] {
        &self.output_files
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Shared metric handles, usable after the dispatcher is consumed
    pub fn metric_handles(&self) -> Vec<(String, std::sync::Arc<crate::metrics::SinkMetrics>)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), std::sync::Arc::clone(h.metrics())))
            .collect()
    }

    /// Run the dispatcher main loop
    ///
    /// Consumes samples from input and fans out to all sinks.
    /// Returns when the input channel is closed, after every sink has
    /// been flushed and closed.
    #[instrument(name = "dispatcher_run", skip(self))]
    pub async fn run(mut self) {
        info!(sinks = self.handles.len(), "Dispatcher started");

        let mut sample_count: u64 = 0;

        while let Some(sample) = self.input_rx.recv().await {
            sample_count += 1;
            self.dispatch_sample(sample);

            if sample_count.is_multiple_of(500) {
                debug!(samples = sample_count, "Dispatcher progress");
            }
        }

        info!(
            samples = sample_count,
            "Dispatcher input closed, shutting down"
        );

        Self::shutdown_handles(self.handles).await;

        info!("Dispatcher shutdown complete");
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    fn dispatch_sample(&self, sample: ImuSample) {
        // Samples are Copy, so fan-out is just a fixed-size memcpy per sink
        for handle in &self.handles {
            handle.try_send(sample);
        }
    }

    async fn shutdown_handles(handles: Vec<SinkHandle>) {
        for handle in handles {
            handle.shutdown().await;
        }
    }
}

/// Convenience function to create a dispatcher from sink configs
#[instrument(name = "dispatcher_create", skip(sink_configs, input_rx))]
pub fn create_dispatcher(
    sink_configs: Vec<SinkConfig>,
    input_rx: mpsc::Receiver<ImuSample>,
) -> Result<Dispatcher, DispatcherError> {
    let config = DispatcherConfig {
        sinks: sink_configs,
    };
    DispatcherBuilder::new(config, input_rx).build()
}
