//! Pipeline orchestrator - coordinates all components.
//!
//! Wires mock sensor sources into the stream merger, feeds merged samples
//! through the rate estimator, and fans them out to the configured sinks.
//! Recording ends on the duration limit, the sample limit, or shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use acquisition::{MockImuSource, SensorStreamMerger};
use anyhow::{Context, Result};
use contracts::{ImuSample, RecorderBlueprint};
use estimator::SampleRateEstimator;
use observability::{record_rate_hz, record_sample_emitted, RateStatsAggregator};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::RecordingStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The recording session blueprint
    pub blueprint: RecorderBlueprint,

    /// Maximum number of samples to record (None = unlimited)
    pub max_samples: Option<u64>,

    /// Recording duration (None = until shutdown signal)
    pub duration: Option<Duration>,

    /// Channel buffer size
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the recording session to completion
    ///
    /// `shutdown` resolves when the user requests a stop; recording is
    /// wound down gracefully in every exit path, with all sinks flushed
    /// and closed before stats are returned.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<RecordingStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Setup Dispatcher
        info!("Setting up dispatcher...");
        let (sample_tx, sample_rx) = mpsc::channel::<ImuSample>(self.config.buffer_size);

        if blueprint.sinks.is_empty() {
            warn!("No sinks configured - samples will be dropped");
        }

        let dispatcher = dispatcher::create_dispatcher(blueprint.sinks.clone(), sample_rx)
            .context("Failed to create dispatcher")?;

        let active_sinks = blueprint.sinks.len();
        let output_files = dispatcher.output_files().to_vec();
        let sink_metric_handles = dispatcher.metric_handles();
        let dispatcher_handle = dispatcher.spawn();

        info!(active_sinks, "Dispatcher started");

        // Setup Acquisition
        info!("Setting up sensor sources (mock)...");
        let merger = SensorStreamMerger::new(
            Some(Box::new(MockImuSource::accelerometer())),
            Some(Box::new(MockImuSource::gyroscope())),
        );

        // Merged samples hop from the sensor delivery threads onto the
        // async side through this channel; the callback must not block.
        let (forward_tx, mut forward_rx) = mpsc::channel::<ImuSample>(self.config.buffer_size);

        let rate = blueprint.recorder.rate;
        merger
            .start(
                rate,
                Arc::new(move |sample| {
                    record_sample_emitted();
                    if forward_tx.try_send(sample).is_err() {
                        debug!(t_ns = sample.t_ns, "Forward channel full, sample dropped");
                    }
                }),
            )
            .context("Failed to start recording")?;

        info!(%rate, "Recording started");

        // Pipeline processing task
        let estimator_config = blueprint.estimator;
        let max_samples = self.config.max_samples;

        let mut pipeline_task = tokio::spawn(async move {
            let mut estimator = SampleRateEstimator::from_config(&estimator_config);
            let mut stats = RecordingStats {
                active_sinks,
                ..Default::default()
            };
            let mut rate_stats = RateStatsAggregator::new();

            while let Some(sample) = forward_rx.recv().await {
                stats.samples_recorded += 1;

                let rate_hz = estimator.on_sample(sample.t_ns);
                record_rate_hz(rate_hz);
                rate_stats.update(rate_hz);

                if stats.samples_recorded.is_multiple_of(100) {
                    debug!(
                        samples = stats.samples_recorded,
                        rate_hz = format!("{:.2}", rate_hz),
                        "Recording progress"
                    );
                }

                if sample_tx.send(sample).await.is_err() {
                    warn!("Dispatcher channel closed");
                    break;
                }

                if let Some(max) = max_samples {
                    if stats.samples_recorded >= max {
                        info!(samples = stats.samples_recorded, "Reached sample limit");
                        break;
                    }
                }
            }

            stats.rate_stats = rate_stats;
            stats
        });

        // Wait for one of: sample limit reached, duration elapsed, shutdown
        let duration_limit = self.config.duration;
        let sleep_until_limit = async move {
            match duration_limit {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(shutdown);

        let mut stats = tokio::select! {
            result = &mut pipeline_task => {
                result.context("Pipeline task panicked")?
            }
            _ = sleep_until_limit => {
                info!("Recording duration elapsed, stopping...");
                merger.stop();
                pipeline_task.await.context("Pipeline task panicked")?
            }
            _ = &mut shutdown => {
                warn!("Shutdown requested, stopping recording...");
                merger.stop();
                pipeline_task.await.context("Pipeline task panicked")?
            }
        };

        // Stop idempotently covers the sample-limit exit path too
        merger.stop();
        stats.acquisition = merger.metrics().snapshot();

        // The pipeline task dropped its sender, so the dispatcher drains,
        // flushes and closes every sink before its handle resolves.
        info!("Waiting for sinks to flush...");
        if tokio::time::timeout(Duration::from_secs(5), dispatcher_handle)
            .await
            .is_err()
        {
            warn!("Dispatcher shutdown timed out");
        }

        stats.duration = start_time.elapsed();
        stats.output_files = output_files;
        stats.sink_metrics = sink_metric_handles
            .iter()
            .map(|(name, metrics)| (name.clone(), metrics.snapshot()))
            .collect();

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            samples = stats.samples_recorded,
            "Recording session complete"
        );

        Ok(stats)
    }
}
