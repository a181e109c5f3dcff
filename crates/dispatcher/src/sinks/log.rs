//! LogSink - logs sample summaries via tracing

use contracts::{ImuSample, RecorderError, SampleSink};
use tracing::{info, instrument, trace};

/// Sink that logs merged samples for debugging
pub struct LogSink {
    name: String,
    written: u64,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            written: 0,
        }
    }
}

impl SampleSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, sample),
        fields(sink = %self.name, t_ns = sample.t_ns)
    )]
    async fn write(&mut self, sample: &ImuSample) -> Result<(), RecorderError> {
        self.written += 1;
        trace!(
            sink = %self.name,
            t_ns = sample.t_ns,
            ax = sample.ax,
            ay = sample.ay,
            az = sample.az,
            gx = sample.gx,
            gy = sample.gy,
            gz = sample.gz,
            "Sample received"
        );
        // Periodic progress at info so the sink is visible without trace level
        if self.written % 100 == 0 {
            info!(sink = %self.name, samples = self.written, "LogSink progress");
        }
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), RecorderError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), RecorderError> {
        info!(sink = %self.name, samples = self.written, "LogSink closed");
        Ok(())
    }
}
