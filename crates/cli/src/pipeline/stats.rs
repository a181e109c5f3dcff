//! Recording statistics.

use std::path::PathBuf;
use std::time::Duration;

use acquisition::MetricsSnapshot as AcquisitionSnapshot;
use dispatcher::MetricsSnapshot as SinkSnapshot;
use observability::RateStatsAggregator;

/// Statistics from a recording session
#[derive(Debug, Clone, Default)]
pub struct RecordingStats {
    /// Total merged samples recorded
    pub samples_recorded: u64,

    /// Total duration of the session
    pub duration: Duration,

    /// Number of sinks that received data
    pub active_sinks: usize,

    /// Recording files opened by file-backed sinks
    pub output_files: Vec<PathBuf>,

    /// Estimated sampling rate aggregated over the session
    pub rate_stats: RateStatsAggregator,

    /// Acquisition-side counters (events in, samples out)
    pub acquisition: AcquisitionSnapshot,

    /// Final per-sink counters
    pub sink_metrics: Vec<(String, SinkSnapshot)>,
}

impl RecordingStats {
    /// Average throughput over the whole session (samples per second)
    pub fn average_rate_hz(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.samples_recorded as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Recording Statistics                      ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Samples recorded: {}", self.samples_recorded);
        println!("   ├─ Accelerometer events: {}", self.acquisition.accel_events);
        println!("   ├─ Gyroscope events: {}", self.acquisition.gyro_events);
        println!("   ├─ Average throughput: {:.2} Hz", self.average_rate_hz());
        println!("   └─ Active sinks: {}", self.active_sinks);

        let summary = self.rate_stats.summary();
        println!("\n📈 Estimated Sampling Rate");
        println!("   └─ {}", summary.rate_hz);

        if !self.sink_metrics.is_empty() {
            println!("\n📤 Sinks");
            for (i, (name, snapshot)) in self.sink_metrics.iter().enumerate() {
                let is_last = i == self.sink_metrics.len() - 1;
                let prefix = if is_last { "└─" } else { "├─" };
                println!(
                    "   {} {}: written={}, dropped={}, failures={}",
                    prefix, name, snapshot.write_count, snapshot.dropped_count,
                    snapshot.failure_count
                );
            }
        }

        if !self.output_files.is_empty() {
            println!("\n💾 Output Files");
            for (i, path) in self.output_files.iter().enumerate() {
                let is_last = i == self.output_files.len() - 1;
                let prefix = if is_last { "└─" } else { "├─" };
                println!("   {} {}", prefix, path.display());
            }
        }

        println!();
    }
}
