//! CsvSink - batched CSV persistence for merged samples
//!
//! Lines are formatted into an in-memory batch and written to disk once
//! the batch reaches the flush threshold, keeping per-sample cost off
//! the disk. Flush and close make everything buffered durable.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use contracts::{
    ImuSample, RecorderError, SampleSink, DEFAULT_FLUSH_THRESHOLD, PARAM_FLUSH_THRESHOLD,
    PARAM_OUTPUT_DIR,
};
use tracing::{debug, info, instrument, warn};

/// CSV header row, written once per file
pub const CSV_HEADER: &str = "t_ns,ax,ay,az,gx,gy,gz";

/// Configuration for CsvSink
#[derive(Debug, Clone)]
pub struct CsvSinkConfig {
    /// Directory recordings are written into
    pub output_dir: PathBuf,
    /// Buffered line count that triggers an automatic flush
    pub flush_threshold: usize,
}

impl CsvSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, RecorderError> {
        let output_dir = params
            .get(PARAM_OUTPUT_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./recordings"));

        let flush_threshold = match params.get(PARAM_FLUSH_THRESHOLD) {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                RecorderError::config_validation(
                    PARAM_FLUSH_THRESHOLD,
                    format!("expected a positive integer, got '{raw}'"),
                )
            })?,
            None => DEFAULT_FLUSH_THRESHOLD,
        };

        if flush_threshold == 0 {
            return Err(RecorderError::config_validation(
                PARAM_FLUSH_THRESHOLD,
                "must be at least 1",
            ));
        }

        Ok(Self {
            output_dir,
            flush_threshold,
        })
    }
}

/// Sink that persists merged samples as CSV rows
///
/// Inactive until [`start_new_file`](CsvSink::start_new_file) succeeds;
/// while inactive, appends are silently ignored so an unstarted or
/// already-closed recording never errors the pipeline.
pub struct CsvSink {
    name: String,
    config: CsvSinkConfig,
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    buffer: Vec<String>,
}

impl CsvSink {
    /// Create a new CsvSink (inactive, no file yet)
    pub fn new(name: impl Into<String>, config: CsvSinkConfig) -> Self {
        let buffer = Vec::with_capacity(config.flush_threshold);
        Self {
            name: name.into(),
            config,
            writer: None,
            path: None,
            buffer,
        }
    }

    /// Create from params map (for factory), starting the first file
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, RecorderError> {
        let config = CsvSinkConfig::from_params(params)?;
        let mut sink = Self::new(name, config);
        sink.start_new_file()?;
        Ok(sink)
    }

    /// Path of the recording currently being written
    ///
    /// `None` before the first `start_new_file` and after `close_file`.
    pub fn current_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether a destination is open
    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }

    /// Open a fresh timestamped recording file
    ///
    /// Any previous file is flushed and closed first. The header row is
    /// on disk before this returns, so a crash right after start still
    /// leaves a parseable file. On failure the sink ends up inactive,
    /// exactly as if the call never happened.
    #[instrument(name = "csv_sink_start_new_file", skip(self), fields(sink = %self.name))]
    pub fn start_new_file(&mut self) -> Result<PathBuf, RecorderError> {
        self.close_file()?;

        fs::create_dir_all(&self.config.output_dir)?;

        let file_name = format!("imu_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.config.output_dir.join(file_name);

        match Self::open_with_header(&path) {
            Ok(writer) => {
                info!(sink = %self.name, path = %path.display(), "Recording file started");
                self.writer = Some(writer);
                self.path = Some(path.clone());
                Ok(path)
            }
            Err(e) => {
                // Don't leave a header-less or header-only stub behind
                let _ = fs::remove_file(&path);
                Err(RecorderError::sink_write(&self.name, e.to_string()))
            }
        }
    }

    fn open_with_header(path: &Path) -> std::io::Result<BufWriter<File>> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{CSV_HEADER}")?;
        writer.flush()?;
        Ok(writer)
    }

    /// Buffer one sample, flushing when the batch fills up
    ///
    /// Silently ignored while no file is open.
    pub fn append(&mut self, sample: &ImuSample) -> Result<(), RecorderError> {
        if self.writer.is_none() {
            return Ok(());
        }

        self.buffer.push(format_line(sample));

        if self.buffer.len() >= self.config.flush_threshold {
            self.flush_buffered()?;
        }
        Ok(())
    }

    /// Write all buffered lines to disk, in arrival order
    ///
    /// The batch is only cleared once every line reached the file, so a
    /// failed flush can be retried without losing samples.
    #[instrument(name = "csv_sink_flush", skip(self), fields(sink = %self.name))]
    pub fn flush_buffered(&mut self) -> Result<(), RecorderError> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        if self.buffer.is_empty() {
            return Ok(());
        }

        for line in &self.buffer {
            writeln!(writer, "{line}")
                .map_err(|e| RecorderError::sink_write(&self.name, e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| RecorderError::sink_write(&self.name, e.to_string()))?;

        debug!(sink = %self.name, lines = self.buffer.len(), "Batch flushed");
        self.buffer.clear();
        Ok(())
    }

    /// Flush remaining lines and release the destination
    ///
    /// Safe to call when already closed. After a successful close the
    /// sink is inactive and `current_path` returns `None`.
    #[instrument(name = "csv_sink_close", skip(self), fields(sink = %self.name))]
    pub fn close_file(&mut self) -> Result<(), RecorderError> {
        self.flush_buffered()?;

        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| RecorderError::sink_write(&self.name, e.to_string()))?;
            if let Some(path) = self.path.take() {
                info!(sink = %self.name, path = %path.display(), "Recording file closed");
            }
        }
        Ok(())
    }
}

fn format_line(sample: &ImuSample) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        sample.t_ns, sample.ax, sample.ay, sample.az, sample.gx, sample.gy, sample.gz
    )
}

impl Drop for CsvSink {
    fn drop(&mut self) {
        if self.is_active() {
            if let Err(e) = self.close_file() {
                warn!(sink = %self.name, error = %e, "Close on drop failed");
            }
        }
    }
}

impl SampleSink for CsvSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, sample: &ImuSample) -> Result<(), RecorderError> {
        self.append(sample)
    }

    async fn flush(&mut self) -> Result<(), RecorderError> {
        self.flush_buffered()
    }

    async fn close(&mut self) -> Result<(), RecorderError> {
        self.close_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_config(dir: &Path, flush_threshold: usize) -> CsvSinkConfig {
        CsvSinkConfig {
            output_dir: dir.to_path_buf(),
            flush_threshold,
        }
    }

    fn sample_at(t_ns: i64) -> ImuSample {
        ImuSample::from_axes(t_ns, [0.01, -0.02, 9.81], [0.001, 0.002, 0.003])
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_header_and_rows_after_close() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::new("csv", test_config(dir.path(), 300));

        let path = sink.start_new_file().unwrap();
        for i in 0..3 {
            sink.append(&sample_at(i * 10_000_000)).unwrap();
        }
        sink.close_file().unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("0,"));
        assert!(lines[2].starts_with("10000000,"));
        assert_eq!(lines[1].split(',').count(), 7);
    }

    #[test]
    fn test_header_written_before_start_returns() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::new("csv", test_config(dir.path(), 300));

        let path = sink.start_new_file().unwrap();
        // No append, no flush: the header alone must already be on disk
        assert_eq!(read_lines(&path), vec![CSV_HEADER.to_string()]);
        sink.close_file().unwrap();
    }

    #[test]
    fn test_append_before_start_is_silent_noop() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::new("csv", test_config(dir.path(), 300));

        sink.append(&sample_at(1)).unwrap();
        assert!(sink.current_path().is_none());

        let path = sink.start_new_file().unwrap();
        sink.close_file().unwrap();
        // The pre-start sample never shows up
        assert_eq!(read_lines(&path).len(), 1);
    }

    #[test]
    fn test_auto_flush_at_threshold() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::new("csv", test_config(dir.path(), 2));

        let path = sink.start_new_file().unwrap();
        sink.append(&sample_at(1)).unwrap();
        // Below threshold: still buffered
        assert_eq!(read_lines(&path).len(), 1);

        sink.append(&sample_at(2)).unwrap();
        // Threshold reached: batch hit the disk without an explicit flush
        assert_eq!(read_lines(&path).len(), 3);
        sink.close_file().unwrap();
    }

    #[test]
    fn test_flush_preserves_arrival_order() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::new("csv", test_config(dir.path(), 100));

        let path = sink.start_new_file().unwrap();
        for t in [5, 3, 9] {
            sink.append(&sample_at(t)).unwrap();
        }
        sink.flush_buffered().unwrap();

        let lines = read_lines(&path);
        assert!(lines[1].starts_with("5,"));
        assert!(lines[2].starts_with("3,"));
        assert!(lines[3].starts_with("9,"));
        sink.close_file().unwrap();
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::new("csv", test_config(dir.path(), 300));

        sink.start_new_file().unwrap();
        sink.append(&sample_at(1)).unwrap();
        sink.close_file().unwrap();
        sink.close_file().unwrap();
        assert!(sink.current_path().is_none());
        assert!(!sink.is_active());
    }

    #[test]
    fn test_append_after_close_is_silent_noop() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::new("csv", test_config(dir.path(), 300));

        let path = sink.start_new_file().unwrap();
        sink.close_file().unwrap();
        sink.append(&sample_at(42)).unwrap();

        assert_eq!(read_lines(&path).len(), 1);
    }

    #[test]
    fn test_start_new_file_rolls_over() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::new("csv", test_config(dir.path(), 300));

        let first = sink.start_new_file().unwrap();
        sink.append(&sample_at(1)).unwrap();
        let second = sink.start_new_file().unwrap();

        // Previous file was flushed and closed by the rollover
        assert_eq!(read_lines(&first).len(), 2);
        assert_eq!(sink.current_path(), Some(second.as_path()));
        sink.close_file().unwrap();
    }

    #[test]
    fn test_from_params_defaults() {
        let dir = tempdir().unwrap();
        let mut params = HashMap::new();
        params.insert(
            PARAM_OUTPUT_DIR.to_string(),
            dir.path().to_string_lossy().into_owned(),
        );

        let sink = CsvSink::from_params("csv", &params).unwrap();
        assert!(sink.is_active());
        assert_eq!(sink.config.flush_threshold, DEFAULT_FLUSH_THRESHOLD);
        let name = sink
            .current_path()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with("imu_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_from_params_rejects_bad_threshold() {
        let mut params = HashMap::new();
        params.insert(PARAM_FLUSH_THRESHOLD.to_string(), "zero".to_string());
        assert!(CsvSink::from_params("csv", &params).is_err());

        params.insert(PARAM_FLUSH_THRESHOLD.to_string(), "0".to_string());
        assert!(CsvSink::from_params("csv", &params).is_err());
    }

    #[tokio::test]
    async fn test_sample_sink_contract() {
        let dir = tempdir().unwrap();
        let mut sink = CsvSink::new("csv", test_config(dir.path(), 300));
        let path = sink.start_new_file().unwrap();

        sink.write(&sample_at(7)).await.unwrap();
        sink.flush().await.unwrap();
        sink.close().await.unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("7,"));
    }
}
