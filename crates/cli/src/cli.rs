//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::RatePreset;
use std::path::PathBuf;

/// IMU Recorder - six-axis inertial recording pipeline
#[derive(Parser, Debug)]
#[command(
    name = "imu-recorder",
    author,
    version,
    about = "Six-axis IMU recording pipeline",
    long_about = "Records fused accelerometer and gyroscope streams as six-axis samples.\n\n\
                  Merges the two sensor streams into timestamped samples, tracks the \n\
                  effective sampling rate, and dispatches samples to configured sinks \n\
                  (CSV files by default)."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "IMU_RECORDER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "IMU_RECORDER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a recording session
    Record(RecordArgs),

    /// Validate configuration file without recording
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `record` command
#[derive(Parser, Debug, Clone)]
pub struct RecordArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "IMU_RECORDER_CONFIG"
    )]
    pub config: PathBuf,

    /// Override sampling rate preset from configuration
    #[arg(long, value_enum, env = "IMU_RECORDER_RATE")]
    pub rate: Option<RateArg>,

    /// Override recordings output directory from configuration
    #[arg(long, env = "IMU_RECORDER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of samples to record (0 = unlimited)
    #[arg(long, default_value = "0", env = "IMU_RECORDER_MAX_SAMPLES")]
    pub max_samples: u64,

    /// Recording duration in seconds (0 = until Ctrl+C)
    #[arg(long, default_value = "0", env = "IMU_RECORDER_DURATION")]
    pub duration: u64,

    /// Validate configuration and exit without recording
    #[arg(long)]
    pub dry_run: bool,

    /// Channel buffer size for internal queues
    #[arg(long, default_value = "100", env = "IMU_RECORDER_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "IMU_RECORDER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show sink configuration details
    #[arg(long)]
    pub sinks: bool,
}

/// Sampling rate preset selectable from the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RateArg {
    /// 50 Hz (20000 µs period hint)
    Hz50,
    /// 100 Hz (10000 µs period hint)
    Hz100,
}

impl From<RateArg> for RatePreset {
    fn from(arg: RateArg) -> Self {
        match arg {
            RateArg::Hz50 => RatePreset::Hz50,
            RateArg::Hz100 => RatePreset::Hz100,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
