//! `record` command implementation.

use anyhow::{Context, Result};
use contracts::{RatePreset, PARAM_OUTPUT_DIR};
use std::time::Duration;
use tracing::info;

use crate::cli::RecordArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `record` command
pub async fn run_recording(args: &RecordArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(rate) = args.rate {
        let rate: RatePreset = rate.into();
        info!(%rate, "Overriding sampling rate from CLI");
        blueprint.recorder.rate = rate;
    }
    if let Some(ref dir) = args.output_dir {
        let dir = dir.to_string_lossy().into_owned();
        info!(output_dir = %dir, "Overriding output directory from CLI");
        for sink in blueprint.sinks.iter_mut() {
            if sink.sink_type == contracts::SinkType::Csv {
                sink.params.insert(PARAM_OUTPUT_DIR.to_string(), dir.clone());
            }
        }
        blueprint = blueprint.with_default_csv_sink(dir);
    } else {
        blueprint = blueprint.with_default_csv_sink("./recordings");
    }

    info!(
        rate = %blueprint.recorder.rate,
        window_size = blueprint.estimator.window_size,
        sinks = blueprint.sinks.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        blueprint,
        max_samples: if args.max_samples == 0 {
            None
        } else {
            Some(args.max_samples)
        },
        duration: if args.duration == 0 {
            None
        } else {
            Some(Duration::from_secs(args.duration))
        },
        buffer_size: args.buffer_size,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create and run pipeline with graceful shutdown handling
    let pipeline = Pipeline::new(pipeline_config);

    info!("Starting recording session...");

    let stats = match pipeline.run(shutdown_signal()).await {
        Ok(stats) => stats,
        Err(e) => return Err(CliError::recording_execution(format!("{e:#}")).into()),
    };

    info!(
        samples = stats.samples_recorded,
        duration_secs = stats.duration.as_secs_f64(),
        rate_hz = format!("{:.2}", stats.average_rate_hz()),
        "Recording completed successfully"
    );

    // Print detailed statistics
    stats.print_summary();

    info!("IMU Recorder finished");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::RecorderBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Recorder:");
    println!("  Rate preset: {}", blueprint.recorder.rate);
    println!(
        "  Period hint: {} us",
        blueprint.recorder.rate.period_us()
    );
    println!("\nEstimator:");
    println!("  Window size: {}", blueprint.estimator.window_size);

    if !blueprint.sinks.is_empty() {
        println!("\nSinks ({}):", blueprint.sinks.len());
        for sink in &blueprint.sinks {
            println!("  - {} ({:?})", sink.name, sink.sink_type);
        }
    }

    println!();
}
