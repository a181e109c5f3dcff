//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    recorder: RecorderInfo,
    estimator: EstimatorInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct RecorderInfo {
    rate: String,
    period_us: u32,
    nominal_hz: f64,
}

#[derive(Serialize)]
struct EstimatorInfo {
    window_size: usize,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    queue_capacity: usize,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    params: std::collections::HashMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &contracts::RecorderBlueprint, args: &InfoArgs) -> ConfigInfo {
    let sinks = if args.sinks {
        blueprint
            .sinks
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                sink_type: format!("{:?}", s.sink_type),
                queue_capacity: s.queue_capacity,
                params: s.params.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        recorder: RecorderInfo {
            rate: blueprint.recorder.rate.to_string(),
            period_us: blueprint.recorder.rate.period_us(),
            nominal_hz: blueprint.recorder.rate.nominal_hz(),
        },
        estimator: EstimatorInfo {
            window_size: blueprint.estimator.window_size,
        },
        sinks,
    }
}

fn print_config_info(blueprint: &contracts::RecorderBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                IMU Recorder Configuration                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Recorder info
    println!("🎛  Recorder");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Rate preset: {}", blueprint.recorder.rate);
    println!(
        "   ├─ Period hint: {} us",
        blueprint.recorder.rate.period_us()
    );
    println!(
        "   └─ Nominal rate: {} Hz",
        blueprint.recorder.rate.nominal_hz()
    );

    // Estimator
    println!("\n📈 Rate Estimator");
    println!("   └─ Window size: {}", blueprint.estimator.window_size);

    // Sinks
    if !blueprint.sinks.is_empty() {
        println!("\n📤 Sinks ({})", blueprint.sinks.len());
        for (i, sink) in blueprint.sinks.iter().enumerate() {
            let is_last = i == blueprint.sinks.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            let child_prefix = if is_last { "   " } else { "│  " };

            println!("   {} {} ({:?})", prefix, sink.name, sink.sink_type);

            if args.sinks {
                println!(
                    "   {}  ├─ Queue capacity: {}",
                    child_prefix, sink.queue_capacity
                );
                if sink.params.is_empty() {
                    println!("   {}  └─ Params: (none)", child_prefix);
                } else {
                    println!("   {}  └─ Params:", child_prefix);
                    for (key, value) in &sink.params {
                        println!("   {}       {} = {}", child_prefix, key, value);
                    }
                }
            }
        }
    } else {
        println!("\n📤 Sinks: (none configured - csv default applies at record time)");
    }

    println!();
}
