use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use loop_recovery_sim::{
    create_timestamped_output_dir, init_tracing, write_trace_csv, Scenario, SimulationConfig,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Closed-loop PID simulation: baseline vs no anti-windup")]
struct Cli {
    /// Directory the CSV traces are written to
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// Write into a fresh UTC-timestamped subdirectory of --output
    #[arg(long, default_value_t = false)]
    timestamped: bool,

    /// Controller/plant step in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Simulated duration in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Time the sensor bias is injected
    #[arg(long)]
    disturbance_time: Option<f64>,

    /// Bias added to the measurement
    #[arg(long, allow_hyphen_values = true)]
    disturbance_offset: Option<f64>,

    /// Disable the injected disturbance
    #[arg(long, default_value_t = false)]
    no_disturbance: bool,

    /// Standard deviation of Gaussian measurement noise
    #[arg(long)]
    noise_std: Option<f64>,

    /// Random seed for measurement noise
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut cfg = SimulationConfig::default();
    if let Some(v) = cli.dt {
        cfg.dt_seconds = v;
    }
    if let Some(v) = cli.duration {
        cfg.duration_seconds = v;
    }
    if let Some(v) = cli.disturbance_time {
        cfg.disturbance_time = v;
    }
    if let Some(v) = cli.disturbance_offset {
        cfg.disturbance_offset = v;
    }
    if cli.no_disturbance {
        cfg.enable_disturbance = false;
    }
    if let Some(v) = cli.noise_std {
        cfg.measurement_noise_std = v;
    }
    if let Some(v) = cli.seed {
        cfg.seed = v;
    }
    cfg.validate()?;

    let output_dir = if cli.timestamped {
        create_timestamped_output_dir(&cli.output)?
    } else {
        std::fs::create_dir_all(&cli.output)
            .with_context(|| format!("failed to create {}", cli.output.display()))?;
        cli.output.clone()
    };

    let mut written = Vec::with_capacity(Scenario::ALL.len());
    for scenario in Scenario::ALL {
        let rows = scenario.run(&cfg)?;
        let path = output_dir.join(scenario.file_name());
        write_trace_csv(&path, &rows)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(scenario = ?scenario, rows = rows.len(), path = %path.display(), "wrote trace");
        written.push(path);
    }

    println!(
        "Wrote {}",
        written
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" and ")
    );
    Ok(())
}
