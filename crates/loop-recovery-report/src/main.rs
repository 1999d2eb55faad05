use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use loop_recovery_report::{
    compare_datasets, init_tracing, plot_comparison, plot_step_response, write_summary_json,
    DatasetComparison, ReportConfig,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Compare disturbance recovery between a baseline and a degraded closed-loop run"
)]
struct Cli {
    /// TOML file with dataset paths and analysis parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Baseline trace CSV
    #[arg(long)]
    baseline: Option<PathBuf>,

    /// Degraded trace CSV
    #[arg(long)]
    degraded: Option<PathBuf>,

    /// Disturbance instant in seconds
    #[arg(long, allow_hyphen_values = true)]
    disturbance_time: Option<f64>,

    /// Pre-disturbance window length in seconds
    #[arg(long)]
    pre_window: Option<f64>,

    /// Post-disturbance window length in seconds
    #[arg(long)]
    post_window: Option<f64>,

    /// Fractional tolerance band half-width
    #[arg(long)]
    band: Option<f64>,

    /// Write the comparison as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Render step-response and comparison plots into this directory
    #[arg(long)]
    plot_dir: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<ReportConfig> {
        let mut cfg = match &self.config {
            Some(path) => ReportConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ReportConfig::default(),
        };

        if let Some(path) = &self.baseline {
            cfg.baseline.path = path.clone();
        }
        if let Some(path) = &self.degraded {
            cfg.degraded.path = path.clone();
        }
        if let Some(v) = self.disturbance_time {
            cfg.disturbance_time = v;
        }
        if let Some(v) = self.pre_window {
            cfg.recovery.pre_window_s = v;
        }
        if let Some(v) = self.post_window {
            cfg.recovery.post_window_s = v;
        }
        if let Some(v) = self.band {
            cfg.recovery.band = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("loop-recovery-report failed: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cfg = cli.resolve_config()?;
    let result = compare_datasets(&cfg)?;

    println!("{}", result.comparison);

    if let Some(path) = &cli.summary_json {
        write_summary_json(path, &result.comparison)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote summary");
    }
    if let Some(dir) = &cli.plot_dir {
        write_plots(dir, &result)?;
    }
    Ok(())
}

fn write_plots(dir: &Path, result: &DatasetComparison) -> anyhow::Result<()> {
    plot_step_response(&result.baseline, &dir.join("step_response_baseline.png"))?;
    plot_step_response(&result.degraded, &dir.join("step_response_no_antiwindup.png"))?;
    plot_comparison(
        &result.baseline,
        &result.degraded,
        result.comparison.disturbance_time,
        &dir.join("comparison.png"),
    )
    .context("failed to render comparison plot")?;
    tracing::info!(dir = %dir.display(), "wrote plots");
    Ok(())
}
