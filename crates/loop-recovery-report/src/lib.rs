//! Disturbance-recovery reporting for closed-loop simulation traces.
//!
//! Loads `time,setpoint,measurement` CSV traces, runs the `loop-recovery`
//! analysis on a baseline and a degraded run, and renders the responses.

pub mod compare;
pub mod config;
pub mod io;
pub mod plot;

use std::path::PathBuf;

use loop_recovery::RecoveryError;
use thiserror::Error;

pub use compare::{compare_datasets, write_summary_json, DatasetComparison};
pub use config::{DatasetSpec, ReportConfig};
pub use io::{load_trace, TracePoint, TraceTable};
pub use plot::{plot_comparison, plot_step_response};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{label} ({path}): {source}")]
    Dataset {
        label: String,
        path: PathBuf,
        #[source]
        source: RecoveryError,
    },
}

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
