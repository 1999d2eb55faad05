//! Closed-loop simulation for disturbance-recovery traces.
//!
//! A PID controller drives a first-order plant through a setpoint step; a
//! constant sensor bias is injected into the measurement at a configurable
//! instant. Each run is written as a `time,setpoint,measurement,control` CSV
//! that `loop-recovery` can analyze.

pub mod control_loop;
pub mod output;
pub mod pid;
pub mod plant;
pub mod scenarios;

use thiserror::Error;

pub use control_loop::{ControlLoop, SimulationConfig, TraceRow};
pub use output::{create_timestamped_output_dir, write_trace_csv};
pub use pid::{Limits, PidController};
pub use plant::FirstOrderPlant;
pub use scenarios::{baseline_loop, no_antiwindup_loop, Scenario, BASELINE_CSV, NO_ANTIWINDUP_CSV};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
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
