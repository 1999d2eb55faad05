//! Baseline-versus-degraded comparison of two runs

use std::fmt;

use serde::Serialize;

use crate::analyzer::RecoveryMetricsAnalyzer;
use crate::error::RecoveryError;
use crate::metrics::{format_duration, MetricsRecord};
use crate::params::RecoveryParams;
use crate::trace::OrderedTrace;

pub const BASELINE_LABEL: &str = "Baseline (anti-windup)";
pub const DEGRADED_LABEL: &str = "No anti-windup";

/// Metrics for one labelled run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetrics {
    pub label: String,
    pub metrics: MetricsRecord,
}

impl RunMetrics {
    pub fn new(label: impl Into<String>, metrics: MetricsRecord) -> Self {
        Self {
            label: label.into(),
            metrics,
        }
    }
}

/// Metrics for a baseline run and a degraded-configuration run analyzed
/// around the same disturbance instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub disturbance_time: f64,
    pub params: RecoveryParams,
    pub baseline: RunMetrics,
    pub degraded: RunMetrics,
}

impl Comparison {
    pub fn new(
        disturbance_time: f64,
        params: RecoveryParams,
        baseline: RunMetrics,
        degraded: RunMetrics,
    ) -> Self {
        Self {
            disturbance_time,
            params,
            baseline,
            degraded,
        }
    }

    pub fn headline(&self) -> String {
        format!(
            "--- Disturbance Recovery Metrics (t = {}s) ---",
            self.disturbance_time
        )
    }

    /// One line per run, labels padded so the metric columns line up.
    pub fn summary_lines(&self) -> [String; 2] {
        let width = self.baseline.label.len().max(self.degraded.label.len()) + 1;
        [
            summary_line(&self.baseline, width),
            summary_line(&self.degraded, width),
        ]
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        let [baseline, degraded] = self.summary_lines();
        writeln!(f, "{baseline}")?;
        write!(f, "{degraded}")
    }
}

fn summary_line(run: &RunMetrics, width: usize) -> String {
    let label = format!("{}:", run.label);
    let m = &run.metrics;
    format!(
        "{label:<width$} pre={:.4}, min={:.4}, drop={:.4}, recovery={}",
        m.pre_level(),
        m.min_after(),
        m.drop(),
        format_duration(m.recovery_time_s()),
    )
}

/// Analyze two traces around the same disturbance.
///
/// Errors are tagged with the label of the run that failed.
pub fn compare(
    baseline: &OrderedTrace,
    degraded: &OrderedTrace,
    disturbance_time: f64,
    params: &RecoveryParams,
) -> Result<Comparison, RecoveryError> {
    let analyzer = RecoveryMetricsAnalyzer::new(*params)?;

    let base = analyzer
        .compute(baseline, disturbance_time)
        .map_err(|e| e.for_run(BASELINE_LABEL))?;
    let degr = analyzer
        .compute(degraded, disturbance_time)
        .map_err(|e| e.for_run(DEGRADED_LABEL))?;

    Ok(Comparison::new(
        disturbance_time,
        *params,
        RunMetrics::new(BASELINE_LABEL, base),
        RunMetrics::new(DEGRADED_LABEL, degr),
    ))
}
