//! Loop Recovery - disturbance-recovery metrics for closed-loop traces
//!
//! Given a time-ordered measurement trace and the instant at which a
//! disturbance was injected, computes the pre-disturbance reference level,
//! the worst excursion afterwards, the drop between the two, and the time the
//! signal needs to re-enter a tolerance band around the reference and stay
//! there for the rest of the observation window.

pub mod analyzer;
pub mod compare;
pub mod error;
pub mod metrics;
pub mod params;
pub mod trace;

// Re-export main types
pub use analyzer::{compute, RecoveryMetricsAnalyzer};
pub use compare::{compare, Comparison, RunMetrics, BASELINE_LABEL, DEGRADED_LABEL};
pub use error::{RecoveryError, Window};
pub use metrics::{format_duration, MetricsRecord};
pub use params::{RecoveryParams, MIN_WINDOW_SAMPLES};
pub use trace::{OrderedTrace, Sample};
