//! Recovery metrics record and its text rendering

use serde::Serialize;

/// Result of one recovery analysis.
///
/// Only the analyzer constructs these; fields are read through accessors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub(crate) pre_level: f64,
    pub(crate) min_after: f64,
    pub(crate) drop: f64,
    pub(crate) recovery_time_s: Option<f64>,
    pub(crate) band_low: f64,
    pub(crate) band_high: f64,
}

impl MetricsRecord {
    /// Median of the pre-disturbance window
    pub fn pre_level(&self) -> f64 {
        self.pre_level
    }

    /// Minimum of the post-disturbance window
    pub fn min_after(&self) -> f64 {
        self.min_after
    }

    /// `pre_level - min_after`; negative when the disturbance pushed the signal up
    pub fn drop(&self) -> f64 {
        self.drop
    }

    /// Time from the disturbance until the signal settled in band for good,
    /// or `None` if it never did within the post window
    pub fn recovery_time_s(&self) -> Option<f64> {
        self.recovery_time_s
    }

    pub fn band_low(&self) -> f64 {
        self.band_low
    }

    pub fn band_high(&self) -> f64 {
        self.band_high
    }

    pub fn recovered(&self) -> bool {
        self.recovery_time_s.is_some()
    }
}

/// `"n/a"` for a missing duration, otherwise seconds with three decimals.
pub fn format_duration(duration_s: Option<f64>) -> String {
    match duration_s {
        Some(v) => format!("{v:.3}s"),
        None => "n/a".to_string(),
    }
}
