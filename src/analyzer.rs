//! Disturbance-recovery analysis
//!
//! Splits a trace into a pre-disturbance window `[t0 - pre, t0)` and a
//! post-disturbance window `[t0, t0 + post]`, takes the median of the first
//! as the reference level, and searches the second for the earliest sample
//! after which every remaining sample stays inside the tolerance band.

use crate::error::{RecoveryError, Window};
use crate::metrics::MetricsRecord;
use crate::params::{RecoveryParams, MIN_WINDOW_SAMPLES};
use crate::trace::{OrderedTrace, Sample};

/// Recovery analyzer bound to a validated parameter set.
///
/// Holds no mutable state; one instance can analyze any number of traces,
/// from any number of threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryMetricsAnalyzer {
    params: RecoveryParams,
}

impl RecoveryMetricsAnalyzer {
    pub fn new(params: RecoveryParams) -> Result<Self, RecoveryError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &RecoveryParams {
        &self.params
    }

    /// Compute recovery metrics around the disturbance at `disturbance_time`.
    pub fn compute(
        &self,
        trace: &OrderedTrace,
        disturbance_time: f64,
    ) -> Result<MetricsRecord, RecoveryError> {
        if !disturbance_time.is_finite() {
            return Err(RecoveryError::InvalidParams(format!(
                "disturbance time must be finite, got {disturbance_time}"
            )));
        }

        let t0 = disturbance_time;
        let pre = trace.window_half_open(t0 - self.params.pre_window_s, t0);
        let post = trace.window_closed(t0, t0 + self.params.post_window_s);

        ensure_window(Window::Pre, pre.len())?;
        ensure_window(Window::Post, post.len())?;

        let pre_level = median(pre);
        if pre_level == 0.0 {
            return Err(RecoveryError::DegenerateReference { pre_level });
        }

        let min_after = post.iter().map(|s| s.value).fold(f64::INFINITY, f64::min);
        let (band_low, band_high) = tolerance_band(pre_level, self.params.band);

        let recovery_time_s =
            settling_index(post, band_low, band_high).map(|idx| post[idx].time - t0);

        tracing::debug!(
            pre_samples = pre.len(),
            post_samples = post.len(),
            pre_level,
            min_after,
            band_low,
            band_high,
            recovery_time_s = ?recovery_time_s,
            "computed recovery metrics"
        );

        Ok(MetricsRecord {
            pre_level,
            min_after,
            drop: pre_level - min_after,
            recovery_time_s,
            band_low,
            band_high,
        })
    }
}

/// Compute recovery metrics with explicit parameters.
pub fn compute(
    trace: &OrderedTrace,
    disturbance_time: f64,
    params: &RecoveryParams,
) -> Result<MetricsRecord, RecoveryError> {
    RecoveryMetricsAnalyzer::new(*params)?.compute(trace, disturbance_time)
}

fn ensure_window(window: Window, found: usize) -> Result<(), RecoveryError> {
    if found >= MIN_WINDOW_SAMPLES {
        return Ok(());
    }

    Err(RecoveryError::InsufficientSamples {
        window,
        found,
        required: MIN_WINDOW_SAMPLES,
    })
}

/// Median of sample values; mean of the two middle values for even counts.
fn median(samples: &[Sample]) -> f64 {
    let mut values: Vec<f64> = samples.iter().map(|s| s.value).collect();
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// `[L(1-b), L(1+b)]`, with the bounds swapped for a negative level so the
/// band always has `low <= L <= high`.
fn tolerance_band(level: f64, band: f64) -> (f64, f64) {
    let a = level * (1.0 - band);
    let b = level * (1.0 + band);
    if level >= 0.0 {
        (a, b)
    } else {
        (b, a)
    }
}

/// Earliest index from which every remaining sample lies in `[low, high]`.
///
/// Equivalent to testing every suffix in turn: the answer is one past the
/// last out-of-band sample, or `None` when that sample is the final one.
fn settling_index(samples: &[Sample], low: f64, high: f64) -> Option<usize> {
    if samples.is_empty() {
        return None;
    }

    match samples
        .iter()
        .rposition(|s| s.value < low || s.value > high)
    {
        None => Some(0),
        Some(last_out) if last_out + 1 < samples.len() => Some(last_out + 1),
        Some(_) => None,
    }
}
