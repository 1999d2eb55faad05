//! Time-ordered measurement traces
//!
//! `OrderedTrace` is the only input the analyzer accepts. Its constructor
//! rejects non-finite samples and decreasing time, so window selection can
//! use binary search and the settling scan can rely on time order.

use serde::{Deserialize, Serialize};

use crate::error::RecoveryError;

/// One `(time, value)` observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Time [s]
    pub time: f64,
    /// Measured value
    pub value: f64,
}

impl Sample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// A finite trace ordered by non-decreasing time.
///
/// Equal timestamps are kept as separate samples in their given order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedTrace {
    samples: Vec<Sample>,
}

impl OrderedTrace {
    /// Validate and wrap a sample sequence.
    pub fn new(samples: Vec<Sample>) -> Result<Self, RecoveryError> {
        let mut previous_time: Option<f64> = None;

        for (index, sample) in samples.iter().enumerate() {
            if !sample.time.is_finite() {
                return Err(RecoveryError::InvalidTrace {
                    index,
                    reason: format!("time {} is not finite", sample.time),
                });
            }
            if !sample.value.is_finite() {
                return Err(RecoveryError::InvalidTrace {
                    index,
                    reason: format!("value {} is not finite", sample.value),
                });
            }
            if let Some(previous) = previous_time {
                if sample.time < previous {
                    return Err(RecoveryError::InvalidTrace {
                        index,
                        reason: format!(
                            "time {} precedes the previous sample at {}",
                            sample.time, previous
                        ),
                    });
                }
            }
            previous_time = Some(sample.time);
        }

        Ok(Self { samples })
    }

    /// Build a trace from parallel time and value columns.
    pub fn from_columns(times: &[f64], values: &[f64]) -> Result<Self, RecoveryError> {
        if times.len() != values.len() {
            return Err(RecoveryError::LengthMismatch {
                context: "trace values",
                expected: times.len(),
                got: values.len(),
            });
        }

        Self::new(
            times
                .iter()
                .zip(values)
                .map(|(&time, &value)| Sample::new(time, value))
                .collect(),
        )
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples with `start <= time < end`.
    pub fn window_half_open(&self, start: f64, end: f64) -> &[Sample] {
        let lo = self.samples.partition_point(|s| s.time < start);
        let hi = self.samples.partition_point(|s| s.time < end);
        &self.samples[lo..hi.max(lo)]
    }

    /// Samples with `start <= time <= end`.
    pub fn window_closed(&self, start: f64, end: f64) -> &[Sample] {
        let lo = self.samples.partition_point(|s| s.time < start);
        let hi = self.samples.partition_point(|s| s.time <= end);
        &self.samples[lo..hi.max(lo)]
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl TryFrom<Vec<Sample>> for OrderedTrace {
    type Error = RecoveryError;

    fn try_from(samples: Vec<Sample>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl TryFrom<Vec<(f64, f64)>> for OrderedTrace {
    type Error = RecoveryError;

    fn try_from(pairs: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        Self::new(
            pairs
                .into_iter()
                .map(|(time, value)| Sample::new(time, value))
                .collect(),
        )
    }
}
