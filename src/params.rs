//! Analysis window and tolerance parameters

use serde::{Deserialize, Serialize};

use crate::error::RecoveryError;

/// Minimum number of samples each analysis window must hold.
pub const MIN_WINDOW_SAMPLES: usize = 5;

/// Parameters for the recovery analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryParams {
    /// Length of the pre-disturbance window [s]
    pub pre_window_s: f64,
    /// Length of the post-disturbance window [s]
    pub post_window_s: f64,
    /// Fractional half-width of the tolerance band (0.02 = +/-2%)
    pub band: f64,
}

impl RecoveryParams {
    pub fn new(pre_window_s: f64, post_window_s: f64, band: f64) -> Self {
        Self {
            pre_window_s,
            post_window_s,
            band,
        }
    }

    /// Same windows, different tolerance band.
    pub fn with_band(self, band: f64) -> Self {
        Self { band, ..self }
    }

    pub fn validate(&self) -> Result<(), RecoveryError> {
        if !self.pre_window_s.is_finite() || self.pre_window_s <= 0.0 {
            return Err(RecoveryError::InvalidParams(format!(
                "pre_window_s must be finite and > 0, got {}",
                self.pre_window_s
            )));
        }

        if !self.post_window_s.is_finite() || self.post_window_s <= 0.0 {
            return Err(RecoveryError::InvalidParams(format!(
                "post_window_s must be finite and > 0, got {}",
                self.post_window_s
            )));
        }

        if !self.band.is_finite() || !(0.0..1.0).contains(&self.band) {
            return Err(RecoveryError::InvalidParams(format!(
                "band must be in [0, 1), got {}",
                self.band
            )));
        }

        Ok(())
    }
}

impl Default for RecoveryParams {
    fn default() -> Self {
        Self {
            pre_window_s: 0.5,
            post_window_s: 2.0,
            band: 0.02,
        }
    }
}
