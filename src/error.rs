//! Errors raised while building traces or computing recovery metrics

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The two analysis windows around the disturbance instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// `[t0 - pre_window_s, t0)`
    Pre,
    /// `[t0, t0 + post_window_s]`
    Post,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Pre => f.write_str("pre-disturbance"),
            Window::Post => f.write_str("post-disturbance"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecoveryError {
    #[error("insufficient samples in {window} window: found {found}, need at least {required}")]
    InsufficientSamples {
        window: Window,
        found: usize,
        required: usize,
    },
    #[error("invalid trace at sample {index}: {reason}")]
    InvalidTrace { index: usize, reason: String },
    #[error("{context} length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("reference level is {pre_level}; a relative tolerance band needs a non-zero level")]
    DegenerateReference { pre_level: f64 },
    #[error("{label}: {source}")]
    Run {
        label: String,
        #[source]
        source: Box<RecoveryError>,
    },
}

impl RecoveryError {
    /// Tags an error with the name of the run it came from.
    pub fn for_run(self, label: impl Into<String>) -> Self {
        RecoveryError::Run {
            label: label.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_samples_message_names_window() {
        let err = RecoveryError::InsufficientSamples {
            window: Window::Post,
            found: 3,
            required: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient samples in post-disturbance window: found 3, need at least 5"
        );
    }

    #[test]
    fn run_label_wraps_the_source() {
        let err = RecoveryError::InsufficientSamples {
            window: Window::Pre,
            found: 0,
            required: 5,
        }
        .for_run("baseline");

        assert!(err.to_string().starts_with("baseline: insufficient samples in pre-disturbance"));
        match err {
            RecoveryError::Run { label, source } => {
                assert_eq!(label, "baseline");
                assert!(matches!(
                    *source,
                    RecoveryError::InsufficientSamples {
                        window: Window::Pre,
                        ..
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
