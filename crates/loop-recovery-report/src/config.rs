use std::fs;
use std::path::{Path, PathBuf};

use loop_recovery::{RecoveryParams, BASELINE_LABEL, DEGRADED_LABEL};
use serde::{Deserialize, Serialize};

use crate::ReportError;

pub const DEFAULT_BASELINE_CSV: &str = "simulation_baseline.csv";
pub const DEFAULT_DEGRADED_CSV: &str = "simulation_no_antiwindup.csv";
pub const DEFAULT_DISTURBANCE_TIME: f64 = 3.5;

/// A trace file and the label it is reported under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub label: Option<String>,
}

impl DatasetSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            label: None,
        }
    }

    pub fn label_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub baseline: DatasetSpec,
    pub degraded: DatasetSpec,
    pub disturbance_time: f64,
    pub recovery: RecoveryParams,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            baseline: DatasetSpec::new(DEFAULT_BASELINE_CSV),
            degraded: DatasetSpec::new(DEFAULT_DEGRADED_CSV),
            disturbance_time: DEFAULT_DISTURBANCE_TIME,
            recovery: RecoveryParams::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path)?;
        let cfg: ReportConfig = toml::from_str(&raw).map_err(|source| ReportError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if !self.disturbance_time.is_finite() {
            return Err(ReportError::InvalidConfig(format!(
                "disturbance_time must be finite, got {}",
                self.disturbance_time
            )));
        }
        for (name, spec) in [("baseline", &self.baseline), ("degraded", &self.degraded)] {
            if spec.path.as_os_str().is_empty() {
                return Err(ReportError::InvalidConfig(format!(
                    "{name} path must not be empty"
                )));
            }
        }
        self.recovery
            .validate()
            .map_err(|e| ReportError::InvalidConfig(e.to_string()))
    }

    pub fn baseline_label(&self) -> &str {
        self.baseline.label_or(BASELINE_LABEL)
    }

    pub fn degraded_label(&self) -> &str {
        self.degraded.label_or(DEGRADED_LABEL)
    }
}
