use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use loop_recovery::{OrderedTrace, RecoveryError, Sample};
use serde::Deserialize;

use crate::ReportError;

const REQUIRED_COLUMNS: [&str; 2] = ["time", "measurement"];

/// One CSV row. Columns other than these are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TracePoint {
    pub time: f64,
    pub measurement: f64,
    #[serde(default)]
    pub setpoint: Option<f64>,
    #[serde(default)]
    pub control: Option<f64>,
}

/// A loaded trace file
#[derive(Debug, Clone, PartialEq)]
pub struct TraceTable {
    pub path: PathBuf,
    pub points: Vec<TracePoint>,
}

impl TraceTable {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(time, measurement)` as a validated trace.
    pub fn measurement_trace(&self) -> Result<OrderedTrace, RecoveryError> {
        OrderedTrace::new(
            self.points
                .iter()
                .map(|p| Sample::new(p.time, p.measurement))
                .collect(),
        )
    }

    pub fn measurement_series(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.time, p.measurement)).collect()
    }

    /// `(time, setpoint)` when every row carries a setpoint.
    pub fn setpoint_series(&self) -> Option<Vec<(f64, f64)>> {
        self.points
            .iter()
            .map(|p| p.setpoint.map(|sp| (p.time, sp)))
            .collect()
    }
}

pub fn load_trace(path: &Path) -> Result<TraceTable, ReportError> {
    let csv_err = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ReportError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let points = reader
        .deserialize()
        .collect::<Result<Vec<TracePoint>, _>>()
        .map_err(csv_err)?;

    tracing::debug!(path = %path.display(), rows = points.len(), "loaded trace");

    Ok(TraceTable {
        path: path.to_path_buf(),
        points,
    })
}
