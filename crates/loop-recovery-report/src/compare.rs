use std::fs;
use std::path::Path;

use loop_recovery::{Comparison, RecoveryMetricsAnalyzer, RunMetrics};

use crate::config::{DatasetSpec, ReportConfig};
use crate::io::{load_trace, TraceTable};
use crate::ReportError;

/// Comparison plus the loaded traces, kept for plotting.
#[derive(Debug, Clone)]
pub struct DatasetComparison {
    pub comparison: Comparison,
    pub baseline: TraceTable,
    pub degraded: TraceTable,
}

/// Load both datasets named by `config` and analyze them around the
/// configured disturbance instant.
pub fn compare_datasets(config: &ReportConfig) -> Result<DatasetComparison, ReportError> {
    config.validate()?;
    let analyzer = RecoveryMetricsAnalyzer::new(config.recovery)
        .map_err(|e| ReportError::InvalidConfig(e.to_string()))?;

    let (baseline_table, baseline) = analyze_dataset(
        &analyzer,
        &config.baseline,
        config.baseline_label(),
        config.disturbance_time,
    )?;
    let (degraded_table, degraded) = analyze_dataset(
        &analyzer,
        &config.degraded,
        config.degraded_label(),
        config.disturbance_time,
    )?;

    Ok(DatasetComparison {
        comparison: Comparison::new(config.disturbance_time, config.recovery, baseline, degraded),
        baseline: baseline_table,
        degraded: degraded_table,
    })
}

fn analyze_dataset(
    analyzer: &RecoveryMetricsAnalyzer,
    spec: &DatasetSpec,
    label: &str,
    disturbance_time: f64,
) -> Result<(TraceTable, RunMetrics), ReportError> {
    let table = load_trace(&spec.path)?;
    let tag = |source| ReportError::Dataset {
        label: label.to_string(),
        path: spec.path.clone(),
        source,
    };

    let trace = table.measurement_trace().map_err(tag)?;
    let metrics = analyzer.compute(&trace, disturbance_time).map_err(tag)?;
    tracing::info!(
        label,
        path = %spec.path.display(),
        drop = metrics.drop(),
        recovered = metrics.recovered(),
        "analyzed dataset"
    );

    Ok((table, RunMetrics::new(label, metrics)))
}

/// Pretty-printed JSON of the comparison, parent directories created.
pub fn write_summary_json(path: &Path, comparison: &Comparison) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(comparison)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loop_recovery::{RecoveryError, Window};
    use std::fmt::Write as _;

    fn write_step_csv(path: &Path, settle_to: f64, end_s: f64) {
        let mut text = String::from("time,setpoint,measurement\n");
        let mut k = 0;
        loop {
            let t = k as f64 / 10.0;
            if t > end_s + 1e-9 {
                break;
            }
            let v = if t < 1.0 { 1.0 } else { settle_to };
            writeln!(text, "{t},1.0,{v}").unwrap();
            k += 1;
        }
        std::fs::write(path, text).unwrap();
    }

    fn config_for(dir: &Path) -> ReportConfig {
        ReportConfig {
            baseline: DatasetSpec::new(dir.join("base.csv")),
            degraded: DatasetSpec::new(dir.join("degr.csv")),
            disturbance_time: 1.0,
            ..ReportConfig::default()
        }
    }

    #[test]
    fn compares_two_files() {
        let dir = tempfile::tempdir().unwrap();
        write_step_csv(&dir.path().join("base.csv"), 1.0, 4.0);
        write_step_csv(&dir.path().join("degr.csv"), 0.9, 4.0);

        let result = compare_datasets(&config_for(dir.path())).unwrap();
        let c = &result.comparison;
        assert_eq!(c.baseline.metrics.recovery_time_s(), Some(0.0));
        assert_eq!(c.degraded.metrics.recovery_time_s(), None);
        assert!((c.degraded.metrics.drop() - 0.1).abs() < 1e-12);
        assert_eq!(result.baseline.len(), 41);
    }

    #[test]
    fn custom_labels_flow_into_the_summary() {
        let dir = tempfile::tempdir().unwrap();
        write_step_csv(&dir.path().join("base.csv"), 1.0, 4.0);
        write_step_csv(&dir.path().join("degr.csv"), 1.0, 4.0);

        let mut cfg = config_for(dir.path());
        cfg.degraded.label = Some("Retuned".into());
        let result = compare_datasets(&cfg).unwrap();

        let [_, degr] = result.comparison.summary_lines();
        assert!(degr.starts_with("Retuned:"), "{degr}");
    }

    #[test]
    fn summary_json_keeps_absent_recovery_as_null() {
        let dir = tempfile::tempdir().unwrap();
        write_step_csv(&dir.path().join("base.csv"), 1.0, 4.0);
        write_step_csv(&dir.path().join("degr.csv"), 0.9, 4.0);
        let result = compare_datasets(&config_for(dir.path())).unwrap();

        let out = dir.path().join("out").join("summary.json");
        write_summary_json(&out, &result.comparison).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["disturbance_time"], 1.0);
        assert_eq!(value["baseline"]["label"], "Baseline (anti-windup)");
        assert_eq!(value["baseline"]["metrics"]["recovery_time_s"], 0.0);
        assert!(value["degraded"]["metrics"]["recovery_time_s"].is_null());
        assert_eq!(value["params"]["band"], 0.02);
    }

    #[test]
    fn short_dataset_error_names_label_path_and_window() {
        let dir = tempfile::tempdir().unwrap();
        write_step_csv(&dir.path().join("base.csv"), 1.0, 4.0);
        write_step_csv(&dir.path().join("degr.csv"), 1.0, 1.2);

        let err = compare_datasets(&config_for(dir.path())).unwrap_err();
        match &err {
            ReportError::Dataset { label, source, .. } => {
                assert_eq!(label, "No anti-windup");
                assert!(matches!(
                    source,
                    RecoveryError::InsufficientSamples {
                        window: Window::Post,
                        found: 3,
                        ..
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("degr.csv"), "{msg}");
        assert!(msg.contains("post-disturbance"), "{msg}");
    }
}
