use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::process::Command;

fn write_trace(path: &Path, end_s: f64, dip: f64, settle_to: f64) {
    let mut text = String::from("time,setpoint,measurement,control\n");
    for k in 0.. {
        let t = k as f64 / 10.0;
        if t > end_s + 1e-9 {
            break;
        }
        let y = if t < 3.5 {
            1.0
        } else if t < 3.65 {
            dip
        } else {
            settle_to
        };
        writeln!(text, "{t},1.0,{y},0.0").unwrap();
    }
    fs::write(path, text).unwrap();
}

fn report() -> Command {
    Command::new(env!("CARGO_BIN_EXE_loop-recovery-report"))
}

#[test]
fn prints_headline_and_aligned_summary() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.csv");
    let degr = dir.path().join("degr.csv");
    write_trace(&base, 6.0, 0.8, 1.0);
    write_trace(&degr, 6.0, 0.8, 0.9);
    let summary = dir.path().join("summary.json");

    let output = report()
        .arg("--baseline")
        .arg(&base)
        .arg("--degraded")
        .arg(&degr)
        .arg("--summary-json")
        .arg(&summary)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "--- Disturbance Recovery Metrics (t = 3.5s) ---");
    assert_eq!(
        lines[1],
        "Baseline (anti-windup): pre=1.0000, min=0.8000, drop=0.2000, recovery=0.200s"
    );
    assert_eq!(
        lines[2],
        "No anti-windup:         pre=1.0000, min=0.8000, drop=0.2000, recovery=n/a"
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(json["baseline"]["metrics"]["min_after"], 0.8);
}

#[test]
fn config_file_and_flags_combine() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.csv");
    let degr = dir.path().join("degr.csv");
    write_trace(&base, 6.0, 0.8, 1.0);
    write_trace(&degr, 6.0, 0.8, 0.9);
    let config = dir.path().join("report.toml");
    fs::write(
        &config,
        format!(
            "[baseline]\npath = {:?}\nlabel = \"Clamped\"\n\n[degraded]\npath = {:?}\n",
            base.display().to_string(),
            degr.display().to_string()
        ),
    )
    .unwrap();

    // a 15% band admits the settled 0.9
    let output = report()
        .arg("--config")
        .arg(&config)
        .args(["--band", "0.15"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Clamped:"), "{stdout}");
    assert!(!stdout.contains("recovery=n/a"), "{stdout}");
}

#[test]
fn short_post_window_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.csv");
    let degr = dir.path().join("degr.csv");
    write_trace(&base, 6.0, 0.8, 1.0);
    write_trace(&degr, 3.7, 0.8, 1.0);

    let output = report()
        .arg("--baseline")
        .arg(&base)
        .arg("--degraded")
        .arg(&degr)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("No anti-windup"), "{stderr}");
    assert!(stderr.contains("post-disturbance"), "{stderr}");
}

#[test]
fn missing_dataset_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = report()
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("simulation_baseline.csv"), "{stderr}");
}
