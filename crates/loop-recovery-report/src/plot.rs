use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use plotters::prelude::*;

use crate::io::TraceTable;

const SIZE: (u32, u32) = (1280, 720);
const DASH_SEGMENTS: usize = 40;

/// Setpoint and measurement against time.
pub fn plot_step_response(table: &TraceTable, path: &Path) -> anyhow::Result<()> {
    let measurement = table.measurement_series();
    let setpoint = table.setpoint_series();
    let series: Vec<&[(f64, f64)]> = setpoint
        .as_deref()
        .into_iter()
        .chain(std::iter::once(measurement.as_slice()))
        .collect();
    let (x_range, y_range) = axis_ranges(&series)
        .with_context(|| format!("{} has no finite samples to plot", table.path.display()))?;

    prepare_parent(path)?;
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Closed-Loop Step Response", ("sans-serif", 34).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Output")
        .draw()?;

    if let Some(sp) = &setpoint {
        chart
            .draw_series(LineSeries::new(sp.iter().copied(), &BLACK))?
            .label("Setpoint")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(3)));
    }
    chart
        .draw_series(LineSeries::new(measurement.iter().copied(), &BLUE))?
        .label("Measurement")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.7))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Both measurements on one chart with a dashed marker at the disturbance.
pub fn plot_comparison(
    baseline: &TraceTable,
    degraded: &TraceTable,
    disturbance_time: f64,
    path: &Path,
) -> anyhow::Result<()> {
    let base = baseline.measurement_series();
    let degr = degraded.measurement_series();
    let setpoint = baseline.setpoint_series();
    let series: Vec<&[(f64, f64)]> = setpoint
        .as_deref()
        .into_iter()
        .chain([base.as_slice(), degr.as_slice()])
        .collect();
    let Some((x_range, y_range)) = axis_ranges(&series) else {
        bail!("no finite samples to plot");
    };
    let (y_lo, y_hi) = (y_range.start, y_range.end);

    prepare_parent(path)?;
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Closed-Loop Response: Anti-Windup vs None",
            ("sans-serif", 34).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Output")
        .draw()?;

    if let Some(sp) = &setpoint {
        chart
            .draw_series(LineSeries::new(sp.iter().copied(), &BLACK))?
            .label("Setpoint")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(3)));
    }
    chart
        .draw_series(LineSeries::new(base.iter().copied(), &BLUE))?
        .label("Measurement (baseline: anti-windup)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(3)));
    chart
        .draw_series(LineSeries::new(degr.iter().copied(), &RED))?
        .label("Measurement (no anti-windup)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], RED.stroke_width(3)));

    // every other segment of a vertical line at t0
    let step = (y_hi - y_lo) / DASH_SEGMENTS as f64;
    chart
        .draw_series((0..DASH_SEGMENTS).step_by(2).map(|i| {
            let y0 = y_lo + i as f64 * step;
            PathElement::new(
                vec![(disturbance_time, y0), (disturbance_time, y0 + step)],
                GREEN.stroke_width(2),
            )
        }))?
        .label(format!("Disturbance (t={disturbance_time}s)"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], GREEN.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.7))
        .draw()?;

    root.present()?;
    Ok(())
}

fn prepare_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Time span and a 10%-padded value span covering every series.
fn axis_ranges(
    series: &[&[(f64, f64)]],
) -> Option<(std::ops::Range<f64>, std::ops::Range<f64>)> {
    let points = series
        .iter()
        .flat_map(|s| s.iter())
        .filter(|(t, v)| t.is_finite() && v.is_finite());

    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for &(t, v) in points {
        bounds = Some(match bounds {
            None => (t, t, v, v),
            Some((t0, t1, v0, v1)) => (t0.min(t), t1.max(t), v0.min(v), v1.max(v)),
        });
    }
    let (t_min, t_max, v_min, v_max) = bounds?;

    let t_max = if t_max > t_min { t_max } else { t_min + 1.0 };
    let pad = ((v_max - v_min) * 0.1).max(0.05);
    Some((t_min..t_max, (v_min - pad)..(v_max + pad)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::TracePoint;

    fn table(points: &[(f64, f64)], with_setpoint: bool) -> TraceTable {
        TraceTable {
            path: "mem.csv".into(),
            points: points
                .iter()
                .map(|&(time, measurement)| TracePoint {
                    time,
                    measurement,
                    setpoint: with_setpoint.then_some(1.0),
                    control: None,
                })
                .collect(),
        }
    }

    #[test]
    fn axis_ranges_pad_values_and_skip_non_finite() {
        let a = [(0.0, 0.0), (2.0, 1.0), (f64::NAN, 50.0)];
        let (x, y) = axis_ranges(&[a.as_slice()]).unwrap();
        assert_eq!(x, 0.0..2.0);
        assert!((y.start + 0.1).abs() < 1e-12);
        assert!((y.end - 1.1).abs() < 1e-12);
    }

    #[test]
    fn axis_ranges_of_empty_input_is_none() {
        let empty: Vec<(f64, f64)> = Vec::new();
        assert!(axis_ranges(&[empty.as_slice()]).is_none());
    }

    #[test]
    fn empty_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = plot_step_response(&table(&[], false), &dir.path().join("x.png")).unwrap_err();
        assert!(err.to_string().contains("mem.csv"));
    }
}
