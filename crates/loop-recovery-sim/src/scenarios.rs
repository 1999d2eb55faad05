//! Canonical baseline and degraded closed-loop runs
//!
//! Both runs share the plant (a = 1.2, b = 1.0), gains (2.0 / 1.0 / 0.05) and
//! output saturation of +/-2. The baseline additionally clamps the integral
//! to +/-1 (anti-windup); the degraded run does not.

use crate::control_loop::{ControlLoop, SimulationConfig, TraceRow};
use crate::pid::{Limits, PidController};
use crate::plant::FirstOrderPlant;
use crate::SimError;

pub const BASELINE_CSV: &str = "simulation_baseline.csv";
pub const NO_ANTIWINDUP_CSV: &str = "simulation_no_antiwindup.csv";

const PLANT_A: f64 = 1.2;
const PLANT_B: f64 = 1.0;
const KP: f64 = 2.0;
const KI: f64 = 1.0;
const KD: f64 = 0.05;
const OUTPUT_BOUND: f64 = 2.0;
const INTEGRAL_BOUND: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Saturation plus integral clamping
    Baseline,
    /// Saturation only
    NoAntiWindup,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::Baseline, Scenario::NoAntiWindup];

    pub fn file_name(&self) -> &'static str {
        match self {
            Scenario::Baseline => BASELINE_CSV,
            Scenario::NoAntiWindup => NO_ANTIWINDUP_CSV,
        }
    }

    pub fn build(&self, config: &SimulationConfig) -> Result<ControlLoop, SimError> {
        match self {
            Scenario::Baseline => baseline_loop(config),
            Scenario::NoAntiWindup => no_antiwindup_loop(config),
        }
    }

    pub fn run(&self, config: &SimulationConfig) -> Result<Vec<TraceRow>, SimError> {
        self.build(config)?.run()
    }
}

pub fn baseline_loop(config: &SimulationConfig) -> Result<ControlLoop, SimError> {
    let integral_limits = Some(Limits::symmetric(INTEGRAL_BOUND)?);
    build_loop(config, integral_limits)
}

pub fn no_antiwindup_loop(config: &SimulationConfig) -> Result<ControlLoop, SimError> {
    build_loop(config, None)
}

fn build_loop(
    config: &SimulationConfig,
    integral_limits: Option<Limits>,
) -> Result<ControlLoop, SimError> {
    let dt = config.dt_seconds;
    let plant = FirstOrderPlant::new(PLANT_A, PLANT_B, dt, 0.0)?;
    let pid = PidController::new(KP, KI, KD, dt)?
        .with_output_limits(Some(Limits::symmetric(OUTPUT_BOUND)?))
        .with_integral_limits(integral_limits);
    ControlLoop::new(pid, plant, config.clone())
}

#[cfg(test)]
mod tests {
    use super::Scenario;
    use crate::control_loop::SimulationConfig;

    #[test]
    fn control_stays_within_saturation() {
        for scenario in Scenario::ALL {
            let rows = scenario.run(&SimulationConfig::default()).unwrap();
            assert!(rows.iter().all(|r| r.control.abs() <= 2.0 + 1e-12));
        }
    }

    #[test]
    fn runs_diverge_only_through_the_integral_clamp() {
        let config = SimulationConfig::default();
        let base = Scenario::Baseline.run(&config).unwrap();
        let free = Scenario::NoAntiWindup.run(&config).unwrap();

        assert_eq!(base.len(), free.len());
        assert_eq!(base[0], free[0]);
        assert_ne!(base.last(), free.last());
    }

    #[test]
    fn measurement_drops_at_the_disturbance() {
        let config = SimulationConfig::default();
        let rows = Scenario::Baseline.run(&config).unwrap();
        let k = rows.iter().position(|r| r.time >= config.disturbance_time).unwrap();
        let jump = rows[k].measurement - rows[k - 1].measurement;
        assert!(jump < -0.15, "jump was {jump}");
    }
}
