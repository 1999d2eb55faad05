use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize, Serializer};

use crate::pid::PidController;
use crate::plant::FirstOrderPlant;
use crate::SimError;

/// Runtime configuration for one closed-loop run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed controller/plant step [s]
    pub dt_seconds: f64,
    /// Simulated duration [s]
    pub duration_seconds: f64,
    /// Setpoint before the step
    pub setpoint_initial: f64,
    /// Setpoint after the step
    pub setpoint_step: f64,
    /// Time of the setpoint step [s]
    pub setpoint_step_time: f64,
    pub enable_disturbance: bool,
    /// Time the sensor bias is injected [s]
    pub disturbance_time: f64,
    /// Bias added to the measurement from `disturbance_time` on
    pub disturbance_offset: f64,
    /// Standard deviation of additive Gaussian measurement noise (0 disables it)
    pub measurement_noise_std: f64,
    /// RNG seed for the measurement noise
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt_seconds: 0.01,
            duration_seconds: 6.0,
            setpoint_initial: 0.0,
            setpoint_step: 1.0,
            setpoint_step_time: 1.0,
            enable_disturbance: true,
            disturbance_time: 3.5,
            disturbance_offset: -0.2,
            measurement_noise_std: 0.0,
            seed: 2026,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.dt_seconds.is_finite() || self.dt_seconds <= 0.0 {
            return Err(SimError::InvalidConfig(
                "dt_seconds must be finite and > 0".to_string(),
            ));
        }

        if !self.duration_seconds.is_finite() || self.duration_seconds < self.dt_seconds {
            return Err(SimError::InvalidConfig(
                "duration_seconds must be finite and >= dt_seconds".to_string(),
            ));
        }

        let finite_fields = [
            self.setpoint_initial,
            self.setpoint_step,
            self.setpoint_step_time,
            self.disturbance_time,
            self.disturbance_offset,
        ];
        if finite_fields.iter().any(|v| !v.is_finite()) {
            return Err(SimError::InvalidConfig(
                "setpoints, step time and disturbance parameters must be finite".to_string(),
            ));
        }

        if !self.measurement_noise_std.is_finite() || self.measurement_noise_std < 0.0 {
            return Err(SimError::InvalidConfig(
                "measurement_noise_std must be finite and >= 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Number of steps after t = 0; the run produces `steps() + 1` rows.
    pub fn steps(&self) -> usize {
        (self.duration_seconds / self.dt_seconds + 1e-9).floor() as usize
    }

    pub fn setpoint_at(&self, t: f64) -> f64 {
        if t >= self.setpoint_step_time {
            self.setpoint_step
        } else {
            self.setpoint_initial
        }
    }

    pub fn disturbance_at(&self, t: f64) -> f64 {
        if self.enable_disturbance && t >= self.disturbance_time {
            self.disturbance_offset
        } else {
            0.0
        }
    }
}

/// One sample of a closed-loop run. CSV columns are written with six
/// fixed decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRow {
    #[serde(serialize_with = "fixed6")]
    pub time: f64,
    #[serde(serialize_with = "fixed6")]
    pub setpoint: f64,
    #[serde(serialize_with = "fixed6")]
    pub measurement: f64,
    #[serde(serialize_with = "fixed6")]
    pub control: f64,
}

fn fixed6<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.6}"))
}

pub struct ControlLoop {
    controller: PidController,
    plant: FirstOrderPlant,
    config: SimulationConfig,
}

impl ControlLoop {
    pub fn new(
        controller: PidController,
        plant: FirstOrderPlant,
        config: SimulationConfig,
    ) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            controller,
            plant,
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the loop from t = 0 through `duration_seconds`.
    ///
    /// At each step the measurement (plant output plus any bias and noise) is
    /// recorded before the controller output is applied to the plant.
    pub fn run(mut self) -> Result<Vec<TraceRow>, SimError> {
        let cfg = &self.config;
        let steps = cfg.steps();
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let noise = if cfg.measurement_noise_std > 0.0 {
            Some(
                Normal::new(0.0, cfg.measurement_noise_std)
                    .map_err(|e| SimError::InvalidConfig(e.to_string()))?,
            )
        } else {
            None
        };

        let mut rows = Vec::with_capacity(steps + 1);
        for k in 0..=steps {
            let t = k as f64 * cfg.dt_seconds;
            let setpoint = cfg.setpoint_at(t);

            let mut measurement = self.plant.output() + cfg.disturbance_at(t);
            if let Some(noise) = &noise {
                measurement += noise.sample(&mut rng);
            }

            let u = self.controller.compute(setpoint, measurement);
            self.plant.step(u);

            rows.push(TraceRow {
                time: t,
                setpoint,
                measurement,
                control: u,
            });
        }

        tracing::debug!(
            rows = rows.len(),
            dt = cfg.dt_seconds,
            disturbance_time = cfg.disturbance_time,
            "closed-loop run complete"
        );

        Ok(rows)
    }
}
