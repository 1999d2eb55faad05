//! PID controller with optional output saturation and integral clamping
//!
//! Clamping the integral state to `integral_limits` is the anti-windup
//! mechanism; leaving it unset lets the integral grow while the output is
//! saturated.

use serde::{Deserialize, Serialize};

use crate::plant::check_dt;
use crate::SimError;

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    pub fn new(min: f64, max: f64) -> Result<Self, SimError> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(SimError::InvalidConfig(format!(
                "limits must be finite with min <= max, got [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    /// Symmetric `[-bound, bound]`
    pub fn symmetric(bound: f64) -> Result<Self, SimError> {
        Self::new(-bound, bound)
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PidController {
    kp: f64,
    ki: f64,
    kd: f64,
    dt: f64,
    integral: f64,
    previous_error: f64,
    output_limits: Option<Limits>,
    integral_limits: Option<Limits>,
}

impl PidController {
    pub fn new(kp: f64, ki: f64, kd: f64, dt_seconds: f64) -> Result<Self, SimError> {
        check_dt(dt_seconds)?;
        Ok(Self {
            kp,
            ki,
            kd,
            dt: dt_seconds,
            integral: 0.0,
            previous_error: 0.0,
            output_limits: None,
            integral_limits: None,
        })
    }

    pub fn set_gains(&mut self, kp: f64, ki: f64, kd: f64) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    pub fn set_dt(&mut self, dt_seconds: f64) -> Result<(), SimError> {
        check_dt(dt_seconds)?;
        self.dt = dt_seconds;
        Ok(())
    }

    pub fn set_output_limits(&mut self, limits: Option<Limits>) {
        self.output_limits = limits;
    }

    pub fn set_integral_limits(&mut self, limits: Option<Limits>) {
        self.integral_limits = limits;
    }

    pub fn with_output_limits(mut self, limits: Option<Limits>) -> Self {
        self.set_output_limits(limits);
        self
    }

    pub fn with_integral_limits(mut self, limits: Option<Limits>) -> Self {
        self.set_integral_limits(limits);
        self
    }

    pub fn reset(&mut self, integral: f64, previous_error: f64) {
        self.integral = integral;
        self.previous_error = previous_error;
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// One control update; returns the (possibly saturated) actuator command.
    pub fn compute(&mut self, setpoint: f64, measurement: f64) -> f64 {
        let error = setpoint - measurement;

        self.integral += error * self.dt;
        if let Some(limits) = self.integral_limits {
            self.integral = limits.clamp(self.integral);
        }

        let derivative = (error - self.previous_error) / self.dt;
        self.previous_error = error;

        let u = self.kp * error + self.ki * self.integral + self.kd * derivative;
        match self.output_limits {
            Some(limits) => limits.clamp(u),
            None => u,
        }
    }
}
