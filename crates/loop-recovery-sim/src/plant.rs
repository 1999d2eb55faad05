//! First-order plant
//!
//! `dy/dt = -a*y + b*u`, discretized with forward Euler:
//! `y[k+1] = y[k] + dt * (-a*y[k] + b*u[k])`

use crate::SimError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstOrderPlant {
    a: f64,
    b: f64,
    dt: f64,
    y: f64,
}

impl FirstOrderPlant {
    pub fn new(a: f64, b: f64, dt_seconds: f64, y0: f64) -> Result<Self, SimError> {
        check_dt(dt_seconds)?;
        if !a.is_finite() || a < 0.0 {
            return Err(SimError::InvalidConfig(format!("a must be >= 0, got {a}")));
        }
        Ok(Self {
            a,
            b,
            dt: dt_seconds,
            y: y0,
        })
    }

    pub fn set_dt(&mut self, dt_seconds: f64) -> Result<(), SimError> {
        check_dt(dt_seconds)?;
        self.dt = dt_seconds;
        Ok(())
    }

    pub fn reset(&mut self, y0: f64) {
        self.y = y0;
    }

    /// Apply control input `u` for one step and return the new output.
    pub fn step(&mut self, u: f64) -> f64 {
        let dydt = -self.a * self.y + self.b * u;
        self.y += self.dt * dydt;
        self.y
    }

    pub fn output(&self) -> f64 {
        self.y
    }
}

pub(crate) fn check_dt(dt_seconds: f64) -> Result<(), SimError> {
    if dt_seconds.is_finite() && dt_seconds > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "dt_seconds must be > 0, got {dt_seconds}"
        )))
    }
}
