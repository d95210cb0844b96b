//! Fixed-step trajectory integrator with quadratic drag.
//!
//! Explicit (forward) Euler: each step updates velocity from the current acceleration,
//! then position from the new velocity. Accuracy is first order in the time step and
//! there is no adaptive step control; callers wanting more precision pass a smaller
//! `time_step_s`.

use log::{debug, warn};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::constants::{PhysicalConstants, GRID_EPSILON, MAX_INTEGRATION_STEPS};
use crate::drag::acceleration;
use crate::drag_model::DragModel;
use crate::error::{Result, TrajectoryError};
use crate::trajectory_sampling::{TrajectoryRecorder, TrajectoryResult};
use crate::LaunchParameters;

/// Upper bound on samples reserved up front, the vector grows past it if needed
const MAX_PREALLOCATED_SAMPLES: usize = 1 << 16;

/// Fixed-step integration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Integration time step (s)
    pub time_step_s: f64,
    /// Runaway bound on horizontal distance (m)
    pub max_distance_m: f64,
    /// Runaway bound on simulated time (s)
    pub max_time_s: f64,
    pub drag_model: DragModel,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            time_step_s: 0.01,
            max_distance_m: 2000.0,
            max_time_s: 600.0,
            drag_model: DragModel::Quadratic,
        }
    }
}

impl IntegratorConfig {
    pub fn with_time_step(self, time_step_s: f64) -> Self {
        Self { time_step_s, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.time_step_s.is_finite() || self.time_step_s <= 0.0 {
            return Err(TrajectoryError::invalid("time_step_s", self.time_step_s, "must be finite and > 0"));
        }
        if !self.max_distance_m.is_finite() || self.max_distance_m <= 0.0 {
            return Err(TrajectoryError::invalid("max_distance_m", self.max_distance_m, "must be finite and > 0"));
        }
        if !self.max_time_s.is_finite() || self.max_time_s < self.time_step_s {
            return Err(TrajectoryError::invalid(
                "max_time_s",
                self.max_time_s,
                "must be finite and at least one time step",
            ));
        }
        if self.max_time_s / self.time_step_s > MAX_INTEGRATION_STEPS {
            return Err(TrajectoryError::invalid(
                "time_step_s",
                self.time_step_s,
                format!("more than {MAX_INTEGRATION_STEPS} steps to reach max_time_s ({})", self.max_time_s),
            ));
        }
        Ok(())
    }
}

/// Integrate a trajectory under gravity and drag until it crosses the ground.
///
/// The state before every step is recorded, and the state that first drops below
/// ground is recorded last; its `x` is the reported range. Hitting either runaway
/// bound first is a `NonConvergence` error, never a truncated trajectory.
pub fn integrate(
    params: &LaunchParameters,
    constants: &PhysicalConstants,
    config: &IntegratorConfig,
) -> Result<TrajectoryResult> {
    params.validate_finite()?;
    constants.validate()?;
    config.validate()?;

    let h = constants.launch_height;
    if params.speed == 0.0 {
        warn!("numeric solve with zero speed, returning launch point only");
        let mut recorder = TrajectoryRecorder::new(h, 1);
        recorder.push(0.0, h);
        return Ok(recorder.finish(0.0, 0.0));
    }

    let dt = config.time_step_s;
    let (v0x, v0y) = params.velocity_components();
    let mut position = Vector2::new(0.0, h);
    let mut velocity = Vector2::new(v0x, v0y);

    let max_steps = (config.max_time_s / dt + GRID_EPSILON).floor() as usize;
    let drag_free_tof = crate::trajectory_solver::analytic_time_of_flight(params, constants);
    let expected = ((drag_free_tof / dt).ceil() as usize)
        .min(max_steps)
        .saturating_add(2)
        .min(MAX_PREALLOCATED_SAMPLES);
    let mut recorder = TrajectoryRecorder::new(h, expected);

    let mut steps = 0usize;
    while position.y >= 0.0 {
        if position.x > config.max_distance_m {
            return Err(TrajectoryError::NonConvergence {
                bound: "max_distance_m",
                x: position.x,
                t: steps as f64 * dt,
            });
        }
        if steps >= max_steps {
            return Err(TrajectoryError::NonConvergence {
                bound: "max_time_s",
                x: position.x,
                t: steps as f64 * dt,
            });
        }

        recorder.push(position.x, position.y);

        let accel = acceleration(&velocity, constants, config.drag_model);
        velocity += accel * dt;
        position += velocity * dt;
        steps += 1;
    }

    recorder.push(position.x, position.y);
    let result = recorder.finish(position.x, steps as f64 * dt);

    debug!(
        "numeric: angle={:.2} deg speed={:.2} m/s dt={} drag={} range={:.3} m max_height={:.3} m t={:.2} s steps={}",
        params.angle_degrees,
        params.speed,
        dt,
        config.drag_model,
        result.range(),
        result.max_height(),
        result.flight_time(),
        steps
    );
    Ok(result)
}
