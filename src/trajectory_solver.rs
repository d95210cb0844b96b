//! Closed-form drag-free trajectory.
//!
//! Drag is ignored entirely here; only gravity and launch height matter. The reported
//! range always comes from the closed form, the samples are for plotting only.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::constants::{PhysicalConstants, GRID_EPSILON, MAX_INTEGRATION_STEPS};
use crate::error::{Result, TrajectoryError};
use crate::trajectory_sampling::{TrajectoryRecorder, TrajectoryResult};
use crate::LaunchParameters;

/// Sampling settings for the analytic solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticConfig {
    /// Time between plotted samples (s)
    pub time_step_s: f64,
    /// Hard cap on sampled time (s)
    pub max_time_s: f64,
}

impl Default for AnalyticConfig {
    fn default() -> Self {
        Self {
            time_step_s: 0.02,
            max_time_s: 10.0,
        }
    }
}

impl AnalyticConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.time_step_s.is_finite() || self.time_step_s <= 0.0 {
            return Err(TrajectoryError::invalid("time_step_s", self.time_step_s, "must be finite and > 0"));
        }
        if !self.max_time_s.is_finite() || self.max_time_s <= 0.0 {
            return Err(TrajectoryError::invalid("max_time_s", self.max_time_s, "must be finite and > 0"));
        }
        if self.max_time_s / self.time_step_s > MAX_INTEGRATION_STEPS {
            return Err(TrajectoryError::invalid(
                "time_step_s",
                self.time_step_s,
                format!("more than {MAX_INTEGRATION_STEPS} samples to reach max_time_s ({})", self.max_time_s),
            ));
        }
        Ok(())
    }
}

/// Ground-level range `(v0x/g)·(v0y + √(v0y² + 2·g·h))`.
///
/// The discriminant is never negative for `h >= 0`, which `PhysicalConstants` enforces.
pub fn analytic_range(params: &LaunchParameters, constants: &PhysicalConstants) -> f64 {
    let (v0x, v0y) = params.velocity_components();
    let g = constants.gravity;
    (v0x / g) * (v0y + (v0y * v0y + 2.0 * g * constants.launch_height).sqrt())
}

/// Time until the projectile returns to ground level
pub fn analytic_time_of_flight(params: &LaunchParameters, constants: &PhysicalConstants) -> f64 {
    let (_, v0y) = params.velocity_components();
    let g = constants.gravity;
    (v0y + (v0y * v0y + 2.0 * g * constants.launch_height).sqrt()) / g
}

/// Height of the apex, `h + v0y²/(2g)`, or just `h` without an upward component
pub fn analytic_apex_height(params: &LaunchParameters, constants: &PhysicalConstants) -> f64 {
    let (_, v0y) = params.velocity_components();
    if v0y <= 0.0 {
        return constants.launch_height;
    }
    constants.launch_height + v0y * v0y / (2.0 * constants.gravity)
}

/// Launch angle maximizing drag-free range from height `h`: `atan(v / √(v² + 2·g·h))`.
///
/// Exactly 45° at ground level.
pub fn drag_free_optimal_angle_deg(speed: f64, constants: &PhysicalConstants) -> Result<f64> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(TrajectoryError::invalid("speed", speed, "must be finite and > 0"));
    }
    constants.validate()?;

    let denom = (speed * speed + 2.0 * constants.gravity * constants.launch_height).sqrt();
    Ok((speed / denom).atan().to_degrees())
}

/// Sample the drag-free trajectory at a fixed time step.
///
/// Sampling stops at the first instant below ground (that instant is not kept and is
/// reported as the flight time) or at `config.max_time_s`.
pub fn solve_analytic(
    params: &LaunchParameters,
    constants: &PhysicalConstants,
    config: &AnalyticConfig,
) -> Result<TrajectoryResult> {
    params.validate_finite()?;
    constants.validate()?;
    config.validate()?;

    let h = constants.launch_height;
    if params.speed == 0.0 {
        warn!("analytic solve with zero speed, returning launch point only");
        let mut recorder = TrajectoryRecorder::new(h, 1);
        recorder.push(0.0, h);
        return Ok(recorder.finish(0.0, 0.0));
    }

    let (v0x, v0y) = params.velocity_components();
    let g = constants.gravity;
    let dt = config.time_step_s;
    let range = analytic_range(params, constants);

    let max_steps = (config.max_time_s / dt + GRID_EPSILON).floor() as usize;
    let expected = ((analytic_time_of_flight(params, constants) / dt).ceil() as usize).saturating_add(2);
    let mut recorder = TrajectoryRecorder::new(h, expected.min(max_steps.saturating_add(1)));

    let mut flight_time = 0.0;
    for i in 0..=max_steps {
        let t = i as f64 * dt;
        let x = v0x * t;
        let y = h + v0y * t - 0.5 * g * t * t;
        flight_time = t;
        if y < 0.0 {
            break;
        }
        recorder.push(x, y);
    }

    let result = recorder.finish(range, flight_time);
    debug!(
        "analytic: angle={:.2} deg speed={:.2} m/s range={:.3} m max_height={:.3} m t={:.2} s samples={}",
        params.angle_degrees,
        params.speed,
        result.range(),
        result.max_height(),
        result.flight_time(),
        result.len()
    );
    Ok(result)
}
