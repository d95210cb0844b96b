// Service API module - the stable entry point for UI and renderer collaborators
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::angle_calculations::{find_optimal_angle, OptimalAngleResult, SearchConfig};
use crate::constants::PhysicalConstants;
use crate::error::{Result, TrajectoryError};
use crate::fast_trajectory::{integrate, IntegratorConfig};
use crate::trajectory_sampling::TrajectoryResult;
use crate::trajectory_solver::{solve_analytic, AnalyticConfig};

// Launch request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParameters {
    pub angle_degrees: f64, // above horizontal
    pub speed: f64,         // m/s
}

impl LaunchParameters {
    pub fn new(angle_degrees: f64, speed: f64) -> Self {
        Self { angle_degrees, speed }
    }

    /// Initial `(v0x, v0y)` in m/s
    pub fn velocity_components(&self) -> (f64, f64) {
        let theta = self.angle_degrees.to_radians();
        (self.speed * theta.cos(), self.speed * theta.sin())
    }

    /// Checks shared by every solver regardless of configured limits
    pub(crate) fn validate_finite(&self) -> Result<()> {
        if !self.angle_degrees.is_finite() {
            return Err(TrajectoryError::invalid("angle_degrees", self.angle_degrees, "must be finite"));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(TrajectoryError::invalid("speed", self.speed, "must be finite and >= 0"));
        }
        Ok(())
    }
}

// Operating range for launch requests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchLimits {
    pub min_angle_deg: f64,
    pub max_angle_deg: f64,
    pub min_speed_mps: f64,
    pub max_speed_mps: f64,
}

impl Default for LaunchLimits {
    fn default() -> Self {
        Self {
            min_angle_deg: 0.0,
            max_angle_deg: 90.0,
            min_speed_mps: 0.0,
            max_speed_mps: 1000.0,
        }
    }
}

impl LaunchLimits {
    /// Range offered by the interactive front end
    pub fn interactive() -> Self {
        Self {
            min_angle_deg: 5.0,
            max_angle_deg: 89.0,
            min_speed_mps: 5.0,
            max_speed_mps: 50.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_angle_deg.is_finite() || !self.max_angle_deg.is_finite() || self.min_angle_deg > self.max_angle_deg {
            return Err(TrajectoryError::invalid(
                "max_angle_deg",
                self.max_angle_deg,
                format!("must be finite and >= min_angle_deg ({})", self.min_angle_deg),
            ));
        }
        if !self.min_speed_mps.is_finite() || self.min_speed_mps < 0.0 {
            return Err(TrajectoryError::invalid("min_speed_mps", self.min_speed_mps, "must be finite and >= 0"));
        }
        if !self.max_speed_mps.is_finite() || self.max_speed_mps < self.min_speed_mps {
            return Err(TrajectoryError::invalid(
                "max_speed_mps",
                self.max_speed_mps,
                format!("must be finite and >= min_speed_mps ({})", self.min_speed_mps),
            ));
        }
        Ok(())
    }

    pub fn check_angle(&self, angle_degrees: f64) -> Result<()> {
        if !angle_degrees.is_finite() || angle_degrees < self.min_angle_deg || angle_degrees > self.max_angle_deg {
            return Err(TrajectoryError::invalid(
                "angle_degrees",
                angle_degrees,
                format!("must be within [{}, {}]", self.min_angle_deg, self.max_angle_deg),
            ));
        }
        Ok(())
    }

    pub fn check_speed(&self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed < self.min_speed_mps || speed > self.max_speed_mps {
            return Err(TrajectoryError::invalid(
                "speed",
                speed,
                format!("must be within [{}, {}]", self.min_speed_mps, self.max_speed_mps),
            ));
        }
        Ok(())
    }

    /// Reject a launch outside the operating range
    pub fn check(&self, params: &LaunchParameters) -> Result<()> {
        self.check_angle(params.angle_degrees)?;
        self.check_speed(params.speed)
    }

    /// Pull a launch into the operating range, for input fields that correct the user
    /// instead of failing. Non-finite values fall back to the lower bound.
    pub fn clamp(&self, params: &LaunchParameters) -> LaunchParameters {
        fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
            if value.is_finite() {
                value.clamp(lo, hi)
            } else {
                lo
            }
        }
        LaunchParameters {
            angle_degrees: clamp_finite(params.angle_degrees, self.min_angle_deg, self.max_angle_deg),
            speed: clamp_finite(params.speed, self.min_speed_mps, self.max_speed_mps),
        }
    }
}

// Full engine configuration, loadable from JSON
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub constants: PhysicalConstants,
    pub limits: LaunchLimits,
    pub analytic: AnalyticConfig,
    pub integrator: IntegratorConfig,
    pub search: SearchConfig,
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json).map_err(|e| TrajectoryError::Config {
            context: "json".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TrajectoryError::Config {
            context: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            TrajectoryError::Config { message, .. } => TrajectoryError::Config {
                context: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.constants.validate()?;
        self.limits.validate()?;
        self.analytic.validate()?;
        self.integrator.validate()?;
        self.search.validate()
    }
}

// Analytic and numeric results for one launch, side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub params: LaunchParameters,
    pub analytic: TrajectoryResult,
    pub numeric: TrajectoryResult,
}

impl Comparison {
    /// Range lost to drag, as a fraction of the drag-free range
    pub fn range_loss_fraction(&self) -> f64 {
        if self.analytic.range() <= 0.0 {
            return 0.0;
        }
        1.0 - self.numeric.range() / self.analytic.range()
    }
}

/// Stateless facade over the analytic solver, the integrator and the angle search.
///
/// Holds only read-only configuration, so one instance can be shared across threads
/// and called any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrajectoryService {
    constants: PhysicalConstants,
    limits: LaunchLimits,
    analytic: AnalyticConfig,
    integrator: IntegratorConfig,
}

impl TrajectoryService {
    pub fn new(constants: PhysicalConstants) -> Result<Self> {
        constants.validate()?;
        Ok(Self {
            constants,
            ..Self::default()
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            constants: config.constants,
            limits: config.limits,
            analytic: config.analytic,
            integrator: config.integrator,
        })
    }

    pub fn with_limits(self, limits: LaunchLimits) -> Result<Self> {
        limits.validate()?;
        Ok(Self { limits, ..self })
    }

    pub fn with_analytic_config(self, analytic: AnalyticConfig) -> Result<Self> {
        analytic.validate()?;
        Ok(Self { analytic, ..self })
    }

    pub fn with_integrator_config(self, integrator: IntegratorConfig) -> Result<Self> {
        integrator.validate()?;
        Ok(Self { integrator, ..self })
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    pub fn limits(&self) -> &LaunchLimits {
        &self.limits
    }

    pub fn integrator_config(&self) -> &IntegratorConfig {
        &self.integrator
    }

    fn check_launch(&self, params: &LaunchParameters) -> Result<()> {
        self.limits.check(params)?;
        if params.speed == 0.0 {
            warn!("launch with zero speed, trajectory is the launch point only");
        }
        if params.angle_degrees <= 0.0 || params.angle_degrees >= 90.0 {
            warn!("degenerate launch angle {} deg", params.angle_degrees);
        }
        Ok(())
    }

    /// Drag-free trajectory with the exact closed-form range
    pub fn compute_analytic(&self, params: &LaunchParameters) -> Result<TrajectoryResult> {
        self.check_launch(params)?;
        solve_analytic(params, &self.constants, &self.analytic)
    }

    /// Drag-affected trajectory integrated with time step `dt`
    pub fn compute_numeric(&self, params: &LaunchParameters, dt: f64) -> Result<TrajectoryResult> {
        self.check_launch(params)?;
        integrate(params, &self.constants, &self.integrator.with_time_step(dt))
    }

    /// Numeric trajectory with the configured default time step
    pub fn compute_numeric_default(&self, params: &LaunchParameters) -> Result<TrajectoryResult> {
        self.compute_numeric(params, self.integrator.time_step_s)
    }

    /// Both trajectories for the same launch
    pub fn compare(&self, params: &LaunchParameters, dt: f64) -> Result<Comparison> {
        let analytic = self.compute_analytic(params)?;
        let numeric = self.compute_numeric(params, dt)?;
        debug!(
            "compare: analytic range={:.3} m numeric range={:.3} m",
            analytic.range(), numeric.range()
        );
        Ok(Comparison {
            params: *params,
            analytic,
            numeric,
        })
    }

    /// Launch angle maximizing the numeric range at `speed`
    pub fn find_optimal_angle(&self, speed: f64, search: &SearchConfig) -> Result<OptimalAngleResult> {
        self.limits.check_speed(speed)?;
        search.validate()?;
        self.limits.check_angle(search.lo_angle_deg)?;
        self.limits.check_angle(search.hi_angle_deg)?;
        find_optimal_angle(speed, &self.constants, search, &self.integrator)
    }
}
