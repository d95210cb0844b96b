//! Physical constants and numerical thresholds used by the trajectory engine
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};

/// Gravitational acceleration in m/s² used by the reference setup
pub const G_ACCEL_MPS2: f64 = 9.81;

/// Standard air density at sea level (kg/m³)
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// Drag coefficient of a smooth sphere in the subcritical regime
pub const SPHERE_DRAG_COEFFICIENT: f64 = 0.47;

/// Radius of the reference ball (10 cm diameter)
pub const REFERENCE_BALL_RADIUS_M: f64 = 0.05;

/// Mass of the reference ball in kg
pub const REFERENCE_BALL_MASS_KG: f64 = 0.2;

/// Launch height above ground of the reference setup in m
pub const REFERENCE_LAUNCH_HEIGHT_M: f64 = 2.5;

// Numerical stability constants
/// Velocity magnitude below which drag is treated as zero
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-12;

/// Slack used when counting grid steps so that `(hi - lo) / step` landing a hair
/// below an integer still includes the last grid point
pub const GRID_EPSILON: f64 = 1e-9;

/// Most time steps a single solve may take, bounds `max_time_s / time_step_s`
pub const MAX_INTEGRATION_STEPS: f64 = 1e7;

/// Reference ball used by the CLI and by `PhysicalConstants::default()`.
///
/// Area is derived from the radius, so this cannot be a `const`.
pub static REFERENCE_BALL: Lazy<PhysicalConstants> = Lazy::new(|| PhysicalConstants {
    gravity: G_ACCEL_MPS2,
    air_density: STANDARD_AIR_DENSITY,
    drag_coefficient: SPHERE_DRAG_COEFFICIENT,
    cross_section_area: crate::drag::cross_section_area(REFERENCE_BALL_RADIUS_M),
    mass: REFERENCE_BALL_MASS_KG,
    launch_height: REFERENCE_LAUNCH_HEIGHT_M,
});

/// Environmental and projectile parameters shared by every computation.
///
/// Read-only once built; every solver takes it by reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// m/s², must be > 0
    pub gravity: f64,
    /// kg/m³, must be >= 0
    pub air_density: f64,
    /// dimensionless, must be >= 0
    pub drag_coefficient: f64,
    /// m², must be > 0
    pub cross_section_area: f64,
    /// kg, must be > 0
    pub mass: f64,
    /// m, must be >= 0
    pub launch_height: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        *REFERENCE_BALL
    }
}

impl PhysicalConstants {
    /// Build and validate a set of constants.
    pub fn new(
        gravity: f64,
        air_density: f64,
        drag_coefficient: f64,
        cross_section_area: f64,
        mass: f64,
        launch_height: f64,
    ) -> Result<Self> {
        let constants = Self {
            gravity,
            air_density,
            drag_coefficient,
            cross_section_area,
            mass,
            launch_height,
        };
        constants.validate()?;
        Ok(constants)
    }

    /// Build constants for a spherical projectile of the given radius.
    pub fn for_sphere(
        gravity: f64,
        air_density: f64,
        drag_coefficient: f64,
        radius_m: f64,
        mass: f64,
        launch_height: f64,
    ) -> Result<Self> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(TrajectoryError::invalid("radius", radius_m, "must be finite and > 0"));
        }
        Self::new(
            gravity,
            air_density,
            drag_coefficient,
            crate::drag::cross_section_area(radius_m),
            mass,
            launch_height,
        )
    }

    /// Same constants with drag switched off (Cd = 0).
    pub fn without_drag(&self) -> Self {
        Self {
            drag_coefficient: 0.0,
            ..*self
        }
    }

    pub fn with_launch_height(&self, launch_height: f64) -> Self {
        Self {
            launch_height,
            ..*self
        }
    }

    pub fn with_air_density(&self, air_density: f64) -> Self {
        Self {
            air_density,
            ..*self
        }
    }

    pub fn with_drag_coefficient(&self, drag_coefficient: f64) -> Self {
        Self {
            drag_coefficient,
            ..*self
        }
    }

    /// Check every field against its physical domain.
    pub fn validate(&self) -> Result<()> {
        positive("gravity", self.gravity)?;
        non_negative("air_density", self.air_density)?;
        non_negative("drag_coefficient", self.drag_coefficient)?;
        positive("cross_section_area", self.cross_section_area)?;
        positive("mass", self.mass)?;
        non_negative("launch_height", self.launch_height)?;
        Ok(())
    }

    /// Combined drag factor `½·ρ·Cd·A`, multiply by v² for the drag force.
    pub fn drag_factor(&self) -> f64 {
        0.5 * self.air_density * self.drag_coefficient * self.cross_section_area
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TrajectoryError::invalid(name, value, "must be finite and > 0"));
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TrajectoryError::invalid(name, value, "must be finite and >= 0"));
    }
    Ok(())
}
