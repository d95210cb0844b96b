//! Quadratic aerodynamic drag for a projectile moving through still air
use nalgebra::Vector2;

use crate::constants::{PhysicalConstants, MIN_VELOCITY_THRESHOLD};
use crate::drag_model::DragModel;

/// Cross-sectional area of a sphere of the given radius (m²)
pub fn cross_section_area(radius_m: f64) -> f64 {
    std::f64::consts::PI * radius_m.powi(2)
}

/// Drag force magnitude `½·ρ·v²·Cd·A` in newtons
pub fn drag_magnitude(speed: f64, constants: &PhysicalConstants) -> f64 {
    0.5 * constants.air_density * speed * speed * constants.drag_coefficient * constants.cross_section_area
}

/// Drag force vector opposing `velocity`.
///
/// A zero (or vanishing) velocity has no direction, so the force is zero for that
/// step rather than NaN.
pub fn drag_force(velocity: &Vector2<f64>, constants: &PhysicalConstants, model: DragModel) -> Vector2<f64> {
    if model == DragModel::Vacuum {
        return Vector2::zeros();
    }

    let speed = (velocity.x * velocity.x + velocity.y * velocity.y).sqrt();
    if speed < MIN_VELOCITY_THRESHOLD {
        return Vector2::zeros();
    }

    let fd = drag_magnitude(speed, constants);
    Vector2::new(-fd * (velocity.x / speed), -fd * (velocity.y / speed))
}

/// Acceleration from gravity plus drag.
///
/// Computed as `(F_drag - m·g) / m` on the vertical axis, matching the force balance
/// used throughout the integrator.
pub fn acceleration(velocity: &Vector2<f64>, constants: &PhysicalConstants, model: DragModel) -> Vector2<f64> {
    let force = drag_force(velocity, constants, model);
    let mass = constants.mass;
    Vector2::new(force.x / mass, (force.y - mass * constants.gravity) / mass)
}

/// Terminal velocity `√(m·g / (½·ρ·Cd·A))`, or `None` when there is no drag
pub fn terminal_velocity(constants: &PhysicalConstants) -> Option<f64> {
    let k = constants.drag_factor();
    if k <= 0.0 {
        return None;
    }
    Some((constants.mass * constants.gravity / k).sqrt())
}
