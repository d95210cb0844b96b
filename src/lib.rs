//! # Projectile Engine
//!
//! Two-dimensional projectile trajectories for a ball launched from a fixed height:
//! a closed-form drag-free solver, a fixed-step Euler integrator with quadratic air
//! drag, and a grid search for the launch angle that maximizes drag-affected range.
//!
//! ```no_run
//! use projectile_engine::{LaunchParameters, TrajectoryService};
//!
//! let service = TrajectoryService::default();
//! let launch = LaunchParameters::new(45.0, 20.0);
//! let numeric = service.compute_numeric(&launch, 0.01)?;
//! let analytic = service.compute_analytic(&launch)?;
//! assert!(numeric.range() < analytic.range());
//! # Ok::<(), projectile_engine::TrajectoryError>(())
//! ```

// Re-export the main types and functions
pub use angle_calculations::{find_optimal_angle, sweep_angles, OptimalAngleResult, SearchConfig, SweepPoint};
pub use constants::{PhysicalConstants, REFERENCE_BALL};
pub use drag::terminal_velocity;
pub use drag_model::DragModel;
pub use error::{Result, TrajectoryError};
pub use fast_trajectory::{integrate, IntegratorConfig};
pub use service::{Comparison, EngineConfig, LaunchLimits, LaunchParameters, TrajectoryService};
pub use trajectory_sampling::{find_apex, resample_by_distance, TrajectoryResult, TrajectorySample};
pub use trajectory_solver::{
    analytic_apex_height, analytic_range, analytic_time_of_flight, drag_free_optimal_angle_deg, solve_analytic,
    AnalyticConfig,
};

// Module declarations
pub mod constants;
pub mod drag;
mod drag_model;
mod error;
mod trajectory_sampling;
mod trajectory_solver;
mod fast_trajectory;
mod angle_calculations;
mod service;
