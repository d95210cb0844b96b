//! Error types for the trajectory engine.

use std::error::Error;
use std::fmt;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, TrajectoryError>;

/// Errors reported synchronously by every engine operation. No partial results
/// accompany an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// An input is outside its valid domain or not finite.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// What the value should have been.
        reason: String,
    },
    /// Numeric integration hit a runaway bound before the projectile came down.
    NonConvergence {
        /// Which bound stopped the integration.
        bound: &'static str,
        /// Horizontal distance reached when the bound tripped.
        x: f64,
        /// Simulated time when the bound tripped.
        t: f64,
    },
    /// Loading an engine configuration failed.
    Config {
        /// Where the configuration came from.
        context: String,
        /// The underlying read or parse error.
        message: String,
    },
}

impl TrajectoryError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        TrajectoryError::InvalidParameter {
            name,
            value,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrajectoryError::InvalidParameter { name, value, reason } => {
                write!(f, "invalid parameter {name} = {value}: {reason}")
            }
            TrajectoryError::NonConvergence { bound, x, t } => write!(
                f,
                "integration did not reach the ground: {bound} exceeded at x = {x:.2} m, t = {t:.2} s"
            ),
            TrajectoryError::Config { context, message } => {
                write!(f, "failed to load config from {context}: {message}")
            }
        }
    }
}

impl Error for TrajectoryError {}
