use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{PhysicalConstants, GRID_EPSILON};
use crate::error::{Result, TrajectoryError};
use crate::fast_trajectory::{integrate, IntegratorConfig};
use crate::LaunchParameters;

/// Largest sweep accepted in one search
const MAX_SWEEP_POINTS: usize = 1_000_000;

/// Angle sweep settings for the optimal angle search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub lo_angle_deg: f64,
    pub hi_angle_deg: f64,
    pub angle_step_deg: f64,
    /// Integration time step used for every candidate angle (s)
    pub time_step_s: f64,
    /// Keep the full `(angle, range)` sweep in the result
    pub include_sweep: bool,
    /// Evaluate candidate angles on the rayon pool
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lo_angle_deg: 5.0,
            hi_angle_deg: 89.0,
            angle_step_deg: 1.0,
            time_step_s: 0.01,
            include_sweep: false,
            parallel: false,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        check_grid(self.lo_angle_deg, self.hi_angle_deg, self.angle_step_deg)?;
        if !self.time_step_s.is_finite() || self.time_step_s <= 0.0 {
            return Err(TrajectoryError::invalid("time_step_s", self.time_step_s, "must be finite and > 0"));
        }
        Ok(())
    }
}

fn check_grid(lo: f64, hi: f64, step: f64) -> Result<()> {
    if !lo.is_finite() {
        return Err(TrajectoryError::invalid("lo_angle_deg", lo, "must be finite"));
    }
    if !hi.is_finite() || hi < lo {
        return Err(TrajectoryError::invalid(
            "hi_angle_deg",
            hi,
            format!("must be finite and >= lo_angle_deg ({lo})"),
        ));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(TrajectoryError::invalid("angle_step_deg", step, "must be finite and > 0"));
    }
    if (hi - lo) / step >= MAX_SWEEP_POINTS as f64 {
        return Err(TrajectoryError::invalid(
            "angle_step_deg",
            step,
            format!("sweep would exceed {MAX_SWEEP_POINTS} angles"),
        ));
    }
    Ok(())
}

/// One evaluated candidate of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub angle_deg: f64,
    pub range: f64,
}

/// Result of an angle sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalAngleResult {
    /// Angle with the largest range (degrees)
    pub angle: f64,
    pub max_range: f64,
    /// Every evaluated angle in ascending order, when requested
    pub sweep: Option<Vec<SweepPoint>>,
    #[serde(default)]
    best_index: usize,
}

impl OptimalAngleResult {
    /// Sweep points within `k` grid steps of the optimum, the optimum included.
    ///
    /// Empty when the sweep was not kept.
    pub fn neighbourhood(&self, k: usize) -> &[SweepPoint] {
        match &self.sweep {
            Some(sweep) if !sweep.is_empty() => {
                let best = self.best_index.min(sweep.len() - 1);
                let start = best.saturating_sub(k);
                let end = (best + k + 1).min(sweep.len());
                &sweep[start..end]
            }
            _ => &[],
        }
    }
}

/// Candidate angles `lo, lo + step, ...` up to and including `hi`.
///
/// `hi` is appended when the grid does not land on it; a last grid point within rounding
/// of `hi` is snapped to it. Grids of `MAX_SWEEP_POINTS` or more angles are rejected.
pub fn sweep_angles(lo: f64, hi: f64, step: f64) -> Result<Vec<f64>> {
    check_grid(lo, hi, step)?;
    let n = ((hi - lo) / step + GRID_EPSILON).floor() as usize;
    let mut angles: Vec<f64> = (0..=n).map(|i| (lo + i as f64 * step).min(hi)).collect();
    let last = angles[angles.len() - 1];
    if hi - last > step * 1e-6 || (angles.len() == 1 && hi > last) {
        angles.push(hi);
    } else if let Some(last) = angles.last_mut() {
        *last = hi;
    }
    Ok(angles)
}

/// Exhaustive grid search for the launch angle with the longest numeric range.
///
/// Angles are scanned in ascending order and only a strictly longer range replaces the
/// current best, so on an exact tie the lowest angle wins. The parallel mode evaluates
/// the same grid and reduces it in the same order, giving an identical result.
pub fn find_optimal_angle(
    speed: f64,
    constants: &PhysicalConstants,
    search: &SearchConfig,
    integrator: &IntegratorConfig,
) -> Result<OptimalAngleResult> {
    if !speed.is_finite() || speed < 0.0 {
        return Err(TrajectoryError::invalid("speed", speed, "must be finite and >= 0"));
    }
    search.validate()?;
    constants.validate()?;

    let integrator = integrator.with_time_step(search.time_step_s);
    integrator.validate()?;

    let angles = sweep_angles(search.lo_angle_deg, search.hi_angle_deg, search.angle_step_deg)?;

    let evaluate = |&angle_deg: &f64| -> Result<SweepPoint> {
        let result = integrate(&LaunchParameters::new(angle_deg, speed), constants, &integrator)?;
        trace!("sweep: angle={angle_deg:.4} deg range={:.4} m", result.range());
        Ok(SweepPoint {
            angle_deg,
            range: result.range(),
        })
    };

    let sweep: Vec<SweepPoint> = if search.parallel {
        angles.par_iter().map(evaluate).collect::<Result<Vec<_>>>()?
    } else {
        angles.iter().map(evaluate).collect::<Result<Vec<_>>>()?
    };

    let mut best_index = 0;
    for (i, point) in sweep.iter().enumerate().skip(1) {
        if point.range > sweep[best_index].range {
            best_index = i;
        }
    }
    let best = sweep[best_index];

    debug!(
        "optimal angle: speed={speed:.2} m/s sweep=[{}, {}] step={} angles={} -> {:.4} deg, {:.4} m",
        search.lo_angle_deg,
        search.hi_angle_deg,
        search.angle_step_deg,
        sweep.len(),
        best.angle_deg,
        best.range
    );

    Ok(OptimalAngleResult {
        angle: best.angle_deg,
        max_range: best.range,
        sweep: search.include_sweep.then_some(sweep),
        best_index,
    })
}
