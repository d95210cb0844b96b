use serde::{Deserialize, Serialize};

/// Single trajectory sample point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Horizontal distance from the launch point (m)
    pub x: f64,
    /// Height above ground (m)
    pub y: f64,
}

impl TrajectorySample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Trajectory plus scalar summaries.
///
/// Samples are in time order and start at the launch point. Only the last sample may
/// sit below ground (the step that crossed it). `range` is not necessarily the `x` of
/// the last sample: the analytic solver reports its exact closed-form range here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    samples: Vec<TrajectorySample>,
    range: f64,
    max_height: f64,
    flight_time: f64,
}

impl TrajectoryResult {
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Horizontal distance to the ground crossing (m)
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Highest point reached, never below the launch height (m)
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Time until the ground crossing (s)
    pub fn flight_time(&self) -> f64 {
        self.flight_time
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }
}

/// Accumulates samples for a solver and tracks the running maximum height.
#[derive(Debug)]
pub(crate) struct TrajectoryRecorder {
    samples: Vec<TrajectorySample>,
    max_height: f64,
}

impl TrajectoryRecorder {
    pub(crate) fn new(launch_height: f64, capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            max_height: launch_height,
        }
    }

    pub(crate) fn push(&mut self, x: f64, y: f64) {
        if y > self.max_height {
            self.max_height = y;
        }
        self.samples.push(TrajectorySample { x, y });
    }

    pub(crate) fn finish(self, range: f64, flight_time: f64) -> TrajectoryResult {
        TrajectoryResult {
            samples: self.samples,
            range,
            max_height: self.max_height,
            flight_time,
        }
    }
}

/// Find the highest sample, returns `(max_height, x_at_max_height)`
pub fn find_apex(samples: &[TrajectorySample]) -> Option<(f64, f64)> {
    samples
        .iter()
        .fold(None, |best: Option<TrajectorySample>, s| match best {
            Some(b) if b.y >= s.y => Some(b),
            _ => Some(*s),
        })
        .map(|s| (s.y, s.x))
}

/// Resample a trajectory at regular horizontal intervals for plotting.
///
/// Heights are linearly interpolated between the stored samples. Sampling stops at the
/// last stored `x`, so the final interpolated point may lie on the below-ground segment.
pub fn resample_by_distance(result: &TrajectoryResult, step_m: f64) -> Vec<TrajectorySample> {
    if !step_m.is_finite() || step_m <= 0.0 {
        return Vec::new();
    }

    let samples = result.samples();
    let max_dist = match samples.last() {
        Some(last) => last.x,
        None => return Vec::new(),
    };
    if max_dist < 1e-9 {
        return samples.iter().take(1).copied().collect();
    }

    let x_vals: Vec<f64> = samples.iter().map(|s| s.x).collect();
    let y_vals: Vec<f64> = samples.iter().map(|s| s.y).collect();

    let num_steps = (max_dist / step_m).floor() as usize + 1;
    (0..num_steps)
        .map(|i| i as f64 * step_m)
        .take_while(|&d| d <= max_dist)
        .map(|d| TrajectorySample::new(d, interpolate(&x_vals, &y_vals, d)))
        .collect()
}

/// Linear interpolation over monotonically non-decreasing `x_vals`
fn interpolate(x_vals: &[f64], y_vals: &[f64], x: f64) -> f64 {
    if x_vals.is_empty() || y_vals.is_empty() {
        return 0.0;
    }

    if x <= x_vals[0] {
        return y_vals[0];
    }

    let n = x_vals.len().min(y_vals.len());
    if x >= x_vals[n - 1] {
        return y_vals[n - 1];
    }

    // First index whose x is strictly greater than the query
    let idx = x_vals[..n].partition_point(|&v| v <= x);
    let (x0, x1) = (x_vals[idx - 1], x_vals[idx]);
    let (y0, y1) = (y_vals[idx - 1], y_vals[idx]);

    if (x1 - x0).abs() < f64::EPSILON {
        return y0;
    }

    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}
