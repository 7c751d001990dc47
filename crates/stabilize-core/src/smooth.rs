//! Sliding-window trajectory smoothing.
//!
//! Each smoothed pose is the arithmetic mean of the raw poses within
//! `radius` frames on either side. Windows are clipped to the sequence:
//! near the ends they shrink and the divisor shrinks with them. There is
//! no padding and no wraparound.

use std::ops::RangeInclusive;

use steadyframe_common::{SmoothingMethod, StabilizerConfig};
use steadyframe_motion_model::{SmoothedTrajectoryPoint, TrajectoryPoint};

/// Centered moving-average filter over a camera trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySmoother {
    radius: usize,
    method: SmoothingMethod,
}

impl TrajectorySmoother {
    /// Create a smoother using direct window summation.
    pub fn new(radius: usize) -> Self {
        Self {
            radius,
            method: SmoothingMethod::Windowed,
        }
    }

    pub fn with_method(mut self, method: SmoothingMethod) -> Self {
        self.method = method;
        self
    }

    pub fn from_config(config: &StabilizerConfig) -> Self {
        Self::new(config.smoothing_radius).with_method(config.smoothing_method)
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn method(&self) -> SmoothingMethod {
        self.method
    }

    /// Indices averaged for position `i` in a sequence of length `len`.
    ///
    /// Empty when `len` is zero.
    pub fn window(&self, i: usize, len: usize) -> RangeInclusive<usize> {
        let Some(last) = len.checked_sub(1) else {
            return RangeInclusive::new(1, 0);
        };
        let lo = i.saturating_sub(self.radius);
        let hi = i.saturating_add(self.radius).min(last);
        lo..=hi
    }

    /// Smooth a trajectory. The output is index-aligned with the input.
    pub fn smooth(&self, trajectory: &[TrajectoryPoint]) -> Vec<SmoothedTrajectoryPoint> {
        if trajectory.is_empty() {
            return vec![];
        }

        let smoothed = match self.method {
            SmoothingMethod::Windowed => self.smooth_windowed(trajectory),
            SmoothingMethod::PrefixSum => self.smooth_prefix_sum(trajectory),
        };

        for (i, p) in smoothed.iter().enumerate() {
            tracing::trace!(frame = i + 1, x = p.x, y = p.y, a = p.a, "smoothed pose");
        }
        smoothed
    }

    /// Reference evaluation: sum every window in ascending index order.
    fn smooth_windowed(&self, trajectory: &[TrajectoryPoint]) -> Vec<SmoothedTrajectoryPoint> {
        let len = trajectory.len();
        (0..len)
            .map(|i| {
                let window = self.window(i, len);
                let count = (window.end() - window.start() + 1) as f64;

                let (mut sum_x, mut sum_y, mut sum_a) = (0.0, 0.0, 0.0);
                for p in &trajectory[window] {
                    sum_x += p.x;
                    sum_y += p.y;
                    sum_a += p.a;
                }

                TrajectoryPoint::new(sum_x / count, sum_y / count, sum_a / count)
            })
            .collect()
    }

    /// O(N) evaluation from running sums.
    fn smooth_prefix_sum(&self, trajectory: &[TrajectoryPoint]) -> Vec<SmoothedTrajectoryPoint> {
        let len = trajectory.len();

        // prefix[k] = sum of trajectory[..k]
        let mut prefix = Vec::with_capacity(len + 1);
        prefix.push(TrajectoryPoint::ORIGIN);
        for p in trajectory {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + *p);
        }

        (0..len)
            .map(|i| {
                let window = self.window(i, len);
                let (lo, hi) = (*window.start(), *window.end());
                let count = (hi - lo + 1) as f64;
                let sum = prefix[hi + 1] - prefix[lo];
                TrajectoryPoint::new(sum.dx / count, sum.dy / count, sum.da / count)
            })
            .collect()
    }
}

impl Default for TrajectorySmoother {
    fn default() -> Self {
        Self::from_config(&StabilizerConfig::default())
    }
}
