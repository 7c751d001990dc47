//! Trajectory integration.

use steadyframe_motion_model::{MotionSample, TrajectoryPoint};

/// Accumulate relative motion into an absolute camera trajectory.
///
/// `trajectory[i]` is the componentwise sum of `samples[0..=i]`, starting
/// from the origin. Non-finite input propagates unchanged.
pub fn integrate(samples: &[MotionSample]) -> Vec<TrajectoryPoint> {
    samples
        .iter()
        .scan(TrajectoryPoint::ORIGIN, |pose, sample| {
            *pose += *sample;
            Some(*pose)
        })
        .collect()
}
