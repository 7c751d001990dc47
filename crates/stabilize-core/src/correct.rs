//! Corrective transform generation.

use steadyframe_common::{StabilizeError, StabilizeResult};
use steadyframe_motion_model::{
    CorrectedMotion, MotionSample, SmoothedTrajectoryPoint, TrajectoryPoint,
};

/// Derive per-frame corrections that steer the raw motion onto the
/// smoothed trajectory.
///
/// At each frame the running pose is advanced by the raw sample, the gap to
/// the smoothed pose is measured, and the correction is the raw sample plus
/// that gap. The running pose then follows the emitted corrections, so
/// accumulating the corrections lands on `smoothed[i]` at every index.
///
/// Fails before producing anything if either sequence is empty or their
/// lengths differ.
pub fn correct(
    samples: &[MotionSample],
    smoothed: &[SmoothedTrajectoryPoint],
) -> StabilizeResult<Vec<CorrectedMotion>> {
    if samples.is_empty() {
        return Err(StabilizeError::empty_input("transform correction"));
    }
    if samples.len() != smoothed.len() {
        return Err(StabilizeError::length_mismatch(
            "motion samples",
            samples.len(),
            "smoothed trajectory",
            smoothed.len(),
        ));
    }

    let mut pose = TrajectoryPoint::ORIGIN;
    let corrected = samples
        .iter()
        .zip(smoothed)
        .enumerate()
        .map(|(i, (sample, target))| {
            let advanced = pose + *sample;
            let diff = *target - advanced;
            let out = *sample + diff;
            pose += out;
            tracing::trace!(
                frame = i + 1,
                dx = out.dx,
                dy = out.dy,
                da = out.da,
                "corrected motion"
            );
            out
        })
        .collect();

    Ok(corrected)
}

/// Largest absolute deviation between `cumsum(corrected)` and `smoothed`.
///
/// Returns `None` when the sequences differ in length.
pub fn reconstruction_error(
    corrected: &[CorrectedMotion],
    smoothed: &[SmoothedTrajectoryPoint],
) -> Option<f64> {
    if corrected.len() != smoothed.len() {
        return None;
    }

    let mut pose = TrajectoryPoint::ORIGIN;
    let worst = corrected
        .iter()
        .zip(smoothed)
        .map(|(c, target)| {
            pose += *c;
            let gap = *target - pose;
            gap.dx.abs().max(gap.dy.abs()).max(gap.da.abs())
        })
        .fold(0.0f64, f64::max);
    Some(worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrate::integrate;
    use crate::smooth::TrajectorySmoother;
    use proptest::prelude::*;

    #[test]
    fn test_three_frame_example() {
        let samples = vec![MotionSample::new(1.0, 0.0, 0.0); 3];
        let smoothed = vec![
            TrajectoryPoint::new(1.5, 0.0, 0.0),
            TrajectoryPoint::new(2.0, 0.0, 0.0),
            TrajectoryPoint::new(2.5, 0.0, 0.0),
        ];
        let corrected = correct(&samples, &smoothed).unwrap();
        assert_eq!(
            corrected,
            vec![
                MotionSample::new(1.5, 0.0, 0.0),
                MotionSample::new(0.5, 0.0, 0.0),
                MotionSample::new(0.5, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = correct(&[], &[]).unwrap_err();
        assert!(matches!(err, StabilizeError::EmptyInput { .. }));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let samples = vec![MotionSample::new(1.0, 0.0, 0.0); 3];
        let smoothed = vec![TrajectoryPoint::ORIGIN; 2];
        match correct(&samples, &smoothed) {
            Err(StabilizeError::LengthMismatch {
                left_len,
                right_len,
                ..
            }) => {
                assert_eq!(left_len, 3);
                assert_eq!(right_len, 2);
            }
            other => panic!("expected length mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_matches_difference_of_smoothed_poses() {
        let samples = vec![
            MotionSample::new(2.0, -1.0, 0.05),
            MotionSample::new(-3.0, 0.5, -0.02),
            MotionSample::new(1.0, 4.0, 0.01),
            MotionSample::new(0.5, -2.0, 0.0),
        ];
        let smoothed = TrajectorySmoother::new(1).smooth(&integrate(&samples));
        let corrected = correct(&samples, &smoothed).unwrap();

        let mut previous = TrajectoryPoint::ORIGIN;
        for (c, s) in corrected.iter().zip(&smoothed) {
            let expected = *s - previous;
            assert!((c.dx - expected.dx).abs() < 1e-12);
            assert!((c.dy - expected.dy).abs() < 1e-12);
            assert!((c.da - expected.da).abs() < 1e-12);
            previous = *s;
        }
    }

    #[test]
    fn test_reconstruction_error_length_mismatch() {
        assert_eq!(reconstruction_error(&[MotionSample::IDENTITY], &[]), None);
    }

    proptest! {
        #[test]
        fn prop_cumsum_of_corrections_is_smoothed(
            raw in prop::collection::vec((-40.0f64..40.0, -40.0f64..40.0, -0.3f64..0.3), 1..150),
            radius in 0usize..70,
        ) {
            let samples: Vec<MotionSample> =
                raw.iter().map(|&(dx, dy, da)| MotionSample::new(dx, dy, da)).collect();
            let smoothed = TrajectorySmoother::new(radius).smooth(&integrate(&samples));
            let corrected = correct(&samples, &smoothed).unwrap();

            let scale = 1.0 + smoothed
                .iter()
                .flat_map(|p| p.components())
                .fold(0.0f64, |m, v| m.max(v.abs()));
            let err = reconstruction_error(&corrected, &smoothed).unwrap();
            prop_assert!(err <= 1e-9 * scale * samples.len() as f64, "error {}", err);
        }
    }
}
