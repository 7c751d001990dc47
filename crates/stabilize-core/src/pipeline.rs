//! Stabilization pipeline driver.
//!
//! Runs integration, smoothing and correction in that fixed order over a
//! fully drained sample sequence, timing each stage.

use steadyframe_common::{
    StabilizeError, StabilizeResult, StabilizerConfig, Stage, StageClock, StageTimings,
};
use steadyframe_motion_model::{
    CorrectedMotion, MotionSample, SmoothedTrajectoryPoint, TrajectoryPoint,
};

use crate::correct::{correct, reconstruction_error};
use crate::integrate::integrate;
use crate::render::{plan, render_all, FrameRenderer, FrameSize, RenderInstruction};
use crate::smooth::TrajectorySmoother;
use crate::source::{drain, MotionEstimator, MotionTrack};

/// Batch stabilizer configured once and run over complete sample sequences.
#[derive(Debug, Clone)]
pub struct Stabilizer {
    config: StabilizerConfig,
    smoother: TrajectorySmoother,
}

/// Output of one stabilization run. All sequences share one length.
#[derive(Debug, Clone)]
pub struct Stabilized {
    pub samples: Vec<MotionSample>,
    pub trajectory: Vec<TrajectoryPoint>,
    pub smoothed: Vec<SmoothedTrajectoryPoint>,
    pub corrected: Vec<CorrectedMotion>,
    pub timings: StageTimings,
    config: StabilizerConfig,
}

impl Stabilizer {
    /// Create a stabilizer, rejecting invalid configuration.
    pub fn new(config: StabilizerConfig) -> StabilizeResult<Self> {
        config.validate()?;
        let smoother = TrajectorySmoother::from_config(&config);
        Ok(Self { config, smoother })
    }

    pub fn with_defaults() -> Self {
        let config = StabilizerConfig::default();
        let smoother = TrajectorySmoother::from_config(&config);
        Self { config, smoother }
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Stabilize a complete motion sequence.
    ///
    /// Samples beyond the configured frame cap are ignored. An empty
    /// sequence is rejected before any stage runs.
    pub fn run(&self, samples: &[MotionSample]) -> StabilizeResult<Stabilized> {
        if samples.is_empty() {
            return Err(StabilizeError::empty_input("stabilizer"));
        }

        let samples = if samples.len() > self.config.frame_cap {
            tracing::info!(
                total = samples.len(),
                frame_cap = self.config.frame_cap,
                "truncating motion sequence to frame cap"
            );
            &samples[..self.config.frame_cap]
        } else {
            samples
        };

        let mut clock = StageClock::start();
        tracing::debug!(
            frames = samples.len(),
            radius = self.smoother.radius(),
            method = ?self.smoother.method(),
            started = clock.epoch_wall(),
            "stabilization started"
        );

        let trajectory = clock.time(Stage::Integration, || integrate(samples));
        let smoothed = clock.time(Stage::Smoothing, || self.smoother.smooth(&trajectory));
        if smoothed.len() != trajectory.len() {
            return Err(StabilizeError::length_mismatch(
                "trajectory",
                trajectory.len(),
                "smoothed trajectory",
                smoothed.len(),
            ));
        }
        let corrected = clock.time(Stage::Correction, || correct(samples, &smoothed))?;

        tracing::info!(
            frames = corrected.len(),
            elapsed_secs = clock.elapsed_secs(),
            "stabilization finished"
        );

        Ok(Stabilized {
            samples: samples.to_vec(),
            trajectory,
            smoothed,
            corrected,
            timings: clock.into_timings(),
            config: self.config.clone(),
        })
    }

    /// Stabilize a drained track, reporting reused samples.
    pub fn run_track(&self, track: &MotionTrack) -> StabilizeResult<Stabilized> {
        let reused = track.reused_count();
        if reused > 0 {
            tracing::warn!(
                reused,
                total = track.len(),
                "track contains samples reused after degenerate estimates"
            );
        }
        self.run(track.samples())
    }

    /// Drain `frames` through `estimator`, then stabilize the result.
    ///
    /// Estimation time is recorded alongside the pipeline stages.
    pub fn run_frames<E>(
        &self,
        frames: impl IntoIterator<Item = E::Frame>,
        estimator: &mut E,
    ) -> StabilizeResult<(MotionTrack, Stabilized)>
    where
        E: MotionEstimator,
    {
        let mut clock = StageClock::start();
        let track = clock.time(Stage::Estimation, || {
            drain(frames, estimator, self.config.frame_cap)
        });

        let mut stabilized = self.run_track(&track)?;
        let mut timings = clock.into_timings();
        timings.merge(&stabilized.timings);
        stabilized.timings = timings;
        Ok((track, stabilized))
    }
}

impl Stabilized {
    pub fn len(&self) -> usize {
        self.corrected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrected.is_empty()
    }

    /// Configuration the run used.
    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Largest deviation between re-accumulated corrections and the
    /// smoothed trajectory.
    pub fn reconstruction_error(&self) -> f64 {
        reconstruction_error(&self.corrected, &self.smoothed).unwrap_or(f64::INFINITY)
    }

    /// Render instructions for frames of `size`, using the run's crop settings.
    pub fn render_plan(&self, size: FrameSize) -> Vec<RenderInstruction> {
        plan(&self.corrected, size, &self.config.crop)
    }

    /// Feed `frames` to `renderer` with this run's corrected transforms.
    pub fn render<R>(
        &mut self,
        frames: impl IntoIterator<Item = R::Frame>,
        size: FrameSize,
        renderer: &mut R,
    ) -> StabilizeResult<Vec<R::Output>>
    where
        R: FrameRenderer,
    {
        let instructions = self.render_plan(size);
        let mut clock = StageClock::start();
        let outputs = clock.time(Stage::Rendering, || {
            render_all(frames, &instructions, renderer)
        })?;
        self.timings.merge(clock.timings());
        tracing::info!(frames = outputs.len(), "rendering finished");
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<MotionSample> {
        vec![MotionSample::new(1.0, 0.0, 0.0); n]
    }

    #[test]
    fn test_empty_input_rejected() {
        let stabilizer = Stabilizer::with_defaults();
        let err = stabilizer.run(&[]).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = StabilizerConfig {
            frame_cap: 0,
            ..Default::default()
        };
        assert!(Stabilizer::new(config).is_err());
    }

    #[test]
    fn test_sequences_share_length() {
        let stabilized = Stabilizer::with_defaults().run(&ramp(12)).unwrap();
        assert_eq!(stabilized.len(), 12);
        assert_eq!(stabilized.samples.len(), 12);
        assert_eq!(stabilized.trajectory.len(), 12);
        assert_eq!(stabilized.smoothed.len(), 12);
    }

    #[test]
    fn test_frame_cap_truncates() {
        let config = StabilizerConfig {
            frame_cap: 4,
            ..Default::default()
        };
        let stabilized = Stabilizer::new(config).unwrap().run(&ramp(10)).unwrap();
        assert_eq!(stabilized.len(), 4);
    }

    #[test]
    fn test_stage_timings_recorded_in_order() {
        let stabilized = Stabilizer::with_defaults().run(&ramp(5)).unwrap();
        let stages: Vec<Stage> = stabilized.timings.iter().map(|(s, _)| s).collect();
        assert_eq!(
            stages,
            vec![Stage::Integration, Stage::Smoothing, Stage::Correction]
        );
    }

    #[test]
    fn test_render_plan_uses_config_crop() {
        let mut config = StabilizerConfig::default();
        config.crop.horizontal_border_px = 10;
        config.crop.vertical_border_ratio = 0.0;
        let stabilized = Stabilizer::new(config).unwrap().run(&ramp(3)).unwrap();

        let plan = stabilized.render_plan(FrameSize::new(200, 100));
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].crop.x, 10);
        assert_eq!(plan[0].crop.y, 0);
        assert_eq!(plan[0].crop.height, 100);
    }
}
