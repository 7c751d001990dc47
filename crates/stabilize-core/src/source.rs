//! Motion sources: draining an upstream estimator into a sample sequence.
//!
//! Smoothing needs lookahead across the whole sequence, so every source is
//! drained completely before the pipeline runs.

use steadyframe_motion_model::MotionSample;

/// Result of estimating motion between two consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimate {
    /// A transform was estimated.
    Motion(MotionSample),
    /// The estimator ran but found no transform (e.g. too few matches).
    /// The last successful sample is reused for this frame pair.
    Degenerate,
    /// The estimator failed outright. The current frame is dropped and the
    /// previous frame stays the reference for the next pair.
    Rejected,
}

/// Pluggable frame-to-frame motion estimator.
pub trait MotionEstimator {
    type Frame;

    fn estimate(&mut self, prev: &Self::Frame, cur: &Self::Frame) -> Estimate;
}

/// Anything that yields motion samples directly, one per frame transition.
pub trait MotionSource {
    fn next_sample(&mut self) -> Option<MotionSample>;
}

/// Adapts an iterator of samples into a [`MotionSource`].
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = MotionSample>,
{
    pub fn new(inner: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: inner.into_iter(),
        }
    }
}

impl<I> MotionSource for IterSource<I>
where
    I: Iterator<Item = MotionSample>,
{
    fn next_sample(&mut self) -> Option<MotionSample> {
        self.inner.next()
    }
}

/// How a sample in a [`MotionTrack`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOrigin {
    Estimated,
    /// Copied from the previous successful estimate after a degenerate one.
    Reused,
}

/// A drained sequence of motion samples with per-sample provenance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionTrack {
    samples: Vec<MotionSample>,
    provenance: Vec<SampleOrigin>,
}

impl MotionTrack {
    /// Build a track where every sample was estimated.
    pub fn from_samples(samples: Vec<MotionSample>) -> Self {
        let provenance = vec![SampleOrigin::Estimated; samples.len()];
        Self {
            samples,
            provenance,
        }
    }

    fn push(&mut self, sample: MotionSample, origin: SampleOrigin) {
        self.samples.push(sample);
        self.provenance.push(origin);
    }

    pub fn samples(&self) -> &[MotionSample] {
        &self.samples
    }

    pub fn provenance(&self) -> &[SampleOrigin] {
        &self.provenance
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples that were reused rather than estimated.
    pub fn reused_count(&self) -> usize {
        self.provenance
            .iter()
            .filter(|o| **o == SampleOrigin::Reused)
            .count()
    }

    pub fn into_samples(self) -> Vec<MotionSample> {
        self.samples
    }
}

/// Run `estimator` over consecutive frame pairs, collecting at most
/// `frame_cap` samples.
pub fn drain<E>(
    frames: impl IntoIterator<Item = E::Frame>,
    estimator: &mut E,
    frame_cap: usize,
) -> MotionTrack
where
    E: MotionEstimator,
{
    let mut track = MotionTrack::default();
    let mut frames = frames.into_iter();
    let Some(mut prev) = frames.next() else {
        return track;
    };
    let mut last_good: Option<MotionSample> = None;
    let mut rejected = 0usize;

    while track.len() < frame_cap {
        let Some(cur) = frames.next() else {
            break;
        };

        match estimator.estimate(&prev, &cur) {
            Estimate::Motion(sample) => {
                last_good = Some(sample);
                track.push(sample, SampleOrigin::Estimated);
            }
            Estimate::Degenerate => {
                let sample = last_good.unwrap_or(MotionSample::IDENTITY);
                tracing::debug!(
                    frame = track.len() + 1,
                    "degenerate estimate, reusing last transform"
                );
                track.push(sample, SampleOrigin::Reused);
            }
            Estimate::Rejected => {
                rejected += 1;
                tracing::warn!(
                    frame = track.len() + 1,
                    "motion estimate rejected, skipping frame"
                );
                continue;
            }
        }

        prev = cur;
    }

    tracing::debug!(
        samples = track.len(),
        reused = track.reused_count(),
        rejected,
        "motion source drained"
    );
    track
}

/// Drain a [`MotionSource`], collecting at most `frame_cap` samples.
pub fn drain_source(source: &mut impl MotionSource, frame_cap: usize) -> MotionTrack {
    let mut samples = Vec::new();
    while samples.len() < frame_cap {
        match source.next_sample() {
            Some(sample) => samples.push(sample),
            None => break,
        }
    }
    MotionTrack::from_samples(samples)
}
