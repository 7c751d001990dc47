//! Stage timing for stabilization runs.
//!
//! Every run is anchored to a wall-clock start time and records how long
//! each pipeline stage took, in the order the stages ran.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

/// A pipeline stage whose duration is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Estimation,
    Integration,
    Smoothing,
    Correction,
    Rendering,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Estimation => "motion estimation",
            Stage::Integration => "trajectory integration",
            Stage::Smoothing => "trajectory smoothing",
            Stage::Correction => "transform correction",
            Stage::Rendering => "rendering",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Durations recorded for each stage of a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageTimings {
    entries: Vec<(Stage, Duration)>,
}

impl StageTimings {
    /// Record (or accumulate into) the duration of `stage`.
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        match self.entries.iter_mut().find(|(s, _)| *s == stage) {
            Some((_, total)) => *total += elapsed,
            None => self.entries.push((stage, elapsed)),
        }
    }

    /// Duration of a stage, if it ran.
    pub fn get(&self, stage: Stage) -> Option<Duration> {
        self.entries
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, d)| *d)
    }

    /// Sum of every recorded stage.
    pub fn total(&self) -> Duration {
        self.entries.iter().map(|(_, d)| *d).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, Duration)> + '_ {
        self.entries.iter().copied()
    }

    /// Fold another set of timings into this one.
    pub fn merge(&mut self, other: &StageTimings) {
        for (stage, elapsed) in other.iter() {
            self.record(stage, elapsed);
        }
    }
}

/// Clock anchored at the start of a stabilization run.
#[derive(Debug, Clone)]
pub struct StageClock {
    epoch: Instant,
    epoch_wall: String,
    timings: StageTimings,
}

impl StageClock {
    /// Create a clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
            timings: StageTimings::default(),
        }
    }

    /// Run `f`, recording its wall time under `stage`.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = f();
        let elapsed = started.elapsed();
        tracing::debug!(stage = %stage, elapsed_ms = elapsed.as_secs_f64() * 1e3, "stage finished");
        self.timings.record(stage, elapsed);
        out
    }

    /// Seconds elapsed since the clock started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at start (RFC 3339).
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    pub fn timings(&self) -> &StageTimings {
        &self.timings
    }

    pub fn into_timings(self) -> StageTimings {
        self.timings
    }
}
