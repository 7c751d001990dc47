//! Generate a synthetic shaky-pan motion log.

use std::path::PathBuf;

use steadyframe_motion_model::{MotionLogFormat, MotionSample};

use super::write_output;

pub fn run(
    output: Option<PathBuf>,
    frames: usize,
    pan: f64,
    jitter: f64,
    angle_jitter: f64,
    seed: u64,
    format: String,
) -> anyhow::Result<()> {
    let format = format.parse::<MotionLogFormat>()?;
    let samples = shaky_pan(frames, pan, jitter, angle_jitter, seed);
    write_output(output.as_ref(), &format.serialize(&samples)?)?;

    if let Some(path) = &output {
        eprintln!("Wrote {} synthetic samples to {}", samples.len(), path.display());
    }
    Ok(())
}

/// Constant pan plus uniform jitter in `[-amplitude, amplitude]`.
fn shaky_pan(
    frames: usize,
    pan: f64,
    jitter: f64,
    angle_jitter: f64,
    seed: u64,
) -> Vec<MotionSample> {
    let mut rng = Lcg::new(seed);
    (0..frames)
        .map(|_| {
            MotionSample::new(
                pan + jitter * rng.next_signed(),
                jitter * rng.next_signed(),
                angle_jitter * rng.next_signed(),
            )
        })
        .collect()
}

/// 64-bit linear congruential generator (Knuth MMIX constants).
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Uniform value in `[-1, 1)`.
    fn next_signed(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_log() {
        assert_eq!(shaky_pan(50, 2.0, 3.0, 0.01, 9), shaky_pan(50, 2.0, 3.0, 0.01, 9));
        assert_ne!(shaky_pan(50, 2.0, 3.0, 0.01, 9), shaky_pan(50, 2.0, 3.0, 0.01, 10));
    }

    #[test]
    fn test_jitter_bounded_around_pan() {
        for s in shaky_pan(200, 2.0, 3.0, 0.01, 1) {
            assert!((s.dx - 2.0).abs() <= 3.0);
            assert!(s.dy.abs() <= 3.0);
            assert!(s.da.abs() <= 0.01);
        }
    }

    #[test]
    fn test_zero_jitter_is_pure_pan() {
        let samples = shaky_pan(5, 1.5, 0.0, 0.0, 3);
        assert!(samples.iter().all(|s| *s == MotionSample::new(1.5, 0.0, 0.0)));
    }
}
