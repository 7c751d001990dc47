//! Show statistics for a motion log and its stabilization.

use std::path::PathBuf;

use steadyframe_common::AppConfig;
use steadyframe_core::Stabilizer;
use steadyframe_motion_model::TrajectoryPoint;

use super::{print_timings, read_motion_log, stabilizer_config};

pub fn run(
    app: &AppConfig,
    input: PathBuf,
    radius: Option<usize>,
    input_format: Option<String>,
) -> anyhow::Result<()> {
    let (samples, format) = read_motion_log(&input, input_format.as_deref())?;
    let config = stabilizer_config(&app.stabilizer, radius, None, None)?;
    let result = Stabilizer::new(config)?.run(&samples)?;

    println!("Motion log: {}", input.display());
    println!("  Format: {format:?}");
    println!("  Samples: {} (processed: {})", samples.len(), result.len());
    println!(
        "  Non-finite samples: {}",
        result.samples.iter().filter(|s| !s.is_finite()).count()
    );
    println!();

    println!("Trajectory:");
    let (lo, hi) = extent(&result.trajectory);
    println!("  x: [{:.3}, {:.3}]", lo.x, hi.x);
    println!("  y: [{:.3}, {:.3}]", lo.y, hi.y);
    println!("  a: [{:.5}, {:.5}] rad", lo.a, hi.a);
    println!();

    println!(
        "Smoothing (radius {}, {:?}):",
        result.config().smoothing_radius,
        result.config().smoothing_method
    );
    let n = result.len() as f64;
    let mean_abs = |f: fn(&TrajectoryPoint, &TrajectoryPoint) -> f64| {
        result
            .trajectory
            .iter()
            .zip(&result.smoothed)
            .map(|(t, s)| f(t, s).abs())
            .sum::<f64>()
            / n
    };
    println!("  Mean |correction| x: {:.4}", mean_abs(|t, s| s.x - t.x));
    println!("  Mean |correction| y: {:.4}", mean_abs(|t, s| s.y - t.y));
    println!("  Mean |correction| a: {:.6}", mean_abs(|t, s| s.a - t.a));
    println!(
        "  Max reconstruction error: {:.3e}",
        result.reconstruction_error()
    );
    println!();

    print_timings(&result.timings);
    Ok(())
}

/// Componentwise minimum and maximum, ignoring NaN.
fn extent(points: &[TrajectoryPoint]) -> (TrajectoryPoint, TrajectoryPoint) {
    let mut lo = TrajectoryPoint::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut hi = TrajectoryPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        lo = TrajectoryPoint::new(lo.x.min(p.x), lo.y.min(p.y), lo.a.min(p.a));
        hi = TrajectoryPoint::new(hi.x.max(p.x), hi.y.max(p.y), hi.a.max(p.a));
    }
    (lo, hi)
}
