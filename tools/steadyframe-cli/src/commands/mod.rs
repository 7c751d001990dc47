pub mod inspect;
pub mod stabilize;
pub mod synth;

use std::path::{Path, PathBuf};

use steadyframe_common::{StabilizeError, StabilizerConfig, StageTimings};
use steadyframe_motion_model::{MotionLogFormat, MotionSample};

/// Read and parse a motion log, detecting the format unless overridden.
pub fn read_motion_log(
    path: &Path,
    format: Option<&str>,
) -> anyhow::Result<(Vec<MotionSample>, MotionLogFormat)> {
    let format = match format {
        Some(f) => f.parse::<MotionLogFormat>()?,
        None => MotionLogFormat::detect(path),
    };

    if !path.exists() {
        return Err(StabilizeError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let samples = format
        .parse(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))?;

    tracing::debug!(path = %path.display(), samples = samples.len(), ?format, "motion log loaded");
    Ok((samples, format))
}

/// Write to `output`, or stdout when absent.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))
        }
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn stabilizer_config(
    base: &StabilizerConfig,
    radius: Option<usize>,
    frame_cap: Option<usize>,
    method: Option<&str>,
) -> anyhow::Result<StabilizerConfig> {
    let mut config = base.clone();
    if let Some(radius) = radius {
        config.smoothing_radius = radius;
    }
    if let Some(cap) = frame_cap {
        config.frame_cap = cap;
    }
    if let Some(method) = method {
        config.smoothing_method = method.parse()?;
    }
    Ok(config)
}

/// Print per-stage timings to stderr.
pub fn print_timings(timings: &StageTimings) {
    eprintln!("Timings:");
    for (stage, elapsed) in timings.iter() {
        eprintln!("  {:<24} {:.6}s", stage.label(), elapsed.as_secs_f64());
    }
    eprintln!("  {:<24} {:.6}s", "total", timings.total().as_secs_f64());
}
