//! Stabilize a motion log.

use std::path::PathBuf;

use steadyframe_common::AppConfig;
use steadyframe_core::Stabilizer;
use steadyframe_motion_model::MotionLogFormat;

use super::{print_timings, read_motion_log, stabilizer_config, write_output};

pub struct StabilizeArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub radius: Option<usize>,
    pub frame_cap: Option<usize>,
    pub method: Option<String>,
    pub input_format: Option<String>,
    pub format: Option<String>,
}

pub fn run(app: &AppConfig, args: StabilizeArgs) -> anyhow::Result<()> {
    eprintln!("Stabilizing motion log: {}", args.input.display());

    let (samples, input_format) = read_motion_log(&args.input, args.input_format.as_deref())?;
    let output_format = match args.format.as_deref() {
        Some(f) => f.parse::<MotionLogFormat>()?,
        None => input_format,
    };

    let config = stabilizer_config(
        &app.stabilizer,
        args.radius,
        args.frame_cap,
        args.method.as_deref(),
    )?;
    let stabilizer = Stabilizer::new(config)?;

    eprintln!("  Loaded {} motion samples", samples.len());
    if samples.len() > stabilizer.config().frame_cap {
        eprintln!(
            "  Frame cap {} applies; remaining samples are ignored",
            stabilizer.config().frame_cap
        );
    }
    eprintln!(
        "  Smoothing radius: {} frames ({:?})",
        stabilizer.config().smoothing_radius,
        stabilizer.config().smoothing_method
    );

    let result = stabilizer.run(&samples)?;
    let non_finite = result.samples.iter().filter(|s| !s.is_finite()).count();
    if non_finite > 0 {
        tracing::warn!(non_finite, "input contains non-finite motion samples");
    }

    let content = output_format.serialize(&result.corrected)?;
    write_output(args.output.as_ref(), &content)?;

    eprintln!("  Corrected {} transforms", result.len());
    eprintln!(
        "  Max reconstruction error: {:.3e}",
        result.reconstruction_error()
    );
    if let Some(path) = &args.output {
        eprintln!("  Written to: {}", path.display());
    }
    print_timings(&result.timings);

    Ok(())
}
