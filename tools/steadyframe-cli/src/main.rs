//! Steadyframe CLI — Command-line interface for trajectory stabilization.
//!
//! Usage:
//!   steadyframe stabilize <INPUT>   Smooth a motion log and write corrected transforms
//!   steadyframe inspect <INPUT>     Summarize a motion log and its stabilization
//!   steadyframe synth               Generate a synthetic shaky-pan motion log

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use steadyframe_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "steadyframe",
    about = "Offline video stabilization by trajectory smoothing",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stabilize a motion log and write the corrected per-frame transforms
    Stabilize {
        /// Motion log (`index dx dy da` text, or JSONL)
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Smoothing radius in frames
        #[arg(long)]
        radius: Option<usize>,

        /// Maximum number of motion samples to process
        #[arg(long)]
        frame_cap: Option<usize>,

        /// Window evaluation: windowed|prefix-sum
        #[arg(long)]
        method: Option<String>,

        /// Input format override: text|jsonl (default: from extension)
        #[arg(long)]
        input_format: Option<String>,

        /// Output format: text|jsonl (default: same as input)
        #[arg(long)]
        format: Option<String>,
    },

    /// Show statistics for a motion log and its stabilization
    Inspect {
        /// Motion log (`index dx dy da` text, or JSONL)
        input: PathBuf,

        /// Smoothing radius in frames
        #[arg(long)]
        radius: Option<usize>,

        /// Input format override: text|jsonl (default: from extension)
        #[arg(long)]
        input_format: Option<String>,
    },

    /// Generate a deterministic synthetic shaky-pan motion log
    Synth {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of frame transitions
        #[arg(long, default_value = "300")]
        frames: usize,

        /// Steady horizontal pan per frame (pixels)
        #[arg(long, default_value = "2.0")]
        pan: f64,

        /// Jitter amplitude for translation (pixels)
        #[arg(long, default_value = "4.0")]
        jitter: f64,

        /// Jitter amplitude for rotation (radians)
        #[arg(long, default_value = "0.01")]
        angle_jitter: f64,

        /// Random seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Output format: text|jsonl
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    steadyframe_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Stabilize {
            input,
            output,
            radius,
            frame_cap,
            method,
            input_format,
            format,
        } => commands::stabilize::run(
            &config,
            commands::stabilize::StabilizeArgs {
                input,
                output,
                radius,
                frame_cap,
                method,
                input_format,
                format,
            },
        ),
        Commands::Inspect {
            input,
            radius,
            input_format,
        } => commands::inspect::run(&config, input, radius, input_format),
        Commands::Synth {
            output,
            frames,
            pan,
            jitter,
            angle_jitter,
            seed,
            format,
        } => commands::synth::run(output, frames, pan, jitter, angle_jitter, seed, format),
    }
}
