//! Error types shared across Steadyframe crates.

use std::path::PathBuf;

/// Top-level error type for Steadyframe operations.
#[derive(Debug, thiserror::Error)]
pub enum StabilizeError {
    #[error("Empty input: {stage} needs at least one motion sample")]
    EmptyInput { stage: &'static str },

    #[error("Length mismatch: {left} has {left_len} entries but {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using StabilizeError.
pub type StabilizeResult<T> = Result<T, StabilizeError>;

impl StabilizeError {
    pub fn empty_input(stage: &'static str) -> Self {
        Self::EmptyInput { stage }
    }

    pub fn length_mismatch(
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    ) -> Self {
        Self::LengthMismatch {
            left,
            left_len,
            right,
            right_len,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    /// Whether this error is a violated pipeline precondition
    /// (empty or misaligned sequences) rather than an I/O failure.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::EmptyInput { .. } | Self::LengthMismatch { .. })
    }
}
