//! Application configuration.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StabilizeError, StabilizeResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Stabilization pipeline parameters.
    pub stabilizer: StabilizerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters for one stabilization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Smoothing radius in frames. Larger values give a steadier result
    /// but react more slowly to intentional panning.
    pub smoothing_radius: usize,

    /// Maximum number of motion samples processed per run.
    pub frame_cap: usize,

    /// How the sliding-window mean is evaluated.
    pub smoothing_method: SmoothingMethod,

    /// Border crop applied by the renderer to hide warp edges.
    pub crop: CropConfig,
}

/// Evaluation strategy for the sliding-window mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMethod {
    /// Direct summation over every window, O(N·R).
    #[default]
    Windowed,
    /// Running prefix sums, O(N). Agrees with `Windowed` up to rounding.
    PrefixSum,
}

/// Border crop parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Pixels removed from the left and right edges.
    pub horizontal_border_px: u32,

    /// Fraction of frame height used to derive the vertical border.
    /// The result is scaled by `height / width` to keep the aspect ratio.
    pub vertical_border_ratio: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "steadyframe_core=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            smoothing_radius: 50,
            frame_cap: 500,
            smoothing_method: SmoothingMethod::Windowed,
            crop: CropConfig::default(),
        }
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            horizontal_border_px: 70,
            vertical_border_ratio: 0.25,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl StabilizerConfig {
    /// Check that the parameters describe a runnable pipeline.
    pub fn validate(&self) -> StabilizeResult<()> {
        if self.frame_cap == 0 {
            return Err(StabilizeError::config("frame_cap must be at least 1"));
        }
        if !(0.0..0.5).contains(&self.crop.vertical_border_ratio) {
            return Err(StabilizeError::config(format!(
                "crop.vertical_border_ratio must be in [0, 0.5), got {}",
                self.crop.vertical_border_ratio
            )));
        }
        Ok(())
    }
}

impl FromStr for SmoothingMethod {
    type Err = StabilizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "windowed" => Ok(Self::Windowed),
            "prefix-sum" | "prefix_sum" => Ok(Self::PrefixSum),
            other => Err(StabilizeError::config(format!(
                "unknown smoothing method: {other}. Use: windowed, prefix-sum"
            ))),
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("steadyframe").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_parameters() {
        let config = StabilizerConfig::default();
        assert_eq!(config.smoothing_radius, 50);
        assert_eq!(config.frame_cap, 500);
        assert_eq!(config.crop.horizontal_border_px, 70);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_frame_cap_is_rejected() {
        let config = StabilizerConfig {
            frame_cap: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StabilizeError::Config { .. })
        ));
    }

    #[test]
    fn test_zero_radius_is_valid() {
        let config = StabilizerConfig {
            smoothing_radius: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "stabilizer": { "smoothing_radius": 12 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.stabilizer.smoothing_radius, 12);
        assert_eq!(config.stabilizer.frame_cap, 500);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_smoothing_method_from_str() {
        assert_eq!(
            "prefix-sum".parse::<SmoothingMethod>().unwrap(),
            SmoothingMethod::PrefixSum
        );
        assert_eq!(
            "windowed".parse::<SmoothingMethod>().unwrap(),
            SmoothingMethod::Windowed
        );
        assert!("gaussian".parse::<SmoothingMethod>().is_err());
    }

    #[test]
    fn test_smoothing_method_serde_name() {
        let json = serde_json::to_string(&SmoothingMethod::PrefixSum).unwrap();
        assert_eq!(json, "\"prefix_sum\"");
    }
}
