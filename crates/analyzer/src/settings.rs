//! Layered settings: optional TOML file, then `FOCUS_*` environment

use std::path::PathBuf;

use config::{Config, Environment, File};
use focus::FocusConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AnalyzerError;

/// Environment variable naming the settings file
pub const CONFIG_PATH_VAR: &str = "FOCUS_CONFIG";

/// Settings file used when `FOCUS_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "focus-analyzer.toml";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Binary settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scoring tunables
    pub scoring: FocusConfig,

    /// Landmark recording (JSON lines) to analyze
    pub input: Option<PathBuf>,

    /// Quiz document
    pub quiz: Option<PathBuf>,

    /// User answers (JSON array of strings)
    pub answers: Option<PathBuf>,

    /// Report destination; stdout when unset
    pub output: Option<PathBuf>,

    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scoring: FocusConfig::default(),
            input: None,
            quiz: None,
            answers: None,
            output: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Settings {
    /// Load from the file named by `FOCUS_CONFIG` (or the default path, if
    /// present) overlaid with `FOCUS_` environment variables
    pub fn load() -> Result<Self, AnalyzerError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load with an explicit settings file path.
    ///
    /// Nested keys use `__` in the environment, e.g.
    /// `FOCUS_SCORING__SIDE_THRESHOLD_S=5`.
    pub fn load_from(path: &str) -> Result<Self, AnalyzerError> {
        debug!("Loading settings from {} and environment", path);
        let settings: Settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("FOCUS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.scoring.validate()?;
        Ok(settings)
    }
}
