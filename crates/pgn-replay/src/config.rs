//! Configuration file loading for the replay tool.
//!
//! Settings come from `replay.toml` in the current directory unless another
//! path is given. Every field is optional; command-line flags override the
//! file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The log level is not one of trace, debug, info, warn, error.
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Output settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Emit a JSON report instead of text.
    #[serde(default)]
    pub json: bool,
    /// Pretty-print the JSON report.
    #[serde(default)]
    pub pretty: bool,
    /// Print a board diagram after every ply in text mode.
    #[serde(default)]
    pub board: bool,
}

/// Replay tool configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Start position for games without a `FEN` tag.
    #[serde(default)]
    pub start_fen: Option<String>,
    /// Maximum level of log records written to stderr.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            start_fen: None,
            log_level: default_log_level(),
            output: OutputConfig::default(),
        }
    }
}

impl ReplayConfig {
    /// Loads the configuration from `path`, or from [`Self::config_path()`]
    /// when no path is given. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path.map_or_else(Self::config_path, Path::to_path_buf);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Returns the default configuration file path, `replay.toml`.
    pub fn config_path() -> PathBuf {
        PathBuf::from("replay.toml")
    }

    /// Parses [`Self::log_level`].
    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}
