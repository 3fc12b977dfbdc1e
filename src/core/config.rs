//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Heapdot reads one optional TOML file with user-scope settings. Missing
//! config is not an error; defaults apply.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$HEAPDOT_CONFIG` if set (must exist and parse)
//! 2. `<user config dir>/heapdot/config.toml` (XDG-aware)
//!
//! # Environment
//!
//! `$HEAPDOT_VIEWER` overrides the configured viewer command.
//!
//! # Example
//!
//! ```toml
//! viewer = "dotty"
//! output_dir = "/tmp/diagrams"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the env var pointing at an explicit config file.
pub const CONFIG_ENV: &str = "HEAPDOT_CONFIG";

/// Name of the env var overriding the viewer command.
pub const VIEWER_ENV: &str = "HEAPDOT_VIEWER";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// On-disk configuration (user scope).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Viewer command launched by `render --view`.
    pub viewer: Option<String>,

    /// Directory for generated `dot<N>.dot` files.
    pub output_dir: Option<PathBuf>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(viewer) = &self.viewer {
            if viewer.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "viewer command cannot be blank".into(),
                ));
            }
        }
        if let Some(dir) = &self.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "output_dir cannot be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Effective configuration with environment overrides applied.
#[derive(Debug, Clone, Default)]
pub struct Config {
    file: FileConfig,
    viewer_env: Option<String>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// A file named by `$HEAPDOT_CONFIG` must exist; the default location
    /// may be absent, in which case defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read,
    /// parsed, or validated.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::read_file(Path::new(&path))?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                _ => FileConfig::default(),
            },
        };

        let viewer_env = std::env::var(VIEWER_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self { file, viewer_env })
    }

    /// Load configuration from an explicit file, no environment applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            file: Self::read_file(path)?,
            viewer_env: None,
        })
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The default config file location, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("heapdot").join("config.toml"))
    }

    /// The viewer command, environment override first.
    pub fn viewer(&self) -> Option<&str> {
        self.viewer_env.as_deref().or(self.file.viewer.as_deref())
    }

    /// The directory for generated output files.
    pub fn output_dir(&self) -> Option<&Path> {
        self.file.output_dir.as_deref()
    }
}
