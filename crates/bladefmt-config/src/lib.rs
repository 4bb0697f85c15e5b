//! Configuration for bladefmt.
//!
//! Parses `bladefmt.toml` files with serde into [`FormatOptions`]. Files are
//! only read from an explicit path; there is no discovery.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [format]
//! indent_size = 2
//! max_line_length = 100
//! directive_closing_style = "as-written"
//! ```

use std::path::{Path, PathBuf};

use bladefmt_core::FormatOptions;
use serde::Deserialize;

/// Conventional configuration filename.
pub const CONFIG_FILENAME: &str = "bladefmt.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub indent_size: Option<usize>,
    pub use_tabs: Option<bool>,
    pub max_line_length: Option<usize>,
    pub sort_attributes: Option<bool>,
    pub preserve_blank_lines: Option<usize>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Formatter options.
    pub format: FormatOptions,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// Without `config_path` the defaults are used. CLI settings are applied
    /// after loading, and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if `config_path` doesn't exist, parsing fails, or the
    /// resulting options are out of range.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_from_file(path)?
            }
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let format = &mut self.format;
        if let Some(indent_size) = settings.indent_size {
            format.indent_size = indent_size;
        }
        if let Some(use_tabs) = settings.use_tabs {
            format.use_tabs = use_tabs;
        }
        if let Some(max_line_length) = settings.max_line_length {
            format.max_line_length = max_line_length;
        }
        if let Some(sort_attributes) = settings.sort_attributes {
            format.sort_attributes = sort_attributes;
        }
        if let Some(preserve_blank_lines) = settings.preserve_blank_lines {
            format.preserve_blank_lines = preserve_blank_lines;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_INDENT: usize = 16;
        const MIN_LINE_LENGTH: usize = 20;
        const MAX_BLANK_LINES: usize = 10;

        let format = &self.format;
        if !(1..=MAX_INDENT).contains(&format.indent_size) {
            return Err(ConfigError::Validation(format!(
                "format.indent_size must be between 1 and {MAX_INDENT}"
            )));
        }
        if format.max_line_length < MIN_LINE_LENGTH {
            return Err(ConfigError::Validation(format!(
                "format.max_line_length must be at least {MIN_LINE_LENGTH}"
            )));
        }
        if format.preserve_blank_lines > MAX_BLANK_LINES {
            return Err(ConfigError::Validation(format!(
                "format.preserve_blank_lines cannot exceed {MAX_BLANK_LINES}"
            )));
        }
        Ok(())
    }
}
