//! Application configuration.
//!
//! Handles loading and validating an optional `config.toml` next to where
//! the tool runs. Config files are sparse — override just the values you
//! want:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! model = "gemini-2.0-flash-preview-image-generation"
//! num_scenes = 6                     # Default requested scene count
//! output_root = "generated_stories"  # Where story directories are created
//! pdf_engine = "weasyprint"          # Layout engine command for PDFs
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Generation model recorded when nothing else is known (image-directory
/// reconstruction, stock config).
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Model identifier recorded into story metadata.
    pub model: String,
    /// Default requested scene count when the CLI does not override it.
    pub num_scenes: u32,
    /// Root directory story directories are created under.
    pub output_root: PathBuf,
    /// Command name of the external HTML-to-PDF layout engine.
    pub pdf_engine: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            model: DEFAULT_MODEL.to_string(),
            num_scenes: 6,
            output_root: PathBuf::from("generated_stories"),
            pdf_engine: "weasyprint".to_string(),
        }
    }
}

/// Load `config.toml` from a directory, falling back to stock defaults
/// when the file does not exist.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = dir.join("config.toml");
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: AppConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.num_scenes < 1 {
        return Err(ConfigError::Validation(
            "num_scenes must be at least 1".to_string(),
        ));
    }
    if config.pdf_engine.trim().is_empty() {
        return Err(ConfigError::Validation(
            "pdf_engine must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// A documented stock `config.toml` for the `gen-config` subcommand.
pub fn stock_config_toml() -> String {
    format!(
        r#"# picturebook configuration
# All options are optional - defaults shown below.

# Model identifier recorded into story metadata.
model = "{DEFAULT_MODEL}"

# Default requested scene count when the CLI does not override it.
num_scenes = 6

# Root directory story directories are created under.
output_root = "generated_stories"

# Command name of the external HTML-to-PDF layout engine.
pdf_engine = "weasyprint"
"#
    )
}
