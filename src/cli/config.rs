//! Configuration file
//!
//! ```json
//! { "catalog_path": "catalog.json", "fill_factor": 90, "log_level": "info", "output": "text" }
//! ```
//!
//! A relative `catalog_path` is resolved against the config file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::observability::Severity;

use super::errors::{CliError, CliResult};

/// How results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Derivation trace, one line per step
    #[default]
    Text,
    /// Single JSON object
    Json,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog snapshot file (required)
    pub catalog_path: String,

    /// Default fill factor (optional, absent means full pages)
    #[serde(default)]
    pub fill_factor: Option<u32>,

    /// Minimum log severity (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format (optional, default "text")
    #[serde(default)]
    pub output: OutputFormat,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config = Self::parse(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.catalog_path.trim().is_empty() {
            return Err(CliError::config_error("catalog_path must not be empty"));
        }

        if let Some(ff) = self.fill_factor {
            if !(1..=100).contains(&ff) {
                return Err(CliError::config_error(format!(
                    "Invalid fill_factor: {}. Must be between 1 and 100.",
                    ff
                )));
            }
        }

        self.log_severity()?;

        Ok(())
    }

    /// Minimum log severity
    pub fn log_severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::config_error)
    }

    /// Catalog snapshot path, resolved against the config file's directory
    pub fn catalog_file(&self) -> PathBuf {
        let path = Path::new(&self.catalog_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
