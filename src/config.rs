//! Configuration Module
//! Layers built-in defaults, an optional config file and `TRENDLENS_*` environment variables.

use crate::charts::{report_size_is_valid, MAX_REPORT_SIDE};
use crate::data::NormalizeOptions;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "trendlens.toml";
pub const ENV_PREFIX: &str = "TRENDLENS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory scanned for `*.csv` candidates.
    pub data_dir: PathBuf,
    /// Seed for demo data; random when unset.
    pub seed: Option<u64>,
    pub clamp_sentiment: bool,
    pub validate_coordinates: bool,
    /// Where the PNG report is written.
    pub report_path: PathBuf,
    pub report_width: u32,
    pub report_height: u32,
    pub open_after_export: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            seed: None,
            clamp_sentiment: false,
            validate_coordinates: false,
            report_path: PathBuf::from("trendlens_report.png"),
            report_width: 1600,
            report_height: 1000,
            open_after_export: false,
        }
    }
}

impl DashboardConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist; otherwise `trendlens.toml` is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !report_size_is_valid(self.report_width, self.report_height) {
            return Err(ConfigError::InvalidValue {
                field: "report_width/report_height",
                reason: format!(
                    "{}x{} is outside 1..={MAX_REPORT_SIDE} per side",
                    self.report_width, self.report_height
                ),
            });
        }
        Ok(())
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            clamp_sentiment: self.clamp_sentiment,
            validate_coordinates: self.validate_coordinates,
        }
    }
}
