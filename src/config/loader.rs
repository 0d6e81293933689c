//! Configuration file loading with precedence handling.

use super::columns::{build_columns, default_columns, ColumnSpec};
use crate::model::{ColumnDescriptor, GridError, JsonRow};
use crate::view_state::{GridConfig, DEFAULT_OVERSCAN};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ROWPORT_CONFIG";

/// Environment variable overriding the overscan count.
pub const OVERSCAN_ENV: &str = "ROWPORT_OVERSCAN";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// File exists but could not be read.
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O message.
        reason: String,
    },

    /// Invalid TOML, or TOML that does not match the schema.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// File that failed to parse.
        path: PathBuf,
        /// TOML parser message.
        reason: String,
    },

    /// A `[[columns]]` entry cannot be turned into a column.
    #[error("Invalid column '{label}': {reason}")]
    InvalidColumn {
        /// Label of the offending column.
        label: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; anything unset falls back to [`ResolvedConfig::default`].
/// Lives at `~/.config/rowport/config.toml` by default.
///
/// ```toml
/// key_field = "id"
/// overscan = 4
///
/// [[columns]]
/// label = "Preço"
/// field = "price"
/// width = 10
/// align = "right"
/// format = "currency"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Field holding each row's stable key.
    #[serde(default)]
    pub key_field: Option<String>,

    /// Rows materialized beyond each visible edge.
    #[serde(default)]
    pub overscan: Option<usize>,

    /// Fixed row height, or the estimate in variable mode (terminal lines).
    #[serde(default)]
    pub row_height: Option<u32>,

    /// Measure rows instead of assuming a fixed height.
    #[serde(default)]
    pub variable_height: Option<bool>,

    /// Path to the tracing log file.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Column layout. Replaces the default columns entirely when present.
    #[serde(default)]
    pub columns: Option<Vec<ColumnSpec>>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Field holding the stable row key.
    pub key_field: String,
    /// Rows rendered beyond each viewport edge.
    pub overscan: usize,
    /// Row height in lines (the estimate in variable mode).
    pub row_height: u32,
    /// Size rows by their content.
    pub variable_height: bool,
    /// Log file location.
    pub log_file_path: PathBuf,
    /// Displayed columns, left to right.
    pub columns: Vec<ColumnSpec>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            key_field: "id".to_string(),
            overscan: DEFAULT_OVERSCAN,
            row_height: 1,
            variable_height: false,
            log_file_path: default_log_path(),
            columns: default_columns(),
        }
    }
}

impl ResolvedConfig {
    /// Grid construction parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZeroRowHeight`] if `row_height` is 0.
    pub fn grid_config(&self) -> Result<GridConfig, GridError> {
        GridConfig::new(self.overscan, self.row_height, self.variable_height)
    }

    /// Column descriptors for JSON rows.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidColumn`] for an unusable column spec.
    pub fn column_descriptors(&self) -> Result<Vec<ColumnDescriptor<JsonRow>>, ConfigError> {
        build_columns(&self.columns)
    }
}

/// Default log file path: `~/.local/state/rowport/rowport.log` on Linux.
///
/// Falls back to the current directory when no state directory is known.
pub fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .map(|dir| dir.join("rowport").join("rowport.log"))
        .unwrap_or_else(|| PathBuf::from("rowport.log"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Default config file path: `~/.config/rowport/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rowport").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` (CLI `--config`)
/// 2. `ROWPORT_CONFIG` environment variable
/// 3. Default path
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Apply environment variable overrides.
///
/// `ROWPORT_OVERSCAN` replaces the overscan count. Unparseable values are
/// logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(OVERSCAN_ENV) {
        match raw.trim().parse::<usize>() {
            Ok(overscan) => config.overscan = overscan,
            Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid {OVERSCAN_ENV}"),
        }
    }
    config
}

/// Merge config file into defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        key_field: config.key_field.unwrap_or(defaults.key_field),
        overscan: config.overscan.unwrap_or(defaults.overscan),
        row_height: config.row_height.unwrap_or(defaults.row_height),
        variable_height: config.variable_height.unwrap_or(defaults.variable_height),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        columns: config.columns.unwrap_or(defaults.columns),
    }
}

/// Apply CLI argument overrides (highest precedence).
///
/// Only flags the user actually passed are applied.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    overscan_override: Option<usize>,
    row_height_override: Option<u32>,
    variable_height_flag: bool,
) -> ResolvedConfig {
    if let Some(overscan) = overscan_override {
        config.overscan = overscan;
    }
    if let Some(row_height) = row_height_override {
        config.row_height = row_height;
    }
    if variable_height_flag {
        config.variable_height = true;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
