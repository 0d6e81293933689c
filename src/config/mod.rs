//! Configuration: TOML file, environment and CLI, merged in that order.

pub mod columns;
pub mod loader;

pub use columns::{build_columns, default_columns, CellFormat, ColumnSpec};
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};
