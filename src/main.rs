//! rowport - Entry Point

use clap::Parser;
use rowport::view::{ColorConfig, TableStyles};
use rowport::view_state::VirtualGrid;
use std::path::PathBuf;
use tracing::info;

/// rowport - scroll through large JSON tables in the terminal
#[derive(Parser, Debug)]
#[command(name = "rowport")]
#[command(version)]
#[command(about = "Virtualized table viewer for JSON arrays and JSON Lines")]
pub struct Args {
    /// JSON array or JSON Lines file (reads JSON Lines from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Rows rendered beyond each edge of the viewport
    #[arg(long)]
    pub overscan: Option<usize>,

    /// Row height in terminal lines (the estimate with --variable-height)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub row_height: Option<u32>,

    /// Size rows by their content (multi-line cells)
    #[arg(long)]
    pub variable_height: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = rowport::config::load_config_with_precedence(args.config.clone())?;
        let merged = rowport::config::merge_config(config_file);
        let with_env = rowport::config::apply_env_overrides(merged);
        rowport::config::apply_cli_overrides(
            with_env,
            args.overscan,
            args.row_height,
            args.variable_height,
        )
    };

    rowport::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let grid = VirtualGrid::new(config.column_descriptors()?, config.grid_config()?)?;
    let input_source = rowport::source::detect_input_source(args.file.clone(), &config.key_field)?;
    let styles = TableStyles::with_color_config(ColorConfig::from_env_and_args(args.no_color));

    rowport::view::run_with_source(input_source, grid, styles)?;

    Ok(())
}
