//! Table styling.

use ratatui::style::{Color, Modifier, Style};

/// Whether color output is enabled.
///
/// Disabled by the `--no-color` flag or by a `NO_COLOR` environment variable
/// with any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Colors are off if `--no-color` was given or `NO_COLOR` is set.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Whether colored output is allowed.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

/// Styles for the grid and the status line.
///
/// Bold survives `NO_COLOR`; everything color-related falls back to the
/// terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStyles {
    /// Header labels.
    pub header: Style,
    /// Ordinary body cells.
    pub cell: Style,
    /// Cells whose value could not be resolved.
    pub placeholder: Style,
    /// Status line text.
    pub status: Style,
    /// Status line marker while stdin is still streaming.
    pub live: Style,
}

impl TableStyles {
    /// Styles for the given color setting.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let header = Style::default().add_modifier(Modifier::BOLD);
        if config.colors_enabled() {
            Self {
                header: header.fg(Color::Cyan),
                cell: Style::default(),
                placeholder: Style::default().fg(Color::DarkGray),
                status: Style::default().fg(Color::Gray),
                live: Style::default().fg(Color::Green),
            }
        } else {
            Self {
                header,
                cell: Style::default(),
                placeholder: Style::default(),
                status: Style::default(),
                live: Style::default(),
            }
        }
    }
}

impl Default for TableStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}
