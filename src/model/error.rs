//! Error types for rowport.
//!
//! Errors are split by how they are handled:
//!
//! - [`GridError`] - invalid grid configuration. Fatal, reported by the constructor.
//! - [`AccessorError`] - a column accessor could not produce a value for a row. Never
//!   propagated; the cell renders a placeholder and the failure is logged.
//! - [`InputError`] - reading rows from a file or stdin failed.
//! - [`AppError`] - top-level error for the binary, wrapping the others via `From`.
//!
//! Stale visible ranges (a range computed against a row count that has since shrunk)
//! are not errors at all: the window cache re-clamps them before indexing.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// The grid could not be constructed from the resolved configuration.
    #[error("Invalid grid configuration: {0}")]
    Grid(#[from] GridError),

    /// Failed to read rows from the input source.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Configuration errors detected when a grid is constructed.
///
/// These are the only fatal errors of the rendering core. Nothing is deferred
/// into render: a grid that constructs successfully never fails afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The column descriptor list is empty.
    #[error("At least one column is required")]
    NoColumns,

    /// A column has an empty (or whitespace-only) label.
    #[error("Column {index} has an empty label")]
    EmptyLabel {
        /// Position of the offending column.
        index: usize,
    },

    /// A column has zero width.
    #[error("Column {index} ('{label}') has zero width")]
    ZeroWidth {
        /// Position of the offending column.
        index: usize,
        /// Label of the offending column.
        label: String,
    },

    /// Fixed or estimated row height is zero.
    #[error("Row height must be at least 1")]
    ZeroRowHeight,
}

/// Failure of a single column accessor for a single row.
///
/// Recovered locally by the column model: the cell shows a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessorError {
    /// The row has no value at the accessed field.
    #[error("Missing field '{0}'")]
    MissingField(String),

    /// The row has a value, but not of a type this column can display.
    #[error("Field '{field}' has unexpected type (expected {expected})")]
    UnexpectedType {
        /// Field path that was accessed.
        field: String,
        /// Human-readable description of the accepted type.
        expected: &'static str,
    },

    /// The value could not be formatted (e.g. an unparseable date).
    #[error("Cannot format '{raw}': {reason}")]
    Format {
        /// Raw value as found in the row.
        raw: String,
        /// Why formatting failed.
        reason: String,
    },

    /// The accessor produced a value that cannot be displayed (e.g. NaN).
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors from reading row data.
#[derive(Debug, Error)]
pub enum InputError {
    /// File specified but does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No file given and stdin is an interactive terminal.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// The stdin reader thread stopped unexpectedly.
    #[error("Stdin reader disconnected")]
    Disconnected,

    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single line (or array element) that could not be decoded into a row.
///
/// Non-fatal: logged and skipped by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not valid JSON.
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number (or array position).
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Valid JSON, but not an object.
    #[error("Row at line {line} is not a JSON object")]
    NotAnObject {
        /// 1-based line number (or array position).
        line: usize,
    },
}
