//! Row input sources.
//!
//! - File: a JSON array or JSON Lines file, read once
//! - Stdin: piped JSON Lines, streamed as they arrive

use crate::model::{DecodeError, InputError, JsonRow};
use std::path::PathBuf;
use tracing::warn;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Unified input source.
#[derive(Debug)]
pub enum InputSource {
    /// A file read once at startup.
    File(FileSource),
    /// JSON Lines streamed from stdin.
    Stdin(StdinSource),
}

impl InputSource {
    /// Rows that arrived since the last poll. Non-blocking.
    ///
    /// - File: every row on the first call, nothing afterwards
    /// - Stdin: whatever the reader thread has delivered
    ///
    /// # Errors
    ///
    /// Returns `InputError` if reading stdin failed.
    pub fn poll(&mut self) -> Result<Vec<JsonRow>, InputError> {
        match self {
            InputSource::File(f) => Ok(f.drain_rows()),
            InputSource::Stdin(s) => s.poll(),
        }
    }

    /// True while more rows may still arrive.
    pub fn is_live(&self) -> bool {
        match self {
            InputSource::File(_) => false,
            InputSource::Stdin(s) => !s.is_complete(),
        }
    }

    /// Rows dropped because they could not be decoded.
    pub fn skipped(&self) -> usize {
        match self {
            InputSource::File(f) => f.skipped(),
            InputSource::Stdin(s) => s.skipped(),
        }
    }
}

/// Pick the source: the file if one is given, otherwise piped stdin.
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is given and stdin is a terminal,
/// `InputError::FileNotFound` if the file does not exist, and `InputError::Io`
/// if it cannot be read.
pub fn detect_input_source(file: Option<PathBuf>, key_field: &str) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path, key_field)?)),
        None => Ok(InputSource::Stdin(StdinSource::new(key_field)?)),
    }
}

pub(crate) fn log_decode_errors(errors: &[DecodeError]) {
    for error in errors {
        warn!(%error, "Skipping undecodable row");
    }
}
