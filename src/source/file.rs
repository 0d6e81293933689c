//! Read-once file source.

use super::log_decode_errors;
use crate::integration::decode_document;
use crate::model::{InputError, JsonRow};
use std::path::{Path, PathBuf};
use tracing::info;

/// Rows loaded from a JSON array or JSON Lines file.
///
/// The file is read and decoded at construction; the first poll hands out every
/// row and later polls return nothing.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    pending: Vec<JsonRow>,
    skipped: usize,
}

impl FileSource {
    /// Load and decode `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist and
    /// `InputError::Io` if it cannot be read.
    pub fn new(path: impl AsRef<Path>, key_field: &str) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let text = std::fs::read_to_string(path)?;
        let (rows, errors) = decode_document(&text, key_field);
        log_decode_errors(&errors);
        info!(path = %path.display(), rows = rows.len(), skipped = errors.len(), "Loaded file");

        Ok(Self {
            path: path.to_path_buf(),
            pending: rows,
            skipped: errors.len(),
        })
    }

    /// Take every row not yet handed out.
    pub fn drain_rows(&mut self) -> Vec<JsonRow> {
        std::mem::take(&mut self.pending)
    }

    /// Path the rows were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines or elements that could not be decoded.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
