//! Stdin source for piped JSON Lines.
//!
//! A reader thread does the blocking reads and sends batches of lines over a
//! channel; [`StdinSource::poll`] drains whatever has arrived without blocking.

use super::log_decode_errors;
use crate::integration::process_lines;
use crate::model::{InputError, JsonRow};
use std::io::{BufRead, BufReader, IsTerminal, Read};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::{debug, info};

/// Upper bound on lines per message from the reader thread.
const MAX_BATCH: usize = 1024;

#[derive(Debug)]
enum ReaderMessage {
    Lines(Vec<String>),
    Eof,
    Failed(std::io::Error),
}

/// Live source over stdin (or any reader).
#[derive(Debug)]
pub struct StdinSource {
    rx: Receiver<ReaderMessage>,
    key_field: String,
    next_line: usize,
    complete: bool,
    skipped: usize,
}

impl StdinSource {
    /// Start reading stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is an interactive terminal: there is
    /// nothing piped, and reading would block on the user's keyboard.
    pub fn new(key_field: &str) -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(stdin, key_field))
    }

    /// Start reading any reader on a background thread.
    pub fn from_reader<R: Read + Send + 'static>(reader: R, key_field: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || read_lines(BufReader::new(reader), tx));
        Self {
            rx,
            key_field: key_field.to_string(),
            next_line: 1,
            complete: false,
            skipped: 0,
        }
    }

    /// Decode every line received since the last poll. Never blocks.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the reader failed and
    /// `InputError::Disconnected` if the reader thread vanished without reaching
    /// end of input. Either way the source is complete afterwards.
    pub fn poll(&mut self) -> Result<Vec<JsonRow>, InputError> {
        let mut rows = Vec::new();
        while !self.complete {
            match self.rx.try_recv() {
                Ok(ReaderMessage::Lines(lines)) => {
                    let count = lines.len();
                    let (mut decoded, errors) = process_lines(lines, self.next_line, &self.key_field);
                    log_decode_errors(&errors);
                    self.skipped += errors.len();
                    self.next_line += count;
                    rows.append(&mut decoded);
                }
                Ok(ReaderMessage::Eof) => {
                    info!(lines = self.next_line - 1, skipped = self.skipped, "Stdin reached EOF");
                    self.complete = true;
                }
                Ok(ReaderMessage::Failed(e)) => {
                    self.complete = true;
                    return Err(InputError::Io(e));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.complete = true;
                    return Err(InputError::Disconnected);
                }
            }
        }
        if !rows.is_empty() {
            debug!(rows = rows.len(), "Decoded stdin batch");
        }
        Ok(rows)
    }

    /// True once end of input (or a read failure) has been seen.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Lines that could not be decoded.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Reader thread body. Flushes a batch whenever the buffer runs dry, so a slow
/// producer's lines show up promptly and a fast one's arrive in bulk.
fn read_lines<R: Read>(mut reader: BufReader<R>, tx: Sender<ReaderMessage>) {
    let mut batch = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                if !batch.is_empty() {
                    let _ = tx.send(ReaderMessage::Lines(std::mem::take(&mut batch)));
                }
                let _ = tx.send(ReaderMessage::Eof);
                return;
            }
            Ok(_) => {
                batch.push(line.trim_end_matches(['\n', '\r']).to_string());
                if batch.len() >= MAX_BATCH || reader.buffer().is_empty() {
                    if tx.send(ReaderMessage::Lines(std::mem::take(&mut batch))).is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                if !batch.is_empty() {
                    let _ = tx.send(ReaderMessage::Lines(std::mem::take(&mut batch)));
                }
                let _ = tx.send(ReaderMessage::Failed(e));
                return;
            }
        }
    }
}
