//! Pure decoding functions used by the data sources.
//!
//! Everything here works on text already read from somewhere, so it is testable
//! without I/O.

use crate::model::{DecodeError, JsonRow};
use serde_json::Value;

/// Decode JSON Lines into rows.
///
/// Blank lines are skipped. Malformed lines are returned as errors and do not
/// stop decoding. `starting_line_number` is the 1-based number of the first line.
pub fn process_lines<I, S>(
    lines: I,
    starting_line_number: usize,
    key_field: &str,
) -> (Vec<JsonRow>, Vec<DecodeError>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let line_number = starting_line_number + index;
        match JsonRow::from_line(line, line_number, key_field) {
            Ok(row) => rows.push(row),
            Err(err) => errors.push(err),
        }
    }

    (rows, errors)
}

/// Decode a whole document: a JSON array of objects, or JSON Lines.
///
/// A document whose first non-blank character is `[` is treated as an array;
/// array positions (1-based) stand in for line numbers.
pub fn decode_document(text: &str, key_field: &str) -> (Vec<JsonRow>, Vec<DecodeError>) {
    if !text.trim_start().starts_with('[') {
        return process_lines(text.lines(), 1, key_field);
    }

    let values: Vec<Value> = match serde_json::from_str(text) {
        Ok(values) => values,
        Err(e) => {
            return (
                Vec::new(),
                vec![DecodeError::InvalidJson {
                    line: e.line(),
                    message: e.to_string(),
                }],
            )
        }
    };

    let mut rows = Vec::with_capacity(values.len());
    let mut errors = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        match JsonRow::from_value(value, index + 1, key_field) {
            Ok(row) => rows.push(row),
            Err(err) => errors.push(err),
        }
    }
    (rows, errors)
}
