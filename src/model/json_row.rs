//! Rows decoded from JSON.
//!
//! The host shell reads arbitrary JSON objects; columns pick fields out of them by
//! dotted path (`user.name`, `tags.0`).

use super::error::DecodeError;
use super::row::{fingerprint_of, Row, RowKey};
use serde_json::Value;
use std::sync::Arc;

/// A decoded JSON object with precomputed identity.
///
/// Cloning is cheap: the value is shared.
#[derive(Debug, Clone)]
pub struct JsonRow {
    key: RowKey,
    fingerprint: u64,
    value: Arc<Value>,
}

impl JsonRow {
    /// Wrap a decoded value.
    ///
    /// The key is read from `key_field`. Rows without a usable key fall back to
    /// `#<ordinal>`, their position in the stream, so they still get a stable identity.
    pub fn new(value: Value, key_field: &str, ordinal: usize) -> Self {
        let key = match lookup(&value, key_field) {
            Some(Value::String(s)) if !s.is_empty() => RowKey::new(s.clone()),
            Some(Value::Number(n)) => RowKey::new(n.to_string()),
            _ => RowKey::new(format!("#{ordinal}")),
        };
        let fingerprint = fingerprint_of(&value.to_string());
        Self {
            key,
            fingerprint,
            value: Arc::new(value),
        }
    }

    /// Decode one JSON Lines line.
    ///
    /// `line_number` is 1-based and doubles as the fallback key ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the line is not a JSON object.
    pub fn from_line(line: &str, line_number: usize, key_field: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| DecodeError::InvalidJson {
                line: line_number,
                message: e.to_string(),
            })?;
        Self::from_value(value, line_number, key_field)
    }

    /// Accept an already-parsed value, rejecting non-objects.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnObject`] for scalars and arrays.
    pub fn from_value(value: Value, line_number: usize, key_field: &str) -> Result<Self, DecodeError> {
        if !value.is_object() {
            return Err(DecodeError::NotAnObject { line: line_number });
        }
        Ok(Self::new(value, key_field, line_number))
    }

    /// The decoded JSON value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Look up a field by dotted path. `None` for missing fields and JSON `null`.
    pub fn field(&self, path: &str) -> Option<&Value> {
        lookup(&self.value, path)
    }
}

impl Row for JsonRow {
    fn key(&self) -> RowKey {
        self.key.clone()
    }

    fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let found = path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })?;
    if found.is_null() {
        None
    } else {
        Some(found)
    }
}
