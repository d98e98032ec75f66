//! The split config document and its canonical text form.
//!
//! Only `splitIds` is interpreted. Every other field is carried through
//! edits untouched and in its original key order.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use splits_core::error::{Result, SplitsError};
use thiserror::Error;

/// Field holding the ordered split list.
pub const SPLIT_IDS_FIELD: &str = "splitIds";

const INDENT: &[u8] = b"    ";

/// The canonical text could not be read as a split config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed split config at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

impl From<ParseError> for SplitsError {
    fn from(err: ParseError) -> Self {
        SplitsError::Parse {
            message: err.message,
            line: err.line,
            column: err.column,
        }
    }
}

/// Parsed view of the canonical text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitConfig {
    fields: Map<String, Value>,
}

impl SplitConfig {
    pub fn parse(text: &str) -> std::result::Result<Self, ParseError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ParseError {
                message: format!("expected a JSON object, found {}", json_kind(&other)),
                line: 1,
                column: 1,
            }),
        }
    }

    /// Serialize with 4-space indentation and a trailing newline.
    pub fn to_canonical_text(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        self.fields.serialize(&mut serializer)?;
        buf.push(b'\n');
        String::from_utf8(buf)
            .map_err(|e| SplitsError::Internal(format!("serializer produced invalid UTF-8: {e}")))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn category_name(&self) -> Option<&str> {
        self.fields.get("categoryName").and_then(Value::as_str)
    }

    pub fn game_name(&self) -> Option<&str> {
        self.fields.get("gameName").and_then(Value::as_str)
    }

    /// Raw `splitIds` elements, `None` when the field is absent or not an array.
    pub fn split_values(&self) -> Option<&[Value]> {
        self.fields
            .get(SPLIT_IDS_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// String split ids; non-string elements are left out of this view.
    pub fn split_ids(&self) -> Option<Vec<&str>> {
        self.split_values()
            .map(|values| values.iter().filter_map(Value::as_str).collect())
    }

    fn split_values_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.fields
            .get_mut(SPLIT_IDS_FIELD)
            .and_then(Value::as_array_mut)
    }

    /// Returns `true` if the document changed.
    pub fn replace_split(&mut self, index: usize, new_id: &str) -> bool {
        let Some(slot) = self.split_values_mut().and_then(|ids| ids.get_mut(index)) else {
            return false;
        };
        if slot.as_str() == Some(new_id) {
            return false;
        }
        *slot = Value::String(new_id.to_string());
        true
    }

    /// Returns `true` if the document changed.
    pub fn remove_split(&mut self, index: usize) -> bool {
        match self.split_values_mut() {
            Some(ids) if index < ids.len() => {
                ids.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Appends `id`; creates `splitIds` when absent. A non-array `splitIds`
    /// is user data and is left alone.
    pub fn push_split(&mut self, id: &str) -> bool {
        match self.fields.get_mut(SPLIT_IDS_FIELD) {
            Some(Value::Array(ids)) => {
                ids.push(Value::String(id.to_string()));
                true
            }
            Some(_) => false,
            None => {
                self.fields.insert(
                    SPLIT_IDS_FIELD.to_string(),
                    Value::Array(vec![Value::String(id.to_string())]),
                );
                true
            }
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
