//! Exported-asset JSON documents
//!
//! Baseline documents are the JSON form of a cooked Unreal asset. The tree is
//! kept as a [`serde_json::Value`] so unknown fields survive a load/patch/save
//! cycle untouched; `preserve_order` keeps keys in their exported order.
//!
//! - [`coerce`] turns definition text into typed JSON scalars
//! - [`path`] walks dotted property paths through nested property arrays
//! - [`table`] finds rows and exports by name

pub mod coerce;
pub mod path;
pub mod table;

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

pub use coerce::{coerce, coerce_typed, infer_value};
pub use path::{PathSegment, PropertyPath};
pub use table::{LookupMiss, NameMatch, RecordLocator, TableShape};

/// Read a baseline document from disk
///
/// # Errors
/// Returns an error if the file cannot be read, is not valid JSON, or its
/// root is not an object.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    parse_document(&content)
}

/// Parse a baseline document from a JSON string
///
/// # Errors
/// Returns an error if the text is not valid JSON or its root is not an object.
pub fn parse_document(content: &str) -> Result<Value> {
    let doc: Value = serde_json::from_str(content)?;
    if !doc.is_object() {
        return Err(Error::InvalidDocument {
            message: format!("expected a JSON object at the root, found {}", kind_name(&doc)),
        });
    }
    Ok(doc)
}

/// Serialize a document with 2-space indentation
///
/// Non-ASCII characters are written as-is, matching what the asset
/// converter produces, so patched files diff cleanly against the baseline.
pub fn to_pretty_string(doc: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Write a document to disk with 2-space indentation
///
/// # Errors
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_document<P: AsRef<Path>>(path: P, doc: &Value) -> Result<()> {
    let json = to_pretty_string(doc)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a string field from a JSON object (`Name`, `ObjectName`, ...)
pub(crate) fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Short type name for log and error messages
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
