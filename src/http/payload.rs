//! Turning a raw request body into the value that gets stored.

use serde_json::Value;

use crate::config::PayloadPolicy;
use crate::error::LoggerError;
use crate::storage::{nesting_depth, MAX_MESSAGE_DEPTH};

/// Parse `raw` as a JSON payload.
///
/// Empty bodies are `NoData`. Under [`PayloadPolicy::Compat`] the body `0`
/// is also `NoData` and any falsy value is `InvalidJson`, as the PHP
/// endpoint behaved. [`PayloadPolicy::Strict`] only rejects parse failures.
/// Under both policies a value nested deeper than [`MAX_MESSAGE_DEPTH`] is
/// `InvalidJson`, since storing it would make the log unreadable.
pub fn parse_payload(raw: &[u8], policy: PayloadPolicy) -> Result<Value, LoggerError> {
    if raw.is_empty() || (policy == PayloadPolicy::Compat && raw == b"0") {
        return Err(LoggerError::NoData);
    }

    let value: Value = serde_json::from_slice(raw).map_err(|_| LoggerError::InvalidJson)?;

    if nesting_depth(&value) > MAX_MESSAGE_DEPTH {
        return Err(LoggerError::InvalidJson);
    }

    if policy == PayloadPolicy::Compat && !is_truthy(&value) {
        return Err(LoggerError::InvalidJson);
    }

    Ok(value)
}

/// PHP truthiness of a decoded JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
