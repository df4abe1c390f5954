//! YAML parsing and formatting via `serde_yaml`.

use crate::error::DataIoResult;
use crate::types::Value;

/// Parse YAML text into a [`Value`].
///
/// Empty (or whitespace-only) input has no document and yields [`Value::Null`], not an empty
/// mapping.
pub fn parse_yaml(text: &str) -> DataIoResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_yaml::from_str(text)?)
}

pub fn format_yaml(value: &Value) -> DataIoResult<String> {
    Ok(serde_yaml::to_string(value)?)
}
