// Response Extractor
// Isolates the JSON result from noisy subprocess stdout

use crate::domain::BridgeError;
use serde_json::Value;

/// Decode the script result from raw stdout.
///
/// The payload is expected on the final non-empty line; the script may emit
/// diagnostic prints on earlier lines and those are ignored. This is a
/// deliberate tolerance for noisy output, not a structured-logging protocol.
pub fn extract(stdout: &str) -> Result<Value, BridgeError> {
    let last_line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| BridgeError::ResultParse("stdout was empty".to_string()))?;

    serde_json::from_str(last_line).map_err(|e| BridgeError::ResultParse(e.to_string()))
}

/// Unwrap a decoded script response down to the requested field's value.
///
/// Scripts are allowed to answer in three shapes, checked in order:
/// a GraphQL-response envelope `{"data": {"<field>": ...}}`, a bare
/// `{"<field>": ...}` object, or the raw value itself. A `null` at either
/// wrapper level is treated as absent, matching the original truthiness
/// checks, so the raw value is returned instead.
///
/// Corollary: a raw response object that happens to contain a key equal to
/// the field name is indistinguishable from the bare shape and gets
/// unwrapped. Scripts answering with a raw object must avoid that key.
pub fn unwrap_field(value: Value, field_name: &str) -> Value {
    if let Value::Object(map) = &value {
        if let Some(Value::Object(data)) = map.get("data") {
            if let Some(inner) = data.get(field_name) {
                if !inner.is_null() {
                    return inner.clone();
                }
            }
        }
        if let Some(inner) = map.get(field_name) {
            if !inner.is_null() {
                return inner.clone();
            }
        }
    }
    value
}
