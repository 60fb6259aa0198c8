// Request Envelope - the JSON payload handed to the external script

use serde::{Deserialize, Serialize};

/// Payload passed to the script as its single positional argument.
///
/// Wire form is camelCase: `{"fieldName": "...", "arguments": {...}}`.
/// Built fresh per invocation and scoped to one subprocess call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub field_name: String,
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

impl RequestEnvelope {
    pub fn new(
        field_name: impl Into<String>,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            arguments,
        }
    }

    /// Serialize to the wire form passed on the subprocess argument list.
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_form_uses_camel_case_keys() {
        let mut args = serde_json::Map::new();
        args.insert("input".to_string(), json!({"drvdetid": 123}));
        let envelope = RequestEnvelope::new("extendDrive", args);

        let wire = envelope.to_wire().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&wire).unwrap();

        assert_eq!(parsed["fieldName"], "extendDrive");
        assert_eq!(parsed["arguments"]["input"]["drvdetid"], 123);
    }

    #[test]
    fn test_wire_form_round_trips() {
        let mut args = serde_json::Map::new();
        args.insert("limit".to_string(), json!(10));
        let envelope = RequestEnvelope::new("listDrives", args);

        let wire = envelope.to_wire().unwrap();
        let back: RequestEnvelope = serde_json::from_str(&wire).unwrap();

        assert_eq!(back, envelope);
    }

    #[test]
    fn test_empty_arguments_serialize_as_empty_object() {
        let envelope = RequestEnvelope::new("ping", serde_json::Map::new());
        let wire = envelope.to_wire().unwrap();
        assert_eq!(wire, r#"{"fieldName":"ping","arguments":{}}"#);
    }
}
