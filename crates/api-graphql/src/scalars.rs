//! AWS Scalar Codecs
//!
//! AWSDate and AWSDateTime carry real conversion logic; the remaining AWS
//! scalars are registered as opaque pass-through types. Invalid date strings
//! are accepted silently and forwarded unchanged (known limitation inherited
//! from the original contract).

use async_graphql::Value;
use chrono::{DateTime, NaiveDate, Utc};

/// Wire format for AWSDateTime (ISO-8601 with milliseconds, UTC).
pub const AWS_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Wire format for AWSDate (date-only portion).
pub const AWS_DATE_FORMAT: &str = "%Y-%m-%d";

/// Serialize an AWSDateTime leaf value.
///
/// A string that parses as RFC 3339 is re-emitted in the canonical UTC wire
/// form; everything else (pre-serialized or unparseable) passes through
/// unchanged.
pub fn serialize_datetime(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_datetime_value(&s) {
            Some(dt) => Value::String(dt.format(AWS_DATETIME_FORMAT).to_string()),
            None => Value::String(s),
        },
        other => other,
    }
}

/// Serialize an AWSDate leaf value.
///
/// A full timestamp is reduced to its date portion; date-only strings and
/// anything unparseable pass through unchanged.
pub fn serialize_date(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_datetime_value(&s) {
            Some(dt) => Value::String(dt.format(AWS_DATE_FORMAT).to_string()),
            None => Value::String(s),
        },
        other => other,
    }
}

/// Parse an external AWSDateTime input string.
pub fn parse_datetime_value(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an external AWSDate input string (date-only or full timestamp).
pub fn parse_date_value(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, AWS_DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime_value(raw).map(|dt| dt.date_naive()))
}

/// Input validator for the date scalars: only the literal kind is checked,
/// the content is not (dates are forwarded to the script verbatim).
pub fn is_string_input(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

/// Output-side codec attached to a leaf field based on its SDL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafCodec {
    Passthrough,
    AwsDate,
    AwsDateTime,
}

impl LeafCodec {
    pub fn for_type_name(name: &str) -> Self {
        match name {
            "AWSDate" => LeafCodec::AwsDate,
            "AWSDateTime" => LeafCodec::AwsDateTime,
            _ => LeafCodec::Passthrough,
        }
    }

    /// Apply the codec, mapping over list values element-wise.
    pub fn apply(self, value: Value) -> Value {
        match value {
            Value::List(items) => {
                Value::List(items.into_iter().map(|item| self.apply(item)).collect())
            }
            other => match self {
                LeafCodec::Passthrough => other,
                LeafCodec::AwsDate => serialize_date(other),
                LeafCodec::AwsDateTime => serialize_datetime(other),
            },
        }
    }
}
