//! Untyped topic records as they come out of content files.
//!
//! A `RawTopic` is any JSON object. Nothing about its fields is trusted until
//! the validator has looked at it; the only guarantee is that it is a record,
//! so handing the validator `null` or an array cannot happen.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Attempted to treat a non-object value as a topic record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected a topic record (object), found {found}")]
pub struct NotARecord {
    /// JSON kind that was found instead
    pub found: &'static str,
}

/// An unvalidated topic record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTopic(Map<String, Value>);

impl RawTopic {
    /// Look up a field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The `id` field if it is a string, for labeling diagnostics
    pub fn id_hint(&self) -> Option<&str> {
        self.get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
    }

    /// Access the underlying map
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for RawTopic {
    type Error = NotARecord;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NotARecord {
                found: json_kind(&other),
            }),
        }
    }
}

/// Human-readable name of a JSON value's type
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_converts() {
        let raw = RawTopic::try_from(json!({"id": "sharding", "title": "Sharding"})).unwrap();
        assert_eq!(raw.id_hint(), Some("sharding"));
        assert_eq!(raw.get("title"), Some(&json!("Sharding")));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = RawTopic::try_from(Value::Null).unwrap_err();
        assert_eq!(err.found, "null");

        let err = RawTopic::try_from(json!([1, 2])).unwrap_err();
        assert_eq!(err.found, "array");
    }

    #[test]
    fn test_id_hint_ignores_blank_and_non_string() {
        let raw = RawTopic::try_from(json!({"id": "   "})).unwrap();
        assert_eq!(raw.id_hint(), None);

        let raw = RawTopic::try_from(json!({"id": 42})).unwrap();
        assert_eq!(raw.id_hint(), None);
    }
}
