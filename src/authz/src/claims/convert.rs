//! Value conversion between serde_json::Value and claim values

use super::types::ClaimValue;
use serde_json::Value as JsonValue;

impl From<JsonValue> for ClaimValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => ClaimValue::Null,
            JsonValue::Bool(b) => ClaimValue::Boolean(b),
            JsonValue::Number(n) => ClaimValue::Number(n),
            JsonValue::String(s) => ClaimValue::String(s),
            JsonValue::Array(arr) => ClaimValue::Array(arr.into_iter().map(ClaimValue::from).collect()),
            JsonValue::Object(obj) => ClaimValue::Object(obj),
        }
    }
}

impl ClaimValue {
    /// Convert to a serde_json::Value, keeping element types
    pub fn to_json(&self) -> JsonValue {
        match self {
            ClaimValue::Null => JsonValue::Null,
            ClaimValue::Boolean(b) => JsonValue::Bool(*b),
            ClaimValue::Number(n) => JsonValue::Number(n.clone()),
            ClaimValue::String(s) => JsonValue::String(s.clone()),
            ClaimValue::Array(items) => JsonValue::Array(items.iter().map(ClaimValue::to_json).collect()),
            ClaimValue::Object(obj) => JsonValue::Object(obj.clone()),
        }
    }

    /// Text form used when the value is forwarded on its own
    ///
    /// Strings are verbatim, null is empty, everything else is compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            ClaimValue::Null => String::new(),
            ClaimValue::String(s) => s.clone(),
            ClaimValue::Boolean(b) => b.to_string(),
            ClaimValue::Number(n) => n.to_string(),
            ClaimValue::Array(_) | ClaimValue::Object(_) => self.to_json().to_string(),
        }
    }
}
