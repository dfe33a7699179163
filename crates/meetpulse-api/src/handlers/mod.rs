//! HTTP handlers for meetpulse-api.
//!
//! Request bodies are accepted as loose JSON objects and validated here so
//! that missing fields produce the `{"message": ...}` 400 bodies clients
//! expect rather than extractor rejections.

pub mod feedback;
pub mod health;
pub mod insights;
pub mod meetings;
pub mod profile;

use meetpulse_core::{id_from_value, JsonMap};
use serde_json::Value as JsonValue;

/// Non-empty string value of `key`, if present.
fn required_str<'a>(body: &'a JsonMap, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(JsonValue::as_str)
        .filter(|v| !v.trim().is_empty())
}

/// Identifier value of `key` as a string. Numeric ids are accepted and
/// normalized so that lookups and feedback matching compare strings.
fn required_id(body: &JsonMap, key: &str) -> Option<String> {
    body.get(key)
        .and_then(id_from_value)
        .filter(|id| !id.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str() {
        let body = json!({"a": "x", "b": "  ", "c": 5}).as_object().cloned().unwrap();
        assert_eq!(required_str(&body, "a"), Some("x"));
        assert_eq!(required_str(&body, "b"), None);
        assert_eq!(required_str(&body, "c"), None);
        assert_eq!(required_str(&body, "d"), None);
    }

    #[test]
    fn test_required_id_normalizes_numbers() {
        let body = json!({"id": 1712345678901_i64, "s": "m1", "e": "", "b": true})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(required_id(&body, "id").as_deref(), Some("1712345678901"));
        assert_eq!(required_id(&body, "s").as_deref(), Some("m1"));
        assert_eq!(required_id(&body, "e"), None);
        assert_eq!(required_id(&body, "b"), None);
    }
}
