//! Uniform result wrapper returned by every tool call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{"success": true, "data": ...}` or `{"success": false, "error": "...", "details": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            details: None,
        }
    }

    pub fn err_with_details(error: impl Into<String>, details: Value) -> Self {
        Self {
            details: Some(details),
            ..Self::err(error)
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Pretty-printed JSON text.
    pub fn to_json_string(&self) -> String {
        // Serializing a struct of Values cannot fail
        serde_json::to_string_pretty(self).unwrap_or_else(|_| String::from("{\"success\": false}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_shape() {
        let envelope = Envelope::ok(json!({"lat": 42.36}));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value, json!({"success": true, "data": {"lat": 42.36}}));
        assert!(envelope.is_success());
    }

    #[test]
    fn test_ok_with_null_data_keeps_key() {
        let value = serde_json::to_value(Envelope::ok(Value::Null)).unwrap();
        assert_eq!(value, json!({"success": true, "data": null}));
    }

    #[test]
    fn test_err_shape() {
        let value = serde_json::to_value(Envelope::err("latitude out of range")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "latitude out of range"}));
    }

    #[test]
    fn test_err_with_details() {
        let envelope = Envelope::err_with_details("API Error: 400", json!({"errorCode": "X1"}));
        let text = envelope.to_json_string();
        let parsed: Envelope = serde_json::from_str(&text).unwrap();

        assert!(!parsed.success);
        assert_eq!(parsed.details, Some(json!({"errorCode": "X1"})));
    }
}
