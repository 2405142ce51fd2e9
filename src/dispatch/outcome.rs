//! Classified results of a dispatched request.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dispatch::error::DispatchError;

/// Response body, parsed according to the declared content type
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// Field of a JSON object payload
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.as_json()?.get(key)
    }

    /// Non-empty string field
    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Server-supplied human readable message
    pub fn message(&self) -> Option<&str> {
        self.text_field("message")
    }

    /// Truthiness of a field; missing fields and text payloads are false
    pub fn flag(&self, key: &str) -> bool {
        self.field(key).map(truthy).unwrap_or(false)
    }

    /// Decode a JSON payload into a typed response shape
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        let value = self.as_json()?;
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("Response did not match expected shape: {}", e);
                None
            }
        }
    }
}

/// JavaScript-style truthiness, which is what the site's own scripts use
/// to read boolean fields.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A request that did not succeed.
///
/// `status` is the HTTP status, or 0 when no usable response was obtained
/// (connection failure, aborted request, malformed body).
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub status: u16,
    pub message: String,
    pub payload: Option<Payload>,
}

impl Failure {
    #[cfg(test)]
    pub fn is_transport(&self) -> bool {
        self.status == 0
    }
}

/// Exactly one of these is produced per dispatched request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Payload),
    Failure(Failure),
}

impl Outcome {
    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Outcome::Success(payload) => Some(payload),
            Outcome::Failure(failure) => failure.payload.as_ref(),
        }
    }
}

/// Turn a received response into an outcome.
///
/// Kept free of I/O so every classification rule can be checked directly.
pub fn classify(
    status: u16,
    reason: Option<&str>,
    content_type: &str,
    body: String,
    request_failed: &str,
) -> Result<Outcome, DispatchError> {
    let payload = if content_type.to_ascii_lowercase().contains("application/json") {
        Payload::Json(serde_json::from_str(&body)?)
    } else {
        Payload::Text(body)
    };

    if (200..300).contains(&status) {
        return Ok(Outcome::Success(payload));
    }

    let message = payload
        .message()
        .or_else(|| payload.text_field("error"))
        .or(reason.filter(|r| !r.is_empty()))
        .unwrap_or(request_failed)
        .to_string();

    Err(DispatchError::Server {
        status,
        message,
        payload: Some(payload),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JSON: &str = "application/json; charset=utf-8";

    #[test]
    fn test_classify_json_success() {
        let outcome = classify(200, Some("OK"), JSON, r#"{"favorite":true}"#.into(), "x").unwrap();
        assert_eq!(outcome, Outcome::Success(Payload::Json(json!({"favorite": true}))));
    }

    #[test]
    fn test_classify_text_success() {
        let outcome = classify(201, Some("Created"), "text/html", "<p>ok</p>".into(), "x").unwrap();
        assert_eq!(outcome, Outcome::Success(Payload::Text("<p>ok</p>".into())));
    }

    #[test]
    fn test_classify_malformed_json_is_parse_error() {
        let err = classify(200, Some("OK"), JSON, "{nope".into(), "x").unwrap_err();
        assert!(matches!(err, DispatchError::Parse(_)));
    }

    #[test]
    fn test_classify_error_prefers_payload_message() {
        let err = classify(
            404,
            Some("Not Found"),
            JSON,
            r#"{"success":false,"message":"not in garage","in_garage":false}"#.into(),
            "x",
        )
        .unwrap_err();
        match err {
            DispatchError::Server { status, message, payload } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not in garage");
                assert_eq!(payload.unwrap().field("in_garage"), Some(&json!(false)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_classify_error_uses_error_field_then_reason() {
        let err = classify(400, Some("Bad Request"), JSON, r#"{"error":"bad score"}"#.into(), "x")
            .unwrap_err();
        assert!(matches!(err, DispatchError::Server { ref message, .. } if message == "bad score"));

        let err = classify(500, Some("Internal Server Error"), "text/plain", "boom".into(), "x")
            .unwrap_err();
        assert!(
            matches!(err, DispatchError::Server { ref message, .. } if message == "Internal Server Error")
        );

        let err = classify(599, None, "text/plain", String::new(), "Request failed").unwrap_err();
        assert!(matches!(err, DispatchError::Server { ref message, .. } if message == "Request failed"));
    }

    #[test]
    fn test_payload_flag_truthiness() {
        let payload = Payload::Json(json!({"a": true, "b": 0, "c": "yes", "d": null, "e": 1}));
        assert!(payload.flag("a"));
        assert!(!payload.flag("b"));
        assert!(payload.flag("c"));
        assert!(!payload.flag("d"));
        assert!(payload.flag("e"));
        assert!(!payload.flag("missing"));
        assert!(!Payload::Text("favorite".into()).flag("favorite"));
    }

    #[test]
    fn test_payload_message_ignores_empty() {
        assert_eq!(Payload::Json(json!({"message": ""})).message(), None);
        assert_eq!(Payload::Json(json!({"message": "hi"})).message(), Some("hi"));
    }
}
