//! Request handling helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Parse the chat-completion body and read its `stream` flag
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The chat body is validated but forwarded as the original bytes

use axum::http::{HeaderMap, HeaderValue, Request};
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::error::RelayError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of an inbound request, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Parse a chat-completion body, which must be a JSON object.
pub fn parse_json_object(body: &[u8]) -> Result<Map<String, Value>, RelayError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RelayError::BadRequest(
            "request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(RelayError::BadRequest(format!("invalid JSON body: {}", e))),
    }
}

/// Whether the caller asked for a streamed response.
pub fn wants_stream(body: &Map<String, Value>) -> bool {
    body.get("stream").is_some_and(is_truthy)
}

/// JSON truthiness: `false`, `null`, zero, and empty strings, arrays and
/// objects are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!([0])));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!({})));
    }

    #[test]
    fn test_wants_stream() {
        let body = parse_json_object(br#"{"model":"gpt-4o","stream":true}"#).unwrap();
        assert!(wants_stream(&body));

        let body = parse_json_object(br#"{"model":"gpt-4o"}"#).unwrap();
        assert!(!wants_stream(&body));

        let body = parse_json_object(br#"{"stream":false}"#).unwrap();
        assert!(!wants_stream(&body));
    }

    #[test]
    fn test_body_must_be_object() {
        assert!(matches!(parse_json_object(b"[1,2]"), Err(RelayError::BadRequest(_))));
        assert!(matches!(parse_json_object(b"{not json"), Err(RelayError::BadRequest(_))));
        assert!(matches!(parse_json_object(b""), Err(RelayError::BadRequest(_))));
    }

    #[test]
    fn test_request_id_fallback() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }

    #[test]
    fn test_generated_ids_are_uuids() {
        let request = Request::new(());
        let id = UuidRequestId.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
