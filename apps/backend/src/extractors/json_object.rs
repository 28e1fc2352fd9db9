use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde_json::{Error as JsonError, Map, Value};
use tracing::debug;

use crate::error::AppError;
use crate::trace_ctx;

/// Request bodies larger than this are refused.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// A request body that must be a JSON object.
///
/// An empty body is read as `{}`. Content type is not checked; whatever
/// arrives is parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonObject(pub Map<String, Value>);

impl JsonObject {
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonObject(Map::new()));
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Ok(JsonObject(map)),
            Ok(other) => Err(AppError::bad_request(
                "INVALID_BODY",
                format!("Expected a JSON object, got {}", kind(&other)),
            )),
            Err(e) => Err(AppError::bad_request("INVALID_BODY", classify_json_error(&e))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!("Invalid JSON at line {}", error.line())
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => "Invalid JSON: unexpected data".to_string(),
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}

impl FromRequest for JsonObject {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(_: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        Box::pin(async move {
            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    debug!(trace_id = %trace_ctx::trace_id(), error = %e, "Failed to read request body chunk");
                    AppError::bad_request("INVALID_BODY", "Failed to read request body")
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    return Err(AppError::payload_too_large(format!(
                        "Request body exceeds {MAX_BODY_BYTES} bytes"
                    )));
                }
                body.extend_from_slice(&chunk);
            }

            JsonObject::from_slice(&body)
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_body_is_empty_object() {
        assert_eq!(JsonObject::from_slice(b"").unwrap().0, Map::new());
        assert_eq!(JsonObject::from_slice(b" \n").unwrap().0, Map::new());
    }

    #[test]
    fn object_body_is_kept_verbatim() {
        let parsed = JsonObject::from_slice(br#"{"title":"Heat","nested":{"a":[1,2]}}"#).unwrap();
        assert_eq!(
            Value::Object(parsed.into_inner()),
            json!({"title": "Heat", "nested": {"a": [1, 2]}})
        );
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        for body in [&b"[1,2]"[..], b"\"text\"", b"42", b"null"] {
            let err = JsonObject::from_slice(body).unwrap_err();
            assert!(matches!(err, AppError::BadRequest { code: "INVALID_BODY", .. }));
        }
    }

    #[test]
    fn malformed_json_names_the_problem() {
        let err = JsonObject::from_slice(br#"{"title": }"#).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON at line 1"));

        let err = JsonObject::from_slice(br#"{"title": "x""#).unwrap_err();
        assert!(err.to_string().contains("unexpected end of input"));
    }
}
