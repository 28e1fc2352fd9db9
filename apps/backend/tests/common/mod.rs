#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use actix_web::test;
use bytes::Bytes;
use serde_json::{Map, Value};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    movieshub_test_support::logging::init();
}

/// Status, headers and body of a response, read in one go.
pub struct Parts {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Parts {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "body should be JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }
}

pub async fn into_parts<B>(resp: ServiceResponse<B>) -> Parts
where
    B: MessageBody,
{
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    Parts {
        status,
        headers,
        body,
    }
}

/// Unwrap a `json!` object literal.
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
