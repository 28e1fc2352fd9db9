//! Error contract assertions that work on raw response parts, so they do not
//! depend on backend types.

use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
use actix_web::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Mirror of the backend's problem+json body.
#[derive(Debug, Deserialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

fn trace_header(headers: &HeaderMap) -> &str {
    headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8")
}

/// Assert a problem+json error response and return the parsed body.
///
/// Checks the status, the content type, `code`, that the body `trace_id`
/// equals the `x-trace-id` header, and optionally a substring of `detail`.
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status);

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let problem: ProblemDetailsLike = serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "body should be ProblemDetails ({e}): {}",
            String::from_utf8_lossy(body)
        )
    });

    assert_eq!(problem.trace_id, trace_header(headers));
    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    assert!(
        problem.type_.ends_with(&expected_code.to_lowercase()),
        "type {} should end with the lowercased code",
        problem.type_
    );

    if let Some(expected) = expected_detail_contains {
        assert!(
            problem.detail.contains(expected),
            "Expected detail to contain '{expected}', but got '{}'",
            problem.detail
        );
    }

    problem
}

/// Assert the fixed 401 body: `{"status":"unauthorized","code":"401"}` with
/// nothing else in it.
pub fn assert_unauthorized_from_parts(status: StatusCode, headers: &HeaderMap, body: &[u8]) {
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!trace_header(headers).is_empty());

    let json: Value = serde_json::from_slice(body).expect("401 body should be JSON");
    assert_eq!(
        json,
        serde_json::json!({"status": "unauthorized", "code": "401"})
    );
}
