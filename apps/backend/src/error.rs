use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use thiserror::Error;

use crate::trace_ctx;

/// Duplicate key error code reported by the document store.
const DUPLICATE_KEY: i32 = 11000;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Fixed body returned for every rejected token, whatever the reason.
#[derive(Serialize)]
pub struct UnauthorizedBody {
    pub status: &'static str,
    pub code: &'static str,
}

impl UnauthorizedBody {
    pub const fn new() -> Self {
        Self {
            status: "unauthorized",
            code: "401",
        }
    }
}

impl Default for UnauthorizedBody {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// `reason` is for logs only and never reaches the client.
    #[error("Unauthorized ({reason})")]
    Unauthorized { reason: &'static str },
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Payload too large: {detail}")]
    PayloadTooLarge { detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: &'static str, detail: String },
    #[error("Store error: {detail}")]
    Store { detail: String },
    #[error("Store unavailable: {detail}")]
    StoreUnavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    fn code(&self) -> String {
        match self {
            AppError::Unauthorized { .. } => "UNAUTHORIZED".to_string(),
            AppError::BadRequest { code, .. } => code.to_string(),
            AppError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE".to_string(),
            AppError::Conflict { code, .. } => code.to_string(),
            AppError::Store { .. } => "STORE_ERROR".to_string(),
            AppError::StoreUnavailable { .. } => "STORE_UNAVAILABLE".to_string(),
            AppError::Internal { .. } => "INTERNAL".to_string(),
            AppError::Config { .. } => "CONFIG_ERROR".to_string(),
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::Unauthorized { .. } => "Authentication required".to_string(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::PayloadTooLarge { detail } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            // Driver messages can carry hostnames and credentials; keep them in logs.
            AppError::Store { .. } => "The document store rejected the operation".to_string(),
            AppError::StoreUnavailable { .. } => "The document store is unreachable".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
            AppError::Config { detail } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthorized(reason: &'static str) -> Self {
        Self::Unauthorized { reason }
    }

    pub fn bad_request(code: &'static str, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn payload_too_large(detail: impl Into<String>) -> Self {
        Self::PayloadTooLarge {
            detail: detail.into(),
        }
    }

    pub fn conflict(code: &'static str, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn store(detail: impl Into<String>) -> Self {
        Self::Store {
            detail: detail.into(),
        }
    }

    pub fn store_unavailable(detail: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized { .. })
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        match e.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
                AppError::conflict("DUPLICATE_ID", "A document with this _id already exists")
            }
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => AppError::store_unavailable(e.to_string()),
            _ => AppError::store(e.to_string()),
        }
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        AppError::bad_request("INVALID_BODY", format!("Body cannot be stored: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if self.is_unauthorized() {
            return HttpResponse::build(status)
                .insert_header(("x-trace-id", trace_id))
                .json(UnauthorizedBody::new());
        }

        if status.is_server_error() {
            tracing::error!(%trace_id, error = %self, "request failed");
        }

        let code = self.code();
        let problem_details = ProblemDetails {
            type_: format!("https://movieshub.app/errors/{}", code.to_lowercase()),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail: self.detail(),
            code,
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use serde_json::Value;

    use super::*;

    #[actix_web::test]
    async fn unauthorized_body_is_fixed_regardless_of_reason() {
        for reason in ["missing_token", "token_expired", "invalid_signature"] {
            let resp = AppError::unauthorized(reason).error_response();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

            let body = to_bytes(resp.into_body()).await.unwrap();
            let json: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(
                json,
                serde_json::json!({"status": "unauthorized", "code": "401"})
            );
        }
    }

    #[actix_web::test]
    async fn bad_request_renders_problem_details() {
        let resp = AppError::bad_request("INVALID_ID", "Invalid id: abc").error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/problem+json"));

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "INVALID_ID");
        assert_eq!(json["title"], "Invalid Id");
        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "Invalid id: abc");
        assert_eq!(json["trace_id"], "unknown");
    }

    #[actix_web::test]
    async fn store_errors_hide_driver_detail() {
        let resp = AppError::store("auth failed for user admin@cluster0").error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "STORE_ERROR");
        assert!(!json["detail"].as_str().unwrap().contains("admin"));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::conflict("DUPLICATE_ID", "dup").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::store_unavailable("down").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::payload_too_large("big").status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
