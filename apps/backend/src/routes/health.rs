use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Liveness text served at `/`.
pub const LIVENESS_TEXT: &str = "Server is running...";

pub async fn root() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body(LIVENESS_TEXT))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    store: &'static str,
    time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    // Driver errors stay in the logs; they can name hosts.
    let store_ok = match app_state.documents.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Health check: document store ping failed");
            false
        }
    };

    let mut response = if store_ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };

    Ok(response.json(HealthResponse {
        status: if store_ok { "ok" } else { "degraded" },
        app_version: env!("CARGO_PKG_VERSION"),
        store: if store_ok { "ok" } else { "error" },
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root));
    cfg.route("/health", web::get().to(health));
}
