//! Token issuance: `POST /jwt` and `POST /logout`.

use std::time::SystemTime;

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::auth::cookie::{clear_token_cookie, token_cookie};
use crate::auth::token::issue_token;
use crate::error::AppError;
use crate::extractors::json_object::JsonObject;
use crate::logging::security;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Sign the request body as the token payload and hand the token back as
/// the `token` cookie. The token itself never appears in the body.
///
/// Nothing about the caller is checked here; whoever asks gets a token for
/// whatever payload they send.
async fn issue(
    body: JsonObject,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let claim_names: Vec<String> = payload.keys().cloned().collect();

    let token = issue_token(payload, SystemTime::now(), &app_state.security)?;
    security::token_issued(&claim_names, app_state.security.token_ttl.as_secs());

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(token, &app_state.security, &app_state.cookie))
        .json(SuccessResponse { success: true }))
}

async fn logout(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok()
        .cookie(clear_token_cookie(&app_state.cookie))
        .json(SuccessResponse { success: true }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/jwt").route(web::post().to(issue)));
    cfg.service(web::resource("/logout").route(web::post().to(logout)));
}
