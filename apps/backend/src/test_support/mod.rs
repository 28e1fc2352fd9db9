//! Helpers for building test services and authenticated requests.

pub mod app_builder;

use std::time::SystemTime;

use actix_web::cookie::Cookie;
use serde_json::{Map, Value};

pub use app_builder::create_test_app_builder;

use crate::auth::cookie::TOKEN_COOKIE;
use crate::auth::token::issue_token;
use crate::state::app_state::AppState;

/// A `token` cookie carrying a freshly issued token for `payload`.
///
/// # Panics
///
/// If `payload` is not a JSON object or the token cannot be signed.
pub fn token_cookie_for(state: &AppState, payload: Value) -> Cookie<'static> {
    let claims: Map<String, Value> = match payload {
        Value::Object(map) => map,
        other => panic!("token payload must be an object, got {other}"),
    };
    let token = issue_token(claims, SystemTime::now(), &state.security)
        .expect("sign test token");
    Cookie::new(TOKEN_COOKIE, token)
}
