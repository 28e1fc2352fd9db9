//! The `token` cookie carrying the access token between browser and server.

use actix_web::cookie::{time::Duration, Cookie, SameSite};

use crate::state::security_config::{CookieConfig, SecurityConfig};

pub const TOKEN_COOKIE: &str = "token";

/// HttpOnly cookie holding `token`, living as long as the token itself.
///
/// Secure cookies are sent cross-site (`SameSite=None`) so the allow-listed
/// front-ends can make credentialed requests; browsers refuse `SameSite=None`
/// without `Secure`, so insecure cookies fall back to `Lax`.
pub fn token_cookie(
    token: String,
    security: &SecurityConfig,
    config: &CookieConfig,
) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(same_site(config))
        .max_age(Duration::seconds(security.token_ttl.as_secs() as i64))
        .finish()
}

/// Expired, empty `token` cookie that makes the browser drop the current one.
pub fn clear_token_cookie(config: &CookieConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(same_site(config))
        .finish();
    cookie.make_removal();
    cookie
}

fn same_site(config: &CookieConfig) -> SameSite {
    if config.secure {
        SameSite::None
    } else {
        SameSite::Lax
    }
}
