use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Lifetime embedded in every issued access token.
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Signing settings for access tokens.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret used to sign and verify tokens
    pub token_secret: Vec<u8>,
    /// Pinned signing algorithm (HS256)
    pub algorithm: Algorithm,
    pub token_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(token_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            token_secret: token_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: TOKEN_TTL,
        }
    }

    /// Random per-process secret for tests.
    pub fn for_tests() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string().into_bytes())
    }
}

/// Attributes of the `token` cookie.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Mark the cookie `Secure`. Turning this off is only meant for plain-http local development.
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self { secure: true }
    }
}
