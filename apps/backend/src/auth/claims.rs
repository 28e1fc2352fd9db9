//! Decoded token payload attached to an authorized request.

use serde::Serialize;
use serde_json::{Map, Value};

use super::token::TokenClaims;

/// Inserted into request extensions by the token guard once the cookie token
/// verifies. Lives for the single request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenPayload {
    /// Caller-supplied claims, exactly as passed to `/jwt`
    pub claims: Map<String, Value>,
    /// Issued-at (seconds since epoch)
    pub issued_at: i64,
    /// Expiry (seconds since epoch)
    pub expires_at: i64,
}

impl From<TokenClaims> for TokenPayload {
    fn from(claims: TokenClaims) -> Self {
        Self {
            claims: claims.payload,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}
