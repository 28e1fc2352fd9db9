use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims of an issued access token: the caller's payload plus issuance and
/// expiry timestamps (seconds since epoch).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    pub iat: i64,
    pub exp: i64,
}

/// Sign `payload` into an HS256 access token that expires `security.token_ttl`
/// after `now`.
///
/// Errors:
/// - payload already carries `exp` → 400 `RESERVED_CLAIM`
///
/// A payload-supplied `iat` is replaced by `now`.
pub fn issue_token(
    mut payload: Map<String, Value>,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    if payload.contains_key("exp") {
        return Err(AppError::bad_request(
            "RESERVED_CLAIM",
            "Payload must not set \"exp\"; token expiry is assigned by the server",
        ));
    }
    payload.remove("iat");

    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;
    let exp = iat + security.token_ttl.as_secs() as i64;

    let claims = TokenClaims { payload, iat, exp };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.token_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
}

/// Verify signature and expiry and return the decoded claims.
///
/// Every failure is `AppError::Unauthorized`; the reason (`token_expired`,
/// `invalid_signature`, `invalid_token`) only reaches the logs.
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<TokenClaims, AppError> {
    // Pinned algorithm, exp required, no clock leeway. Payloads are caller-defined,
    // so a caller-supplied `aud` must not be interpreted.
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;
    validation.validate_aud = false;

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(&security.token_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized("token_expired"),
        ErrorKind::InvalidSignature => AppError::unauthorized("invalid_signature"),
        _ => AppError::unauthorized("invalid_token"),
    })
}
