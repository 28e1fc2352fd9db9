use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::claims::TokenPayload;
use crate::error::AppError;

/// Handlers behind `TokenGuard` can take the decoded payload as an argument.
/// Outside a guarded scope the extractor fails with 401.
impl FromRequest for TokenPayload {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<TokenPayload>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("no_verified_token")),
        )
    }
}
