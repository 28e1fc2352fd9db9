use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use mongodb::bson::oid::ObjectId;

use crate::error::AppError;

/// Document id taken from the `{id}` path segment.
///
/// Only 24-character hex object ids are accepted; anything else is a 400
/// before the store is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentId(pub ObjectId);

impl DocumentId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        ObjectId::parse_str(raw)
            .map(DocumentId)
            .map_err(|_| {
                AppError::bad_request(
                    "INVALID_ID",
                    format!("Invalid id: {raw:?} is not a 24-character hex object id"),
                )
            })
    }

    pub fn into_inner(self) -> ObjectId {
        self.0
    }
}

impl FromRequest for DocumentId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(match req.match_info().get("id") {
            Some(raw) => DocumentId::parse(raw),
            None => Err(AppError::bad_request("INVALID_ID", "Missing id parameter")),
        })
    }
}
