//! CRUD handlers shared by every document-backed resource.
//!
//! Handlers find out which [`Resource`] they serve from resource-level app
//! data, so one set of handlers covers products, brands and the cart.

use actix_web::middleware::Condition;
use actix_web::{web, HttpResponse, Result};
use serde_json::Value;
use tracing::debug;

use crate::auth::claims::TokenPayload;
use crate::error::AppError;
use crate::extractors::document_id::DocumentId;
use crate::extractors::json_object::JsonObject;
use crate::middleware::token_guard::TokenGuard;
use crate::resources::{Operation, Resource};
use crate::state::app_state::AppState;

/// GET {base}
async fn list_documents(
    resource: web::Data<Resource>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let documents = app_state.documents.find_all(**resource).await?;
    Ok(HttpResponse::Ok().json(documents))
}

/// GET {base}/{id}
///
/// A missing document is not an error: the body is `null`.
async fn fetch_document(
    id: DocumentId,
    resource: web::Data<Resource>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let document = app_state
        .documents
        .find_by_id(**resource, id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// POST {base}
async fn insert_document(
    body: JsonObject,
    resource: web::Data<Resource>,
    app_state: web::Data<AppState>,
    payload: Option<TokenPayload>,
) -> Result<HttpResponse, AppError> {
    let outcome = app_state
        .documents
        .insert_one(**resource, body.into_inner())
        .await?;

    debug!(
        resource = %**resource,
        inserted_id = %outcome.inserted_id,
        authorized = payload.is_some(),
        "Document inserted"
    );
    Ok(HttpResponse::Ok().json(outcome))
}

/// PUT {base}/{id}
///
/// Sets each top-level body field on the document, creating it when absent.
/// A body `_id` must match the path id.
async fn upsert_document(
    id: DocumentId,
    body: JsonObject,
    resource: web::Data<Resource>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let mut fields = body.into_inner();

    if let Some(body_id) = fields.remove("_id") {
        if body_id != Value::String(id.to_hex()) {
            return Err(AppError::bad_request(
                "ID_MISMATCH",
                format!("Body _id {body_id} does not match path id {id}"),
            ));
        }
    }

    let outcome = app_state
        .documents
        .upsert_by_id(**resource, id, fields)
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// DELETE {delete_base}/{id}
async fn delete_document(
    id: DocumentId,
    resource: web::Data<Resource>,
    app_state: web::Data<AppState>,
    payload: Option<TokenPayload>,
) -> Result<HttpResponse, AppError> {
    let outcome = app_state
        .documents
        .delete_by_id(**resource, id.into_inner())
        .await?;

    debug!(
        resource = %**resource,
        deleted = outcome.deleted_count,
        authorized = payload.is_some(),
        "Document delete"
    );
    Ok(HttpResponse::Ok().json(outcome))
}

/// Register the routes `resource` supports, behind the token guard when
/// `guarded` is set.
pub fn configure_resource(cfg: &mut web::ServiceConfig, resource: Resource, guarded: bool) {
    let base = resource.base_path();
    let item_path = format!("{base}/{{id}}");
    let delete_item_path = format!("{}/{{id}}", resource.delete_path());

    let mut collection = web::resource(base).app_data(web::Data::new(resource));
    let mut item = web::resource(item_path.as_str()).app_data(web::Data::new(resource));
    let (mut has_collection, mut has_item) = (false, false);

    for op in resource.operations() {
        match op {
            Operation::List => {
                collection = collection.route(web::get().to(list_documents));
                has_collection = true;
            }
            Operation::Insert => {
                collection = collection.route(web::post().to(insert_document));
                has_collection = true;
            }
            Operation::Fetch => {
                item = item.route(web::get().to(fetch_document));
                has_item = true;
            }
            Operation::Upsert => {
                item = item.route(web::put().to(upsert_document));
                has_item = true;
            }
            Operation::Delete if delete_item_path == item_path => {
                item = item.route(web::delete().to(delete_document));
                has_item = true;
            }
            // Registered on its own path below.
            Operation::Delete => {}
        }
    }

    if has_collection {
        cfg.service(collection.wrap(Condition::new(guarded, TokenGuard)));
    }
    if has_item {
        cfg.service(item.wrap(Condition::new(guarded, TokenGuard)));
    }
    if resource.supports(Operation::Delete) && delete_item_path != item_path {
        cfg.service(
            web::resource(delete_item_path.as_str())
                .app_data(web::Data::new(resource))
                .route(web::delete().to(delete_document))
                .wrap(Condition::new(guarded, TokenGuard)),
        );
    }
}
