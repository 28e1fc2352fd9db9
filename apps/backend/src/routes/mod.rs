use actix_web::web;

use crate::config::access::AccessPolicy;
use crate::resources::Resource;

pub mod auth;
pub mod documents;
pub mod health;

/// Register every route. Resources named by `policy` sit behind the token
/// guard; the rest are public.
///
/// `main.rs` wraps the result in CORS and tracing middleware; tests call
/// this directly on a bare `App`.
pub fn configure(cfg: &mut web::ServiceConfig, policy: &AccessPolicy) {
    health::configure_routes(cfg);
    auth::configure_routes(cfg);

    for resource in Resource::ALL {
        documents::configure_resource(cfg, resource, policy.is_guarded(resource));
    }
}
