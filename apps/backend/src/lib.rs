#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod resources;
pub mod routes;
pub mod state;
pub mod test_support;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::claims::TokenPayload;
pub use auth::token::{issue_token, verify_token, TokenClaims};
pub use config::{AccessPolicy, AppConfig, StoreBackend, StoreSettings};
pub use error::AppError;
pub use extractors::{DocumentId, JsonObject};
pub use infra::state::build_state;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::token_guard::TokenGuard;
pub use middleware::trace_span::TraceSpan;
pub use repos::documents::{Document, DocumentRepo};
pub use resources::Resource;
pub use state::app_state::AppState;
pub use state::security_config::{CookieConfig, SecurityConfig};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
