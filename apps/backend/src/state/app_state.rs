use std::sync::Arc;

use crate::adapters::documents_memory::DocumentRepoMemory;
use crate::repos::documents::DocumentRepo;

use super::security_config::{CookieConfig, SecurityConfig};

/// Application state shared by every worker; handlers receive it as
/// `web::Data<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Long-lived document store handle
    pub documents: Arc<dyn DocumentRepo>,
    /// Token signing settings
    pub security: SecurityConfig,
    pub cookie: CookieConfig,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentRepo>,
        security: SecurityConfig,
        cookie: CookieConfig,
    ) -> Self {
        Self {
            documents,
            security,
            cookie,
        }
    }

    /// In-memory store, random secret, secure cookies.
    pub fn for_tests() -> Self {
        Self::for_tests_with_security(SecurityConfig::for_tests())
    }

    pub fn for_tests_with_security(security: SecurityConfig) -> Self {
        Self::new(
            Arc::new(DocumentRepoMemory::new()),
            security,
            CookieConfig::default(),
        )
    }

    pub fn for_tests_with_documents(documents: Arc<dyn DocumentRepo>) -> Self {
        Self::new(documents, SecurityConfig::for_tests(), CookieConfig::default())
    }
}
