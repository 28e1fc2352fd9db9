use std::sync::Arc;

use tracing::{info, warn};

use crate::adapters::documents_memory::DocumentRepoMemory;
use crate::adapters::documents_mongo::DocumentRepoMongo;
use crate::config::store::{StoreBackend, StoreSettings};
use crate::error::AppError;
use crate::repos::documents::DocumentRepo;
use crate::state::app_state::AppState;
use crate::state::security_config::{CookieConfig, SecurityConfig};

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    cookie_config: CookieConfig,
    store: Option<StoreSettings>,
    documents: Option<Arc<dyn DocumentRepo>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::for_tests(),
            cookie_config: CookieConfig::default(),
            store: None,
            documents: None,
        }
    }

    pub fn with_store(mut self, settings: StoreSettings) -> Self {
        self.store = Some(settings);
        self
    }

    /// Use an already constructed repository; takes precedence over `with_store`.
    pub fn with_documents(mut self, documents: Arc<dyn DocumentRepo>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_cookie(mut self, cookie_config: CookieConfig) -> Self {
        self.cookie_config = cookie_config;
        self
    }

    /// Connect the configured store and assemble the state.
    ///
    /// A Mongo store that cannot be reached yet is not fatal: the failure is
    /// logged and requests retry through the driver's pool.
    pub async fn build(self) -> Result<AppState, AppError> {
        let documents = match (self.documents, self.store) {
            (Some(documents), _) => documents,
            (None, Some(settings)) => connect_store(&settings).await?,
            (None, None) => Arc::new(DocumentRepoMemory::new()),
        };

        Ok(AppState::new(
            documents,
            self.security_config,
            self.cookie_config,
        ))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

async fn connect_store(settings: &StoreSettings) -> Result<Arc<dyn DocumentRepo>, AppError> {
    match settings.backend {
        StoreBackend::Memory => {
            warn!(backend = %settings.backend, "Documents are kept in memory and lost on exit");
            Ok(Arc::new(DocumentRepoMemory::new()))
        }
        StoreBackend::Mongo => {
            let uri = settings
                .uri
                .as_deref()
                .ok_or_else(|| AppError::config("Mongo backend selected without a connection string"))?;
            let repo = DocumentRepoMongo::connect(uri).await?;

            match repo.ping().await {
                Ok(()) => info!(
                    event = "STORE_READY",
                    backend = %settings.backend,
                    "Document store reachable"
                ),
                Err(e) => warn!(
                    backend = %settings.backend,
                    error = %e,
                    "Document store ping failed; serving anyway"
                ),
            }

            Ok(Arc::new(repo))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resources::Resource;

    #[tokio::test]
    async fn defaults_to_empty_memory_store() {
        let state = build_state().build().await.unwrap();
        assert!(state.documents.find_all(Resource::Products).await.unwrap().is_empty());
        assert!(state.cookie.secure);
    }

    #[tokio::test]
    async fn memory_settings_build_a_memory_store() {
        let state = build_state()
            .with_store(StoreSettings::memory())
            .with_cookie(CookieConfig { secure: false })
            .build()
            .await
            .unwrap();

        assert!(state.documents.ping().await.is_ok());
        assert!(!state.cookie.secure);
    }

    #[tokio::test]
    async fn explicit_repository_wins() {
        let seeded = DocumentRepoMemory::new().with_documents(
            Resource::Brands,
            vec![json!({"_id": "65f1c0ffee00000000000001", "name": "Acme"})
                .as_object()
                .cloned()
                .unwrap()],
        )
        .unwrap();
        let state = build_state()
            .with_store(StoreSettings::memory())
            .with_documents(Arc::new(seeded))
            .build()
            .await
            .unwrap();

        assert_eq!(state.documents.find_all(Resource::Brands).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mongo_without_uri_is_a_config_error() {
        let settings = StoreSettings {
            backend: StoreBackend::Mongo,
            uri: None,
        };
        let err = build_state().with_store(settings).build().await.unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
