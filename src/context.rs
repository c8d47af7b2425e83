/// Application context and dependency injection
use crate::{
    config::GatewayConfig,
    crypto::ResponseSigner,
    db::{self, MetadataStore, SqliteMetadataStore},
    error::GatewayResult,
    resolver::EntityResolver,
};
use std::sync::Arc;

/// Application context holding all shared services
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<GatewayConfig>,
    pub store: Arc<dyn MetadataStore>,
    pub resolver: Arc<EntityResolver>,
    pub signer: Arc<ResponseSigner>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: GatewayConfig) -> GatewayResult<Self> {
        // Validate configuration
        config.validate()?;

        // Fail before touching the store if the key is unusable
        let signer = ResponseSigner::from_hex(&config.signing.private_key)?;

        // Initialize metadata store pool
        let pool = db::create_pool(&config.storage).await?;

        if config.storage.run_migrations {
            tracing::info!("Applying bundled metadata schema");
            db::run_migrations(&pool).await?;
        }

        // Test connection
        db::test_connection(&pool).await?;

        let store: Arc<dyn MetadataStore> = Arc::new(SqliteMetadataStore::new(pool));

        Ok(Self::with_parts(config, store, signer))
    }

    /// Assemble a context from already-built services
    pub fn with_parts(
        config: GatewayConfig,
        store: Arc<dyn MetadataStore>,
        signer: ResponseSigner,
    ) -> Self {
        let resolver = Arc::new(EntityResolver::new(
            Arc::clone(&store),
            &config.resolution.root_domain,
        ));

        Self {
            config: Arc::new(config),
            store,
            resolver,
            signer: Arc::new(signer),
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!(
            "{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}

#[cfg(test)]
pub(crate) fn test_context(store: Arc<dyn MetadataStore>) -> AppContext {
    let config = crate::config::test_config();
    let signer = ResponseSigner::from_hex(&config.signing.private_key).unwrap();
    AppContext::with_parts(config, store, signer)
}
