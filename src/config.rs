/// Configuration management for the CCIP-Read gateway
use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub service: ServiceConfig,
    pub resolution: ResolutionConfig,
    pub signing: SigningConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Name resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Registered parent domain whose subtree this gateway answers for
    pub root_domain: String,
}

/// Response signing configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Hex-encoded secp256k1 private key (32 bytes)
    pub private_key: String,
}

// Keep the key out of debug output
impl std::fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Metadata store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// sqlx connection string, e.g. `sqlite://data/metadata.sqlite`
    pub database_url: String,
    pub max_connections: u32,
    /// Apply the bundled schema at startup (local development only)
    pub run_migrations: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> GatewayResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("GATEWAY_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("GATEWAY_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| GatewayError::Configuration("Invalid port number".to_string()))?;

        let root_domain =
            env::var("GATEWAY_ROOT_DOMAIN").unwrap_or_else(|_| "arena.eth".to_string());

        let private_key = env::var("GATEWAY_SIGNER_PRIVATE_KEY").map_err(|_| {
            GatewayError::Configuration("GATEWAY_SIGNER_PRIVATE_KEY is required".to_string())
        })?;

        let database_url = env::var("GATEWAY_DATABASE_URL").map_err(|_| {
            GatewayError::Configuration("GATEWAY_DATABASE_URL is required".to_string())
        })?;
        let max_connections = env::var("GATEWAY_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);
        let run_migrations = env::var("GATEWAY_RUN_MIGRATIONS")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        let level = env::var("RUST_LOG")
            .unwrap_or_else(|_| "ccip_gateway=debug,tower_http=debug".to_string());
        let json = env::var("GATEWAY_LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(GatewayConfig {
            service: ServiceConfig { hostname, port },
            resolution: ResolutionConfig { root_domain },
            signing: SigningConfig { private_key },
            storage: StorageConfig {
                database_url,
                max_connections,
                run_migrations,
            },
            logging: LoggingConfig { level, json },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> GatewayResult<()> {
        if self.service.hostname.is_empty() {
            return Err(GatewayError::Configuration(
                "Hostname cannot be empty".to_string(),
            ));
        }

        if self.service.port == 0 {
            return Err(GatewayError::Configuration("Port cannot be 0".to_string()));
        }

        let root = self.resolution.root_domain.trim_matches('.');
        if root.is_empty() {
            return Err(GatewayError::Configuration(format!(
                "Invalid root domain: {:?}",
                self.resolution.root_domain
            )));
        }
        crate::ccip::name::encode(root).map_err(|e| {
            GatewayError::Configuration(format!("Invalid root domain {:?}: {}", root, e))
        })?;

        if self.signing.private_key.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "Signing key cannot be empty".to_string(),
            ));
        }

        if self.storage.database_url.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "Database URL cannot be empty".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(GatewayError::Configuration(
                "Database pool needs at least one connection".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> GatewayConfig {
    GatewayConfig {
        service: ServiceConfig {
            hostname: "127.0.0.1".to_string(),
            port: 8080,
        },
        resolution: ResolutionConfig {
            root_domain: "arena.eth".to_string(),
        },
        signing: SigningConfig {
            private_key: "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
                .to_string(),
        },
        storage: StorageConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            json: false,
        },
    }
}
