/// Database layer for the gateway
///
/// Manages the connection pool to the metadata store and provides typed,
/// read-only access to profiles, markets and groups.

pub mod models;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use models::{Group, Market, Profile};
pub use store::{MetadataStore, SqliteMetadataStore};

use crate::{
    config::StorageConfig,
    error::{GatewayError, GatewayResult},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Create a SQLite connection pool from a connection string
pub async fn create_pool(config: &StorageConfig) -> GatewayResult<SqlitePool> {
    if !config.database_url.starts_with("sqlite:") {
        return Err(GatewayError::Configuration(
            "Database URL must use the sqlite: scheme".to_string(),
        ));
    }

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| GatewayError::Configuration(format!("Invalid database URL: {}", e)))?
        .create_if_missing(config.run_migrations)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Run migrations for the metadata schema
/// Migrations are embedded at compile time from ./migrations directory
pub async fn run_migrations(pool: &SqlitePool) -> GatewayResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| GatewayError::Internal(format!("Migration failed: {}", e)))?;

    Ok(())
}

/// Test database connection
pub async fn test_connection(pool: &SqlitePool) -> GatewayResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}
