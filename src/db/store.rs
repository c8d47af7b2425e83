/// Metadata store access
///
/// The gateway only performs point lookups by unique name (plus the
/// profile → group hop for the `cluster` record). There are no writes.
use crate::{
    db::models::{Group, Market, OracleKind, Profile, ProfileCategory},
    error::{GatewayError, GatewayResult},
    metrics,
};
use alloy::primitives::Address;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::time::Instant;

/// Read-only metadata store backend
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Look up a profile by its exact name
    async fn profile_by_name(&self, name: &str) -> GatewayResult<Option<Profile>>;

    /// Look up a market by its exact name
    async fn market_by_name(&self, name: &str) -> GatewayResult<Option<Market>>;

    /// Look up a group by its exact name
    async fn group_by_name(&self, name: &str) -> GatewayResult<Option<Group>>;

    /// Look up a group by row id
    async fn group_by_id(&self, id: i64) -> GatewayResult<Option<Group>>;

    /// Check the store is reachable
    async fn ping(&self) -> GatewayResult<()>;
}

/// SQLite-backed metadata store
#[derive(Clone)]
pub struct SqliteMetadataStore {
    db: SqlitePool,
}

impl SqliteMetadataStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn profile_by_name(&self, name: &str) -> GatewayResult<Option<Profile>> {
        let start = Instant::now();
        let row = sqlx::query(
            r#"
            SELECT name, owner_address, category, description, group_id,
                   score_total, win_count, loss_count, created_at
            FROM profiles
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        metrics::record_store_lookup("profiles", start.elapsed().as_secs_f64());

        row.map(|row| profile_from_row(&row)).transpose()
    }

    async fn market_by_name(&self, name: &str) -> GatewayResult<Option<Market>> {
        let start = Instant::now();
        let row = sqlx::query(
            r#"
            SELECT name, external_id, category, oracle_kind, oracle_source,
                   creator_name, created_at
            FROM markets
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        metrics::record_store_lookup("markets", start.elapsed().as_secs_f64());

        row.map(|row| market_from_row(&row)).transpose()
    }

    async fn group_by_name(&self, name: &str) -> GatewayResult<Option<Group>> {
        let start = Instant::now();
        let row = sqlx::query(
            r#"
            SELECT id, name, external_id, description, avatar_uri, created_at
            FROM groups
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        metrics::record_store_lookup("groups", start.elapsed().as_secs_f64());

        row.map(|row| group_from_row(&row)).transpose()
    }

    async fn group_by_id(&self, id: i64) -> GatewayResult<Option<Group>> {
        let start = Instant::now();
        let row = sqlx::query(
            r#"
            SELECT id, name, external_id, description, avatar_uri, created_at
            FROM groups
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        metrics::record_store_lookup("groups", start.elapsed().as_secs_f64());

        row.map(|row| group_from_row(&row)).transpose()
    }

    async fn ping(&self) -> GatewayResult<()> {
        crate::db::test_connection(&self.db).await
    }
}

fn profile_from_row(row: &SqliteRow) -> GatewayResult<Profile> {
    let owner: String = row.try_get("owner_address")?;
    let owner_address = owner
        .parse::<Address>()
        .map_err(|e| GatewayError::Internal(format!("Invalid owner address {:?}: {}", owner, e)))?;

    let category = row
        .try_get::<String, _>("category")?
        .parse::<ProfileCategory>()
        .map_err(GatewayError::Internal)?;

    Ok(Profile {
        name: row.try_get("name")?,
        owner_address,
        category,
        description: row.try_get("description")?,
        group_id: row.try_get("group_id")?,
        score_total: row.try_get("score_total")?,
        win_count: row.try_get("win_count")?,
        loss_count: row.try_get("loss_count")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn market_from_row(row: &SqliteRow) -> GatewayResult<Market> {
    let oracle_kind = row
        .try_get::<String, _>("oracle_kind")?
        .parse::<OracleKind>()
        .map_err(GatewayError::Internal)?;

    Ok(Market {
        name: row.try_get("name")?,
        external_id: row.try_get("external_id")?,
        category: row.try_get("category")?,
        oracle_kind,
        oracle_source: row.try_get("oracle_source")?,
        creator_name: row.try_get("creator_name")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn group_from_row(row: &SqliteRow) -> GatewayResult<Group> {
    Ok(Group {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        external_id: row.try_get("external_id")?,
        description: row.try_get("description")?,
        avatar_uri: row.try_get("avatar_uri")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{self, TestData};

    #[tokio::test]
    async fn test_profile_lookup() {
        let pool = fixtures::memory_pool().await;
        fixtures::insert_profile(&pool, &TestData::profile("nova")).await;
        let store = SqliteMetadataStore::new(pool);

        let profile = store.profile_by_name("nova").await.unwrap().unwrap();
        assert_eq!(profile.name, "nova");
        assert_eq!(profile.score_total, 1250);
        assert_eq!(profile.category, ProfileCategory::Individual);

        assert!(store.profile_by_name("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let pool = fixtures::memory_pool().await;
        fixtures::insert_profile(&pool, &TestData::profile("nova")).await;
        let store = SqliteMetadataStore::new(pool);

        assert!(store.profile_by_name("Nova").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_market_lookup() {
        let pool = fixtures::memory_pool().await;
        fixtures::insert_market(&pool, &TestData::market("sub", Some("nova"))).await;
        let store = SqliteMetadataStore::new(pool);

        let market = store.market_by_name("sub").await.unwrap().unwrap();
        assert_eq!(market.creator_name.as_deref(), Some("nova"));
        assert_eq!(market.oracle_kind, OracleKind::PriceFeed);
        assert!(market.oracle_source.is_none());
    }

    #[tokio::test]
    async fn test_group_lookup_by_name_and_id() {
        let pool = fixtures::memory_pool().await;
        fixtures::insert_group(&pool, &TestData::group(7, "red-team")).await;
        let store = SqliteMetadataStore::new(pool);

        let by_name = store.group_by_name("red-team").await.unwrap().unwrap();
        let by_id = store.group_by_id(7).await.unwrap().unwrap();
        assert_eq!(by_name, by_id);
        assert!(store.group_by_id(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_owner_address_is_internal_error() {
        let pool = fixtures::memory_pool().await;
        sqlx::query(
            "INSERT INTO profiles (name, owner_address, category, created_at)
             VALUES ('broken', 'not-an-address', 'agent', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();
        let store = SqliteMetadataStore::new(pool);

        assert!(matches!(
            store.profile_by_name("broken").await,
            Err(GatewayError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_pool_is_upstream_unavailable() {
        let pool = fixtures::memory_pool().await;
        let store = SqliteMetadataStore::new(pool.clone());
        pool.close().await;

        assert!(matches!(
            store.profile_by_name("nova").await,
            Err(GatewayError::UpstreamUnavailable(_))
        ));
        assert!(store.ping().await.is_err());
    }
}
