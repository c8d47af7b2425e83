/// Test fixtures for the metadata store
use crate::db::models::{Group, Market, OracleKind, Profile, ProfileCategory};
use chrono::{TimeZone, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::atomic::{AtomicI64, Ordering};

static NEXT_EXTERNAL_ID: AtomicI64 = AtomicI64::new(1000);

/// In-memory pool with the bundled schema applied
///
/// A single connection, since every SQLite memory connection is its own
/// database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    crate::db::run_migrations(&pool).await.unwrap();
    pool
}

pub struct TestData;

impl TestData {
    pub fn profile(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            owner_address: "0xabcd000000000000000000000000000000001234".parse().unwrap(),
            category: ProfileCategory::Individual,
            description: None,
            group_id: None,
            score_total: 1250,
            win_count: 12,
            loss_count: 3,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    pub fn market(name: &str, creator: Option<&str>) -> Market {
        Market {
            name: name.to_string(),
            external_id: NEXT_EXTERNAL_ID.fetch_add(1, Ordering::Relaxed),
            category: "sports".to_string(),
            oracle_kind: OracleKind::PriceFeed,
            oracle_source: None,
            creator_name: creator.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap(),
        }
    }

    pub fn group(id: i64, name: &str) -> Group {
        Group {
            id,
            name: name.to_string(),
            external_id: id * 10,
            description: None,
            avatar_uri: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        }
    }
}

pub async fn insert_profile(pool: &SqlitePool, profile: &Profile) {
    sqlx::query(
        r#"
        INSERT INTO profiles (name, owner_address, category, description, group_id,
                              score_total, win_count, loss_count, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&profile.name)
    .bind(profile.owner_address.to_string())
    .bind(profile.category.as_str())
    .bind(&profile.description)
    .bind(profile.group_id)
    .bind(profile.score_total)
    .bind(profile.win_count)
    .bind(profile.loss_count)
    .bind(profile.created_at.to_rfc3339())
    .execute(pool)
    .await
    .unwrap();
}

pub async fn delete_profile(pool: &SqlitePool, name: &str) {
    sqlx::query("DELETE FROM profiles WHERE name = ?1")
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_market(pool: &SqlitePool, market: &Market) {
    sqlx::query(
        r#"
        INSERT INTO markets (name, external_id, category, oracle_kind, oracle_source,
                             creator_name, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&market.name)
    .bind(market.external_id)
    .bind(&market.category)
    .bind(market.oracle_kind.as_str())
    .bind(&market.oracle_source)
    .bind(&market.creator_name)
    .bind(market.created_at.to_rfc3339())
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_group(pool: &SqlitePool, group: &Group) {
    sqlx::query(
        r#"
        INSERT INTO groups (id, name, external_id, description, avatar_uri, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(group.id)
    .bind(&group.name)
    .bind(group.external_id)
    .bind(&group.description)
    .bind(&group.avatar_uri)
    .bind(group.created_at.to_rfc3339())
    .execute(pool)
    .await
    .unwrap();
}
