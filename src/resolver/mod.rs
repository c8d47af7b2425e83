/// Entity Resolver - maps wildcard names to profiles, markets and groups
///
/// Names arrive fully qualified (`nova.arena.eth`). After stripping the
/// root domain the remaining path is either:
/// - one label: Profile, then Market, then Group (first hit wins)
/// - two labels `child.parent`: a derived Market looked up by `child`
pub mod records;

use crate::{db::MetadataStore, error::GatewayResult};
use alloy::primitives::Address;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Profile,
    Market,
    Group,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Profile => "profile",
            EntityKind::Market => "market",
            EntityKind::Group => "group",
        }
    }
}

/// A name resolved to an entity and its record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub kind: EntityKind,
    pub name: String,
    /// Owner address for profiles, zero otherwise
    pub address: Address,
    pub texts: BTreeMap<&'static str, String>,
}

/// Resolves names under a single root domain
#[derive(Clone)]
pub struct EntityResolver {
    store: Arc<dyn MetadataStore>,
    root_labels: Vec<String>,
}

impl EntityResolver {
    pub fn new(store: Arc<dyn MetadataStore>, root_domain: &str) -> Self {
        let root_labels = root_domain
            .trim_matches('.')
            .split('.')
            .map(str::to_string)
            .collect();

        Self { store, root_labels }
    }

    /// Labels in front of the root domain, or `None` if the name is not
    /// strictly below the root
    pub fn relative_path<'a>(&self, name: &'a str) -> Option<Vec<&'a str>> {
        let labels: Vec<&str> = name.split('.').collect();
        if labels.len() <= self.root_labels.len() {
            return None;
        }

        let split = labels.len() - self.root_labels.len();
        let (path, root) = labels.split_at(split);
        if root.iter().zip(&self.root_labels).any(|(a, b)| *a != b.as_str()) {
            return None;
        }

        Some(path.to_vec())
    }

    /// Resolve a fully qualified name
    pub async fn resolve(&self, name: &str) -> GatewayResult<Option<ResolvedEntity>> {
        let Some(path) = self.relative_path(name) else {
            debug!("{} is outside the root domain", name);
            return Ok(None);
        };

        let entity = match path.as_slice() {
            [label] => self.resolve_label(label).await?,
            [child, parent] => self.resolve_derived(child, parent).await?,
            _ => None,
        };

        match &entity {
            Some(e) => debug!("Resolved {} to {} {}", name, e.kind.as_str(), e.name),
            None => debug!("No entity for {}", name),
        }

        Ok(entity)
    }

    /// Profile > Market > Group
    async fn resolve_label(&self, label: &str) -> GatewayResult<Option<ResolvedEntity>> {
        if let Some(profile) = self.store.profile_by_name(label).await? {
            let cluster = match profile.group_id {
                Some(id) => self.store.group_by_id(id).await?,
                None => None,
            };
            return Ok(Some(records::profile_entity(&profile, cluster.as_ref())));
        }

        if let Some(market) = self.store.market_by_name(label).await? {
            return Ok(Some(records::market_entity(&market, None)));
        }

        if let Some(group) = self.store.group_by_name(label).await? {
            return Ok(Some(records::group_entity(&group)));
        }

        Ok(None)
    }

    /// Derived market; the parent label is attached as-is without checking
    /// that it names an existing profile
    async fn resolve_derived(
        &self,
        child: &str,
        parent: &str,
    ) -> GatewayResult<Option<ResolvedEntity>> {
        Ok(self
            .store
            .market_by_name(child)
            .await?
            .map(|market| records::market_entity(&market, Some(parent))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        fixtures::{self, TestData},
        SqliteMetadataStore,
    };
    use super::records::keys;
    use sqlx::SqlitePool;

    async fn create_test_resolver() -> (EntityResolver, SqlitePool) {
        let pool = fixtures::memory_pool().await;
        let store = Arc::new(SqliteMetadataStore::new(pool.clone()));
        (EntityResolver::new(store, "arena.eth"), pool)
    }

    #[tokio::test]
    async fn test_relative_path() {
        let (resolver, _pool) = create_test_resolver().await;

        assert_eq!(resolver.relative_path("nova.arena.eth"), Some(vec!["nova"]));
        assert_eq!(
            resolver.relative_path("sub.nova.arena.eth"),
            Some(vec!["sub", "nova"])
        );
        assert_eq!(resolver.relative_path("arena.eth"), None);
        assert_eq!(resolver.relative_path("nova.other.eth"), None);
        assert_eq!(resolver.relative_path(""), None);
    }

    #[tokio::test]
    async fn test_simple_profile_lookup() {
        let (resolver, pool) = create_test_resolver().await;
        fixtures::insert_profile(&pool, &TestData::profile("nova")).await;

        let entity = resolver.resolve("nova.arena.eth").await.unwrap().unwrap();
        assert_eq!(entity.kind, EntityKind::Profile);
        assert_eq!(
            entity.address,
            "0xabcd000000000000000000000000000000001234"
                .parse::<Address>()
                .unwrap()
        );
        assert_eq!(entity.texts.get(keys::SCORE).unwrap(), "1250");
    }

    #[tokio::test]
    async fn test_priority_profile_over_market_over_group() {
        let (resolver, pool) = create_test_resolver().await;
        fixtures::insert_profile(&pool, &TestData::profile("overlap")).await;
        fixtures::insert_market(&pool, &TestData::market("overlap", None)).await;
        fixtures::insert_group(&pool, &TestData::group(1, "overlap")).await;

        for _ in 0..3 {
            let entity = resolver.resolve("overlap.arena.eth").await.unwrap().unwrap();
            assert_eq!(entity.kind, EntityKind::Profile);
        }

        fixtures::delete_profile(&pool, "overlap").await;
        let entity = resolver.resolve("overlap.arena.eth").await.unwrap().unwrap();
        assert_eq!(entity.kind, EntityKind::Market);

        sqlx::query("DELETE FROM markets WHERE name = 'overlap'")
            .execute(&pool)
            .await
            .unwrap();
        let entity = resolver.resolve("overlap.arena.eth").await.unwrap().unwrap();
        assert_eq!(entity.kind, EntityKind::Group);
    }

    #[tokio::test]
    async fn test_derived_market_gets_parent_without_validation() {
        let (resolver, pool) = create_test_resolver().await;
        fixtures::insert_market(&pool, &TestData::market("sub", Some("nova"))).await;

        // No profile named "nova" exists
        let entity = resolver.resolve("sub.nova.arena.eth").await.unwrap().unwrap();
        assert_eq!(entity.kind, EntityKind::Market);
        assert_eq!(entity.texts.get(keys::PARENT).unwrap(), "nova");
        assert_eq!(entity.texts.get(keys::CREATOR).unwrap(), "nova");

        // Any parent label is accepted as-is
        let entity = resolver.resolve("sub.ghost.arena.eth").await.unwrap().unwrap();
        assert_eq!(entity.texts.get(keys::PARENT).unwrap(), "ghost");

        // Top-level form has no parent record
        let entity = resolver.resolve("sub.arena.eth").await.unwrap().unwrap();
        assert!(!entity.texts.contains_key(keys::PARENT));
    }

    #[tokio::test]
    async fn test_derived_name_only_matches_markets() {
        let (resolver, pool) = create_test_resolver().await;
        fixtures::insert_profile(&pool, &TestData::profile("nova")).await;
        fixtures::insert_group(&pool, &TestData::group(1, "crew")).await;

        assert!(resolver.resolve("nova.x.arena.eth").await.unwrap().is_none());
        assert!(resolver.resolve("crew.x.arena.eth").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_and_deep_names() {
        let (resolver, pool) = create_test_resolver().await;
        fixtures::insert_market(&pool, &TestData::market("sub", None)).await;

        assert!(resolver.resolve("nobody.arena.eth").await.unwrap().is_none());
        assert!(resolver.resolve("a.sub.b.arena.eth").await.unwrap().is_none());
        assert!(resolver.resolve("arena.eth").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_cluster_lookup() {
        let (resolver, pool) = create_test_resolver().await;
        fixtures::insert_group(&pool, &TestData::group(4, "red-team")).await;

        let mut member = TestData::profile("member");
        member.group_id = Some(4);
        fixtures::insert_profile(&pool, &member).await;

        let mut orphan = TestData::profile("orphan");
        orphan.group_id = Some(99);
        fixtures::insert_profile(&pool, &orphan).await;

        let entity = resolver.resolve("member.arena.eth").await.unwrap().unwrap();
        assert_eq!(entity.texts.get(keys::CLUSTER).unwrap(), "red-team");

        let entity = resolver.resolve("orphan.arena.eth").await.unwrap().unwrap();
        assert!(!entity.texts.contains_key(keys::CLUSTER));
    }
}
