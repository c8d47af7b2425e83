/// Record sets for resolved entities
///
/// Each entity kind exposes a fixed set of text records. Absent optional
/// fields are left out of the map entirely.
use crate::{
    ccip::{RecordQuery, RecordValue},
    db::{Group, Market, Profile},
    error::{GatewayError, GatewayResult},
    resolver::{EntityKind, ResolvedEntity},
};
use alloy::primitives::{Address, Bytes};
use chrono::SecondsFormat;
use std::collections::BTreeMap;

/// Text record keys
pub mod keys {
    pub const NAME: &str = "name";
    pub const KIND: &str = "kind";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const SCORE: &str = "score";
    pub const WINS: &str = "wins";
    pub const LOSSES: &str = "losses";
    pub const CLUSTER: &str = "cluster";
    pub const MARKET_ID: &str = "market.id";
    pub const ORACLE: &str = "oracle";
    pub const ORACLE_SOURCE: &str = "oracle.source";
    pub const CREATOR: &str = "creator";
    pub const PARENT: &str = "parentName";
    pub const GROUP_ID: &str = "group.id";
    pub const AVATAR: &str = "avatar";
    pub const CREATED: &str = "created";
}

type Texts = BTreeMap<&'static str, String>;

fn put_opt(texts: &mut Texts, key: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        texts.insert(key, value.to_string());
    }
}

fn timestamp(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Records for a profile; `cluster` is the name of its group, if any
pub fn profile_entity(profile: &Profile, cluster: Option<&Group>) -> ResolvedEntity {
    let mut texts = Texts::new();
    texts.insert(keys::NAME, profile.name.clone());
    texts.insert(keys::KIND, EntityKind::Profile.as_str().to_string());
    put_opt(&mut texts, keys::DESCRIPTION, profile.description.as_deref());
    texts.insert(keys::CATEGORY, profile.category.to_string());
    texts.insert(keys::SCORE, profile.score_total.to_string());
    texts.insert(keys::WINS, profile.win_count.to_string());
    texts.insert(keys::LOSSES, profile.loss_count.to_string());
    put_opt(&mut texts, keys::CLUSTER, cluster.map(|g| g.name.as_str()));
    texts.insert(keys::CREATED, timestamp(&profile.created_at));

    ResolvedEntity {
        kind: EntityKind::Profile,
        name: profile.name.clone(),
        address: profile.owner_address,
        texts,
    }
}

/// Records for a market; `parent` is set for derived names only
pub fn market_entity(market: &Market, parent: Option<&str>) -> ResolvedEntity {
    let mut texts = Texts::new();
    texts.insert(keys::NAME, market.name.clone());
    texts.insert(keys::KIND, EntityKind::Market.as_str().to_string());
    texts.insert(keys::MARKET_ID, market.external_id.to_string());
    texts.insert(keys::CATEGORY, market.category.clone());
    texts.insert(keys::ORACLE, market.oracle_kind.to_string());
    put_opt(&mut texts, keys::ORACLE_SOURCE, market.oracle_source.as_deref());
    put_opt(&mut texts, keys::CREATOR, market.creator_name.as_deref());
    put_opt(&mut texts, keys::PARENT, parent);
    texts.insert(keys::CREATED, timestamp(&market.created_at));

    ResolvedEntity {
        kind: EntityKind::Market,
        name: market.name.clone(),
        address: Address::ZERO,
        texts,
    }
}

/// Records for a group
pub fn group_entity(group: &Group) -> ResolvedEntity {
    let mut texts = Texts::new();
    texts.insert(keys::NAME, group.name.clone());
    texts.insert(keys::KIND, EntityKind::Group.as_str().to_string());
    texts.insert(keys::GROUP_ID, group.external_id.to_string());
    put_opt(&mut texts, keys::DESCRIPTION, group.description.as_deref());
    put_opt(&mut texts, keys::AVATAR, group.avatar_uri.as_deref());
    texts.insert(keys::CREATED, timestamp(&group.created_at));

    ResolvedEntity {
        kind: EntityKind::Group,
        name: group.name.clone(),
        address: Address::ZERO,
        texts,
    }
}

/// Answer a record query against a resolved entity
pub fn answer(entity: &ResolvedEntity, query: &RecordQuery) -> GatewayResult<RecordValue> {
    match query {
        RecordQuery::Addr { .. } => Ok(RecordValue::Address(entity.address)),
        // Every EVM coin type maps to the same owner address
        RecordQuery::AddrByCoin { coin_type, .. } => {
            Ok(RecordValue::AddressByCoin(entity.address, *coin_type))
        }
        RecordQuery::Text { key, .. } => entity
            .texts
            .get(key.as_str())
            .map(|value| RecordValue::Text(value.clone()))
            .ok_or_else(|| {
                GatewayError::NotFound(format!("No {:?} record for {}", key, entity.name))
            }),
        RecordQuery::Contenthash { .. } => Ok(RecordValue::Bytes(Bytes::new())),
        RecordQuery::Unsupported => Err(GatewayError::NotFound(
            "Record type not supported".to_string(),
        )),
    }
}
