/// Metadata store models
///
/// Read-only views of the entities the gateway can resolve. Rows are
/// created and updated by the registration and bridging services.
use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Profile category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileCategory {
    Individual,
    Agent,
    Organization,
}

impl ProfileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileCategory::Individual => "individual",
            ProfileCategory::Agent => "agent",
            ProfileCategory::Organization => "organization",
        }
    }
}

impl FromStr for ProfileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(ProfileCategory::Individual),
            "agent" => Ok(ProfileCategory::Agent),
            "organization" => Ok(ProfileCategory::Organization),
            other => Err(format!("unknown profile category: {}", other)),
        }
    }
}

impl fmt::Display for ProfileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a market's outcome is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleKind {
    Manual,
    PriceFeed,
    Api,
}

impl OracleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OracleKind::Manual => "manual",
            OracleKind::PriceFeed => "price_feed",
            OracleKind::Api => "api",
        }
    }
}

impl FromStr for OracleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(OracleKind::Manual),
            "price_feed" => Ok(OracleKind::PriceFeed),
            "api" => Ok(OracleKind::Api),
            other => Err(format!("unknown oracle kind: {}", other)),
        }
    }
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile record
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub owner_address: Address,
    pub category: ProfileCategory,
    pub description: Option<String>,
    /// Row id of the group this profile belongs to (weak reference)
    pub group_id: Option<i64>,
    pub score_total: i64,
    pub win_count: i64,
    pub loss_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Market record
///
/// `external_id` is the id of the market contract entry on-chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub name: String,
    pub external_id: i64,
    pub category: String,
    pub oracle_kind: OracleKind,
    pub oracle_source: Option<String>,
    pub creator_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Group record
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub external_id: i64,
    pub description: Option<String>,
    pub avatar_uri: Option<String>,
    pub created_at: DateTime<Utc>,
}
