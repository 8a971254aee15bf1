//! Configuration for the facet indexer.
//!
//! # Example
//!
//! ```
//! use facet_index::IndexerConfig;
//! use facet_index::vocabulary::MembershipMode;
//!
//! // Minimal config (uses defaults)
//! let config = IndexerConfig::default();
//! assert_eq!(config.detail_ttl_secs, 10 * 24 * 60 * 60); // 10 days
//! assert_eq!(config.membership, MembershipMode::Substring);
//!
//! // Full config
//! let config = IndexerConfig {
//!     redis_url: Some("redis://localhost:6379".into()),
//!     key_prefix: Some("film:".into()),
//!     max_concurrency: 4,
//!     membership: MembershipMode::Exact,
//!     ..Default::default()
//! };
//! assert_eq!(config.year_seed_span, 12);
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::keys::KeyTemplates;
use crate::vocabulary::MembershipMode;

/// Configuration for the indexer.
///
/// Every field has a default, so an empty document deserializes to
/// [`IndexerConfig::default()`].
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    /// Redis connection string (e.g., "redis://localhost:6379")
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Prefix applied to every Redis key (e.g., "film:")
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Expiry of detail and basic-info snapshots (default: 10 days)
    #[serde(default = "default_detail_ttl_secs")]
    pub detail_ttl_secs: u64,

    /// Records processed concurrently within one batch.
    ///
    /// Above 1, tokens appended to a partition's vocabulary follow record
    /// completion order rather than arrival order; 1 keeps arrival order.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// How facet membership is tested before appending a token
    #[serde(default)]
    pub membership: MembershipMode,

    /// Number of years seeded into a new vocabulary, counting back from the current one
    #[serde(default = "default_year_seed_span")]
    pub year_seed_span: u32,

    /// Fixed sort options published alongside the vocabulary
    #[serde(default = "default_sort_options")]
    pub sort_options: Vec<String>,

    /// Also write detail and basic-info snapshots during ingest
    #[serde(default = "default_persist_snapshots")]
    pub persist_snapshots: bool,

    /// Key layout
    #[serde(default)]
    pub key_templates: KeyTemplates,
}

fn default_detail_ttl_secs() -> u64 { 10 * 24 * 60 * 60 }
fn default_max_concurrency() -> usize { 16 }
fn default_year_seed_span() -> u32 { 12 }
fn default_sort_options() -> Vec<String> {
    vec!["Time".to_string(), "Db".to_string(), "Score".to_string()]
}
fn default_persist_snapshots() -> bool { true }

impl IndexerConfig {
    /// Snapshot expiry as a [`Duration`].
    #[must_use]
    pub fn detail_ttl(&self) -> Duration {
        Duration::from_secs(self.detail_ttl_secs)
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: None,
            detail_ttl_secs: default_detail_ttl_secs(),
            max_concurrency: default_max_concurrency(),
            membership: MembershipMode::default(),
            year_seed_span: default_year_seed_span(),
            sort_options: default_sort_options(),
            persist_snapshots: default_persist_snapshots(),
            key_templates: KeyTemplates::default(),
        }
    }
}
