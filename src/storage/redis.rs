//! Redis backend for the indexer.
//!
//! Maps each [`IndexStore`] primitive onto a single Redis command:
//!
//! ```text
//! get      → GET
//! set      → SET / SET EX
//! zadd     → ZADD
//! zrange   → ZRANGE
//! hgetall  → HGETALL
//! hmset    → HSET key f v [f v ...]
//! ```
//!
//! Data commands are issued once; a failure is returned to the caller, who
//! decides whether to keep going. Only the initial connection is retried.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::instrument;

use super::traits::{IndexStore, StorageError};
use crate::config::IndexerConfig;
use crate::resilience::retry::{retry, RetryConfig};

pub struct RedisIndexStore {
    connection: ConnectionManager,
    /// Optional key prefix for namespacing (e.g., "film:" → "film:Search:Keys:Pid1")
    prefix: String,
}

impl RedisIndexStore {
    /// Connect without a key prefix.
    pub async fn new(connection_string: &str) -> Result<Self, StorageError> {
        Self::with_prefix(connection_string, None).await
    }

    /// Connect with an optional key prefix.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use facet_index::RedisIndexStore;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// // Keys will be prefixed: "film:MovieList:Cid6", "film:Search:Keys:Pid1"
    /// let store = RedisIndexStore::with_prefix("redis://localhost", Some("film:")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_prefix(connection_string: &str, prefix: Option<&str>) -> Result<Self, StorageError> {
        let client = Client::open(connection_string)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let connection = retry("redis_connect", &RetryConfig::startup(), || async {
            ConnectionManager::new(client.clone()).await
        })
        .await
        .map_err(|e: redis::RedisError| StorageError::Backend(e.to_string()))?;

        Ok(Self {
            connection,
            prefix: prefix.unwrap_or("").to_string(),
        })
    }

    /// Connect using `redis_url` and `key_prefix` from the indexer config.
    pub async fn from_config(config: &IndexerConfig) -> Result<Self, StorageError> {
        let url = config
            .redis_url
            .as_deref()
            .ok_or_else(|| StorageError::Backend("redis_url is not configured".to_string()))?;
        Self::with_prefix(url, config.key_prefix.as_deref()).await
    }

    #[inline]
    fn prefixed_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}{}", self.prefix, key)
        }
    }

    /// Get the configured prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

fn backend(op: &str) -> impl Fn(redis::RedisError) -> StorageError + '_ {
    move |e| StorageError::Backend(format!("{} failed: {}", op, e))
}

#[async_trait]
impl IndexStore for RedisIndexStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let mut conn = self.connection.clone();
        conn.get(self.prefixed_key(key)).await.map_err(backend("GET"))
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), StorageError> {
        let mut conn = self.connection.clone();
        let key = self.prefixed_key(key);
        match ttl {
            Some(ttl) => conn
                .set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
                .await
                .map_err(backend("SET EX")),
            None => conn.set::<_, _, ()>(key, value).await.map_err(backend("SET")),
        }
    }

    #[instrument(skip(self, member))]
    async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<(), StorageError> {
        let mut conn = self.connection.clone();
        conn.zadd::<_, _, _, ()>(self.prefixed_key(key), member, score)
            .await
            .map_err(backend("ZADD"))
    }

    #[instrument(skip(self))]
    async fn zrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, StorageError> {
        let mut conn = self.connection.clone();
        conn.zrange(self.prefixed_key(key), start, stop)
            .await
            .map_err(backend("ZRANGE"))
    }

    #[instrument(skip(self))]
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StorageError> {
        let mut conn = self.connection.clone();
        conn.hgetall(self.prefixed_key(key)).await.map_err(backend("HGETALL"))
    }

    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn hmset(&self, key: &str, fields: &[(String, String)]) -> Result<(), StorageError> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection.clone();
        conn.hset_multiple::<_, _, _, ()>(self.prefixed_key(key), fields)
            .await
            .map_err(backend("HSET"))
    }
}
