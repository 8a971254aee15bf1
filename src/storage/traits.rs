use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Item not found")]
    NotFound,
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Failed to encode or decode stored document: {0}")]
    Codec(String),
}

/// The store primitives the indexer is built on.
///
/// Shaped after the Redis commands of the same name so that the Redis
/// backend is a thin mapping and the in-memory backend can stand in for it.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// `GET key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// `SET key value [EX ttl]`
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), StorageError>;

    /// `ZADD key score member`. Re-adding a member updates its score.
    async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<(), StorageError>;

    /// `ZRANGE key start stop`, ascending by score then member.
    /// `stop` is inclusive; negative indices count from the end.
    async fn zrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, StorageError>;

    /// `HGETALL key`. An absent key yields an empty map.
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StorageError>;

    /// `HSET key field value [field value ...]`. Fields not named are left untouched.
    async fn hmset(&self, key: &str, fields: &[(String, String)]) -> Result<(), StorageError>;
}
