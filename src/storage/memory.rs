use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::traits::{IndexStore, StorageError};

struct StringEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StringEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// In-process [`IndexStore`] with Redis-compatible ordering and expiry.
pub struct InMemoryIndexStore {
    strings: DashMap<String, StringEntry>,
    sorted_sets: DashMap<String, Vec<(f64, String)>>,
    hashes: DashMap<String, HashMap<String, String>>,
}

impl InMemoryIndexStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            strings: DashMap::new(),
            sorted_sets: DashMap::new(),
            hashes: DashMap::new(),
        }
    }

    /// Number of members in a sorted set (0 when absent)
    #[must_use]
    pub fn zcard(&self, key: &str) -> usize {
        self.sorted_sets.get(key).map_or(0, |set| set.len())
    }

    /// Score of a sorted-set member
    #[must_use]
    pub fn zscore(&self, key: &str, member: &str) -> Option<f64> {
        self.sorted_sets
            .get(key)
            .and_then(|set| set.iter().find(|(_, m)| m == member).map(|(s, _)| *s))
    }

    /// Total number of keys across all value types
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len() + self.sorted_sets.len() + self.hashes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all keys
    pub fn clear(&self) {
        self.strings.clear();
        self.sorted_sets.clear();
        self.hashes.clear();
    }
}

impl Default for InMemoryIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

fn by_score_then_member(a: &(f64, String), b: &(f64, String)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.as_bytes().cmp(b.1.as_bytes()))
}

/// Resolve Redis-style inclusive `start..=stop` against `len`.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl IndexStore for InMemoryIndexStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let now = Instant::now();
        let value = self
            .strings
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone());
        if value.is_none() {
            self.strings.remove_if(key, |_, entry| !entry.is_live(now));
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), StorageError> {
        self.strings.insert(
            key.to_string(),
            StringEntry {
                value: value.to_vec(),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<(), StorageError> {
        if score.is_nan() {
            return Err(StorageError::Backend("ZADD failed: score is not a valid float".to_string()));
        }
        let mut set = self.sorted_sets.entry(key.to_string()).or_default();
        set.retain(|(_, m)| m != member);
        let entry = (score, member.to_string());
        let at = set.partition_point(|held| by_score_then_member(held, &entry) == Ordering::Less);
        set.insert(at, entry);
        Ok(())
    }

    async fn zrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, StorageError> {
        let Some(set) = self.sorted_sets.get(key) else {
            return Ok(Vec::new());
        };
        Ok(match resolve_range(set.len(), start, stop) {
            Some((from, to)) => set[from..=to].iter().map(|(_, m)| m.clone()).collect(),
            None => Vec::new(),
        })
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StorageError> {
        Ok(self.hashes.get(key).map(|h| h.value().clone()).unwrap_or_default())
    }

    async fn hmset(&self, key: &str, fields: &[(String, String)]) -> Result<(), StorageError> {
        let mut hash = self.hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            hash.insert(field.clone(), value.clone());
        }
        Ok(())
    }
}
