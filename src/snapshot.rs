//! Detail, basic-info and listing persistence.
//!
//! Plain field-copy storage next to the search indices: listings go into a
//! per-category sorted set scored by movie id, details and their basic-info
//! summaries into expiring string keys.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{instrument, warn};

use crate::config::IndexerConfig;
use crate::detail::{MovieBasicInfo, MovieDetail, MovieListing};
use crate::keys::KeySpace;
use crate::metrics;
use crate::storage::traits::{IndexStore, StorageError};

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(value).map_err(|e| StorageError::Codec(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StorageError> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::Codec(e.to_string()))
}

pub struct SnapshotStore {
    store: Arc<dyn IndexStore>,
    keys: KeySpace,
    ttl: Duration,
}

impl SnapshotStore {
    pub fn new(config: &IndexerConfig, store: Arc<dyn IndexStore>) -> Self {
        Self {
            store,
            keys: KeySpace::new(config.key_templates.clone()),
            ttl: config.detail_ttl(),
        }
    }

    /// Add listings to their category sets, scored by movie id.
    ///
    /// Keeps going past failures and returns the last one.
    #[instrument(skip(self, listings), fields(count = listings.len()))]
    pub async fn save_listings(&self, listings: &[MovieListing]) -> Result<(), StorageError> {
        let mut last_error = None;
        for listing in listings {
            let result = match serde_json::to_string(listing) {
                Ok(member) => {
                    self.store
                        .zadd(&self.keys.listing(listing.cid), listing.id as f64, &member)
                        .await
                }
                Err(e) => Err(StorageError::Codec(e.to_string())),
            };
            if let Err(e) = result {
                warn!(movie_id = listing.id, cid = listing.cid, error = %e, "Listing write failed");
                metrics::record_store_operation("zadd", "error");
                last_error = Some(e);
            } else {
                metrics::record_store_operation("zadd", "success");
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// All listings of a category, ascending by movie id.
    pub async fn listings(&self, cid: i64) -> Result<Vec<MovieListing>, StorageError> {
        let result = self.store.zrange(&self.keys.listing(cid), 0, -1).await;
        metrics::record_store_operation("zrange", if result.is_ok() { "success" } else { "error" });
        result?
            .iter()
            .map(|member| decode(member.as_bytes()))
            .collect()
    }

    /// Store the full detail with the snapshot expiry.
    #[instrument(skip(self, detail), fields(movie_id = detail.id, cid = detail.cid))]
    pub async fn save_detail(&self, detail: &MovieDetail) -> Result<(), StorageError> {
        let data = encode(detail)?;
        let result = self
            .store
            .set(&self.keys.detail(detail.cid, detail.id), &data, Some(self.ttl))
            .await;
        metrics::record_store_operation("set", if result.is_ok() { "success" } else { "error" });
        result
    }

    /// Store the basic-info summary of `detail` with the snapshot expiry.
    #[instrument(skip(self, detail), fields(movie_id = detail.id, cid = detail.cid))]
    pub async fn save_basic_info(&self, detail: &MovieDetail) -> Result<(), StorageError> {
        let data = encode(&MovieBasicInfo::from(detail))?;
        let result = self
            .store
            .set(&self.keys.basic_info(detail.cid, detail.id), &data, Some(self.ttl))
            .await;
        metrics::record_store_operation("set", if result.is_ok() { "success" } else { "error" });
        result
    }

    pub async fn detail(&self, cid: i64, id: i64) -> Result<Option<MovieDetail>, StorageError> {
        let result = self.store.get(&self.keys.detail(cid, id)).await;
        metrics::record_store_operation("get", if result.is_ok() { "success" } else { "error" });
        match result? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    pub async fn basic_info(&self, cid: i64, id: i64) -> Result<Option<MovieBasicInfo>, StorageError> {
        let result = self.store.get(&self.keys.basic_info(cid, id)).await;
        metrics::record_store_operation("get", if result.is_ok() { "success" } else { "error" });
        match result? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryIndexStore;

    fn detail(id: i64) -> MovieDetail {
        let mut detail = MovieDetail {
            id,
            cid: 6,
            pid: 1,
            name: format!("Movie {}", id),
            ..Default::default()
        };
        detail.descriptor.area = "USA".to_string();
        detail.descriptor.content = "Long synopsis".to_string();
        detail
    }

    fn snapshots(store: Arc<InMemoryIndexStore>) -> SnapshotStore {
        SnapshotStore::new(&IndexerConfig::default(), store)
    }

    #[tokio::test]
    async fn test_detail_round_trip() {
        let store = Arc::new(InMemoryIndexStore::new());
        let snapshots = snapshots(store);

        snapshots.save_detail(&detail(7)).await.unwrap();

        assert_eq!(snapshots.detail(6, 7).await.unwrap(), Some(detail(7)));
        assert_eq!(snapshots.detail(6, 8).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_basic_info_is_summary() {
        let store = Arc::new(InMemoryIndexStore::new());
        let snapshots = snapshots(store.clone());

        snapshots.save_basic_info(&detail(7)).await.unwrap();

        let info = snapshots.basic_info(6, 7).await.unwrap().unwrap();
        assert_eq!(info.name, "Movie 7");
        assert_eq!(info.area, "USA");

        let raw = store.get("MovieBasicInfo:Cid6:Id7").await.unwrap().unwrap();
        assert!(!String::from_utf8(raw).unwrap().contains("Long synopsis"));
    }

    #[tokio::test]
    async fn test_snapshots_expire() {
        let store = Arc::new(InMemoryIndexStore::new());
        let config = IndexerConfig { detail_ttl_secs: 0, ..Default::default() };
        let snapshots = SnapshotStore::new(&config, store);

        snapshots.save_detail(&detail(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(snapshots.detail(6, 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_listings_ordered_by_id() {
        let store = Arc::new(InMemoryIndexStore::new());
        let snapshots = snapshots(store);

        let listing = |id: i64, cid: i64| MovieListing { id, cid, name: format!("L{}", id), ..Default::default() };
        snapshots
            .save_listings(&[listing(30, 6), listing(10, 6), listing(20, 7)])
            .await
            .unwrap();

        let six: Vec<i64> = snapshots.listings(6).await.unwrap().iter().map(|l| l.id).collect();
        assert_eq!(six, vec![10, 30]);
        assert_eq!(snapshots.listings(7).await.unwrap().len(), 1);
        assert!(snapshots.listings(8).await.unwrap().is_empty());
    }
}
