//! The three sorted search indices of a parent-category partition.
//!
//! ```text
//! Search:SortByTime:Pid{pid}   score = update time (epoch seconds)
//! Search:SortByScore:Pid{pid}  score = rating
//! Search:SortByRank:Pid{pid}   score = popularity id
//! ```
//!
//! Every index holds the record's JSON as the member. The three writes are
//! independent: a failure leaves the record in the indices already written
//! and the remaining ones are still attempted.

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::config::IndexerConfig;
use crate::keys::KeySpace;
use crate::metrics;
use crate::record::SearchRecord;
use crate::storage::traits::{IndexStore, StorageError};

/// Ordering criterion of a sorted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Time,
    Score,
    Rank,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Time, SortOrder::Score, SortOrder::Rank];

    /// Sort key of `record` under this order.
    pub fn score_of(self, record: &SearchRecord) -> f64 {
        match self {
            SortOrder::Time => record.timestamp as f64,
            SortOrder::Score => record.score,
            SortOrder::Rank => record.rank as f64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Time => "time",
            SortOrder::Score => "score",
            SortOrder::Rank => "rank",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes search records into the sorted indices and reads them back.
pub struct IndexWriter {
    store: Arc<dyn IndexStore>,
    keys: KeySpace,
}

impl IndexWriter {
    pub fn new(config: &IndexerConfig, store: Arc<dyn IndexStore>) -> Self {
        Self {
            store,
            keys: KeySpace::new(config.key_templates.clone()),
        }
    }

    fn key(&self, parent_id: i64, order: SortOrder) -> String {
        match order {
            SortOrder::Time => self.keys.time_index(parent_id),
            SortOrder::Score => self.keys.score_index(parent_id),
            SortOrder::Rank => self.keys.rank_index(parent_id),
        }
    }

    /// Add `record` to all three indices of its partition.
    ///
    /// Attempts every index even after a failure; returns the failure of
    /// the last index that failed, in time, score, rank order.
    #[instrument(skip(self, record), fields(movie_id = record.movie_id, parent_id = record.parent_category_id))]
    pub async fn write(&self, record: &SearchRecord) -> Result<(), StorageError> {
        let member = record.to_member()?;
        let mut last_error = None;

        for order in SortOrder::ALL {
            let key = self.key(record.parent_category_id, order);
            match self.store.zadd(&key, order.score_of(record), &member).await {
                Ok(()) => metrics::record_store_operation("zadd", "success"),
                Err(e) => {
                    warn!(key = %key, order = %order, error = %e, "Sorted index write failed");
                    metrics::record_store_operation("zadd", "error");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Read `start..=stop` of an index, ascending.
    ///
    /// Members that no longer decode as a [`SearchRecord`] are skipped.
    pub async fn range(
        &self,
        parent_id: i64,
        order: SortOrder,
        start: isize,
        stop: isize,
    ) -> Result<Vec<SearchRecord>, StorageError> {
        let key = self.key(parent_id, order);
        let result = self.store.zrange(&key, start, stop).await;
        metrics::record_store_operation("zrange", if result.is_ok() { "success" } else { "error" });
        let members = result?;

        Ok(members
            .iter()
            .filter_map(|member| match SearchRecord::from_member(member) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping undecodable index member");
                    None
                }
            })
            .collect())
    }
}
