//! Loads, seeds and stores vocabulary documents.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::aggregator::{FacetAggregator, MergeOutcome};
use super::document::FacetVocabulary;
use super::locks::PartitionLocks;
use crate::config::IndexerConfig;
use crate::keys::KeySpace;
use crate::metrics;
use crate::record::SearchRecord;
use crate::storage::traits::{IndexStore, StorageError};

/// Reads and writes the vocabulary hash of each parent-category partition.
///
/// A partition without a seeded document loads as a fresh one: `Year`
/// covers the current year and the years before it, `Initial` covers
/// `A`–`Z`. Seeding happens only then, so `Year` does not roll forward on
/// its own once a document exists.
pub struct VocabularyAccessor {
    store: Arc<dyn IndexStore>,
    keys: KeySpace,
    aggregator: FacetAggregator,
    year_seed_span: u32,
    sort_options: Vec<String>,
    locks: PartitionLocks,
}

impl VocabularyAccessor {
    pub fn new(config: &IndexerConfig, store: Arc<dyn IndexStore>) -> Self {
        Self {
            store,
            keys: KeySpace::new(config.key_templates.clone()),
            aggregator: FacetAggregator::new(config.membership),
            year_seed_span: config.year_seed_span,
            sort_options: config.sort_options.clone(),
            locks: PartitionLocks::new(),
        }
    }

    /// Read the partition's vocabulary, seeding a fresh one when absent.
    #[instrument(skip(self))]
    pub async fn load(&self, parent_id: i64) -> Result<FacetVocabulary, StorageError> {
        let result = self.store.hgetall(&self.keys.vocabulary(parent_id)).await;
        metrics::record_store_operation("hgetall", if result.is_ok() { "success" } else { "error" });
        let hash = result?;
        match FacetVocabulary::from_hash(&hash) {
            Some(mut vocabulary) => {
                if vocabulary.sort_options.is_empty() {
                    vocabulary.sort_options = self.sort_options.clone();
                }
                Ok(vocabulary)
            }
            None => {
                debug!(parent_id, "Seeding new vocabulary");
                Ok(FacetVocabulary::seeded(self.year_seed_span, &self.sort_options))
            }
        }
    }

    /// Overwrite the partition's stored vocabulary with `vocabulary`.
    #[instrument(skip(self, vocabulary))]
    pub async fn store(&self, parent_id: i64, vocabulary: &FacetVocabulary) -> Result<(), StorageError> {
        let result = self
            .store
            .hmset(&self.keys.vocabulary(parent_id), &vocabulary.to_hash())
            .await;
        metrics::record_store_operation("hmset", if result.is_ok() { "success" } else { "error" });
        result
    }

    /// Merge `record` into its partition's vocabulary.
    ///
    /// The load → merge → store cycle holds the partition lock, so
    /// concurrent updates through this accessor never lose tokens. When
    /// nothing new was appended the store write is still issued, keeping a
    /// freshly seeded partition persisted on its first record.
    pub async fn update(&self, record: &SearchRecord) -> Result<MergeOutcome, StorageError> {
        let parent_id = record.parent_category_id;
        let _guard = self.locks.lock(parent_id).await;

        let mut vocabulary = self.load(parent_id).await?;
        let outcome = self.aggregator.merge_into(&mut vocabulary, record);
        self.store(parent_id, &vocabulary).await?;

        for (facet, token) in &outcome.appended {
            debug!(parent_id, facet = %facet, token = %token, "Appended facet token");
            metrics::record_facet_token(facet.field_name());
        }
        Ok(outcome)
    }
}
