// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Batch ingestion.
//!
//! For every [`MovieDetail`] in a batch:
//!
//! ```text
//! normalize ──┬─ snapshots   SET detail, SET basic info   (optional)
//!             ├─ vocabulary  lock → HGETALL → merge → HMSET
//!             └─ indices     ZADD time, ZADD score, ZADD rank
//! ```
//!
//! A failed step is logged and remembered; the record's remaining steps and
//! the rest of the batch still run. Nothing is rolled back. The batch
//! reports counts plus the last failure, where "last" means the failing
//! record latest in the batch and, within it, its latest failing step.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::IndexerConfig;
use crate::detail::MovieDetail;
use crate::index_writer::IndexWriter;
use crate::metrics::{self, LatencyTimer};
use crate::normalizer::normalize_with_defaults;
use crate::snapshot::SnapshotStore;
use crate::storage::traits::{IndexStore, StorageError};
use crate::vocabulary::VocabularyAccessor;

/// Stage of a record's ingestion, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IngestStep {
    Snapshot,
    Vocabulary,
    Index,
    /// The record's task panicked or was cancelled
    Aborted,
}

impl std::fmt::Display for IngestStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snapshot => write!(f, "snapshot"),
            Self::Vocabulary => write!(f, "vocabulary"),
            Self::Index => write!(f, "index"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// A failed step of one record.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("record #{index} (movie {movie_id}) failed at {step}: {source}")]
pub struct IngestError {
    /// Position of the record in the batch
    pub index: usize,
    pub movie_id: i64,
    pub step: IngestStep,
    pub source: StorageError,
}

/// Counts of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Total records in the batch
    pub total: usize,
    /// Records with every step written
    pub succeeded: usize,
    /// Records with at least one failed step
    pub failed: usize,
}

impl BatchResult {
    /// Check if all records succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Outcome of [`BatchPipeline::ingest`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub result: BatchResult,
    pub last_error: Option<IngestError>,
}

impl BatchReport {
    /// The counts, or the last failure if any record failed.
    ///
    /// Every failed record carries an error, so `Ok` implies
    /// `result.failed == 0`.
    pub fn into_result(self) -> Result<BatchResult, IngestError> {
        match self.last_error {
            Some(e) => Err(e),
            None => Ok(self.result),
        }
    }
}

struct Stages {
    persist_snapshots: bool,
    snapshots: SnapshotStore,
    vocabulary: VocabularyAccessor,
    writer: IndexWriter,
}

impl Stages {
    /// Run every step for one record; failures in step order.
    async fn process(&self, index: usize, detail: &MovieDetail) -> Vec<IngestError> {
        let (record, defaulted) = normalize_with_defaults(detail);
        for field in defaulted {
            debug!(index, movie_id = record.movie_id, field, "Defaulted unparseable field");
            metrics::record_parse_default(field);
        }

        let mut failures = Vec::new();
        let mut fail = |step: IngestStep, source: StorageError| {
            warn!(index, movie_id = record.movie_id, step = %step, error = %source, "Ingest step failed");
            failures.push(IngestError { index, movie_id: record.movie_id, step, source });
        };

        if self.persist_snapshots {
            if let Err(e) = self.snapshots.save_detail(detail).await {
                fail(IngestStep::Snapshot, e);
            }
            if let Err(e) = self.snapshots.save_basic_info(detail).await {
                fail(IngestStep::Snapshot, e);
            }
        }

        {
            let _timer = LatencyTimer::new("vocabulary");
            match self.vocabulary.update(&record).await {
                Ok(outcome) if !outcome.is_unchanged() => {
                    debug!(parent_id = record.parent_category_id, appended = outcome.appended.len(), "Vocabulary grew");
                }
                Ok(_) => {}
                Err(e) => fail(IngestStep::Vocabulary, e),
            }
        }

        {
            let _timer = LatencyTimer::new("index");
            if let Err(e) = self.writer.write(&record).await {
                fail(IngestStep::Index, e);
            }
        }

        metrics::record_ingested(if failures.is_empty() { "success" } else { "partial" });
        failures
    }
}

/// Runs batches of raw details through normalization, vocabulary merge and
/// index writes.
pub struct BatchPipeline {
    stages: Arc<Stages>,
    max_concurrency: usize,
}

impl BatchPipeline {
    pub fn new(config: IndexerConfig, store: Arc<dyn IndexStore>) -> Self {
        let stages = Stages {
            persist_snapshots: config.persist_snapshots,
            snapshots: SnapshotStore::new(&config, store.clone()),
            vocabulary: VocabularyAccessor::new(&config, store.clone()),
            writer: IndexWriter::new(&config, store),
        };
        Self {
            stages: Arc::new(stages),
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    pub fn vocabulary(&self) -> &VocabularyAccessor {
        &self.stages.vocabulary
    }

    pub fn index_writer(&self) -> &IndexWriter {
        &self.stages.writer
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.stages.snapshots
    }

    /// Ingest a batch, best effort.
    ///
    /// With `max_concurrency == 1` records run strictly in arrival order.
    /// Otherwise up to `max_concurrency` run at once: vocabulary updates
    /// within a partition are serialized by its lock but applied in
    /// completion order, so newly appended tokens may appear in the stored
    /// lists in a different order than their records arrived. The token
    /// sets are the same either way.
    ///
    /// A record whose task panics is reported as failed at
    /// [`IngestStep::Aborted`]. In the sequential mode a panic is not
    /// caught and unwinds out of `ingest`.
    pub async fn ingest<I>(&self, batch: I) -> BatchReport
    where
        I: IntoIterator<Item = MovieDetail>,
    {
        let _timer = LatencyTimer::new("batch");
        let batch: Vec<MovieDetail> = batch.into_iter().collect();
        let total = batch.len();
        metrics::record_batch_size(total);

        let movie_ids: Vec<i64> = batch.iter().map(|d| d.id).collect();
        let mut per_record: Vec<(usize, Vec<IngestError>)> = Vec::with_capacity(total);

        if self.max_concurrency == 1 {
            for (index, detail) in batch.iter().enumerate() {
                per_record.push((index, self.stages.process(index, detail).await));
            }
        } else {
            let permits = Arc::new(Semaphore::new(self.max_concurrency));
            let mut tasks = JoinSet::new();
            for (index, detail) in batch.into_iter().enumerate() {
                let stages = self.stages.clone();
                let permits = permits.clone();
                tasks.spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    (index, stages.process(index, &detail).await)
                });
            }
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(done) => per_record.push(done),
                    Err(e) => error!(error = %e, "Ingest task aborted"),
                }
            }
        }

        // Records whose task never returned
        let mut finished = vec![false; total];
        for (index, _) in &per_record {
            finished[*index] = true;
        }
        for (index, _) in finished.iter().enumerate().filter(|(_, done)| !**done) {
            per_record.push((
                index,
                vec![IngestError {
                    index,
                    movie_id: movie_ids[index],
                    step: IngestStep::Aborted,
                    source: StorageError::Backend("ingest task aborted".to_string()),
                }],
            ));
        }

        let failed = per_record.iter().filter(|(_, errors)| !errors.is_empty()).count();
        let last_error = per_record
            .into_iter()
            .filter_map(|(index, mut errors)| errors.pop().map(|e| (index, e)))
            .max_by_key(|(index, _)| *index)
            .map(|(_, e)| e);

        let result = BatchResult { total, succeeded: total - failed, failed };
        if result.is_success() {
            info!(total, "Batch ingested");
        } else {
            warn!(total, failed, "Batch ingested with failures");
        }

        BatchReport { result, last_error }
    }
}
