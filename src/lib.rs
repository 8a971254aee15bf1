//! # Facet Index
//!
//! Maintains the search side of a media catalogue: every ingested detail
//! record is normalized, its facet values are folded into the per-partition
//! filter vocabulary, and the record is written into three sorted indices.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     BatchPipeline::ingest                   │
//! │  • Bounded concurrency over a batch of MovieDetail records  │
//! │  • Best effort: keeps going, reports the last failure       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Normalizer                           │
//! │  • MovieDetail → SearchRecord (pure, total)                 │
//! │  • Parse-or-default for score, year, update time            │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                               │
//!                 ▼                               ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  VocabularyAccessor           │ │  IndexWriter              │
//! │  • per-partition lock         │ │  • ZADD by time           │
//! │  • HGETALL → merge → HMSET    │ │  • ZADD by score          │
//! │  • seeds Year / Initial       │ │  • ZADD by rank           │
//! └───────────────────────────────┘ └───────────────────────────┘
//!                 │                               │
//!                 └───────────────┬───────────────┘
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            IndexStore (Redis or in-memory)                  │
//! │  GET / SET+TTL / ZADD / ZRANGE / HGETALL / HMSET            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use facet_index::{BatchPipeline, IndexerConfig, InMemoryIndexStore, MovieDetail};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(InMemoryIndexStore::new());
//!     let pipeline = BatchPipeline::new(IndexerConfig::default(), store);
//!
//!     let batch: Vec<MovieDetail> = Vec::new();
//!     let report = pipeline.ingest(batch).await;
//!     assert!(report.last_error.is_none());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`normalizer`]: raw detail → [`SearchRecord`]
//! - [`vocabulary`]: facet sets, seeding, merge and persistence
//! - [`index_writer`]: the time / score / rank sorted indices
//! - [`snapshot`]: detail, basic-info and listing persistence
//! - [`pipeline`]: batch orchestration
//! - [`storage`]: store trait plus Redis and in-memory backends

pub mod config;
pub mod keys;
pub mod detail;
pub mod record;
pub mod normalizer;
pub mod vocabulary;
pub mod index_writer;
pub mod snapshot;
pub mod pipeline;
pub mod storage;
pub mod resilience;
pub mod metrics;

pub use config::IndexerConfig;
pub use keys::{KeySpace, KeyTemplates};
pub use detail::{EpisodeLink, MovieBasicInfo, MovieDescriptor, MovieDetail, MovieListing};
pub use record::SearchRecord;
pub use normalizer::{normalize, normalize_with_defaults, parse_score, parse_timestamp, parse_year, Parsed};
pub use vocabulary::{
    split_tokens, Facet, FacetAggregator, FacetSet, FacetVocabulary, MembershipMode,
    PartitionLocks, VocabularyAccessor,
};
pub use index_writer::{IndexWriter, SortOrder};
pub use snapshot::SnapshotStore;
pub use pipeline::{BatchPipeline, BatchReport, BatchResult, IngestError, IngestStep};
pub use storage::memory::InMemoryIndexStore;
pub use storage::redis::RedisIndexStore;
pub use storage::traits::{IndexStore, StorageError};
pub use metrics::LatencyTimer;
