// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Facet vocabularies.
//!
//! Each parent-category partition owns one vocabulary document: the distinct
//! categories, tags, regions and languages ever ingested into it, plus a
//! seeded year range, the `A`–`Z` initials and fixed sort options. Search
//! UIs render their filter bars from it.
//!
//! # Storage
//!
//! One hash per partition, every field a comma-joined list:
//!
//! ```text
//! Search:Keys:Pid1
//!   Category  Action,Comedy
//!   Tag       Crime,Thriller
//!   Area      USA,Canada
//!   Language  English
//!   Year      2026,2025,...,2015
//!   Initial   A,B,...,Z
//!   Sort      Time,Db,Score
//! ```
//!
//! # Flow
//!
//! ```text
//! VocabularyAccessor::update(record)
//!     ├─ PartitionLocks::lock(pid)
//!     ├─ load      HGETALL (seed if unseeded)
//!     ├─ FacetAggregator::merge_into
//!     └─ store     HMSET
//! ```

mod facet_set;
mod document;
mod aggregator;
mod locks;
mod accessor;

pub use facet_set::{FacetSet, MembershipMode};
pub use document::{Facet, FacetVocabulary, SORT_FIELD};
pub use aggregator::{split_tokens, FacetAggregator, MergeOutcome};
pub use locks::PartitionLocks;
pub use accessor::VocabularyAccessor;
