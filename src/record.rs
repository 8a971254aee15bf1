//! The canonical search record.
//!
//! A [`SearchRecord`] is built once per ingested detail, merged into the
//! facet vocabulary, written into the sorted indices and then dropped. Its
//! JSON form is the member stored in every sorted index.

use serde::{Deserialize, Serialize};

use crate::storage::traits::StorageError;

/// Normalized, defensively parsed view of a detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub movie_id: i64,
    pub category_id: i64,
    /// Partition key for facets and sorted indices
    pub parent_category_id: i64,
    pub name: String,
    pub category_name: String,
    pub class_tag: String,
    pub area: String,
    pub language: String,
    /// 0 when the source year did not parse
    pub year: i64,
    pub initial: String,
    /// 0.0 when the source score did not parse
    pub score: f64,
    pub rank: i64,
    /// Epoch seconds; 0 when the update time did not parse
    pub timestamp: i64,
    pub state: String,
    pub remarks: String,
    /// Release ordering key. Upstream often omits the release date, so this
    /// carries the resource's add time instead.
    pub release_rank: i64,
}

impl SearchRecord {
    /// Encode as the sorted-index member.
    pub fn to_member(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::Codec(e.to_string()))
    }

    /// Decode a sorted-index member.
    pub fn from_member(member: &str) -> Result<Self, StorageError> {
        serde_json::from_str(member).map_err(|e| StorageError::Codec(e.to_string()))
    }
}
