// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the facet indexer.
//!
//! Uses the `metrics` crate for backend-agnostic collection; the host
//! process installs the exporter.
//!
//! # Metric Naming Convention
//! - `facet_index_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: get, set, zadd, zrange, hgetall, hmset
//! - `status`: success, error, partial
//! - `facet`: Category, Tag, Area, Language
//! - `field`: score, year, timestamp
//! - `stage`: vocabulary, index, batch

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record an ingested record's outcome
pub fn record_ingested(status: &str) {
    counter!(
        "facet_index_records_ingested_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a store command outcome
pub fn record_store_operation(operation: &str, status: &str) {
    counter!(
        "facet_index_store_operations_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a token appended to a facet vocabulary
pub fn record_facet_token(facet: &str) {
    counter!(
        "facet_index_facet_tokens_appended_total",
        "facet" => facet.to_string()
    )
    .increment(1);
}

/// Record a field that fell back to its default during normalization
pub fn record_parse_default(field: &str) {
    counter!(
        "facet_index_parse_defaults_total",
        "field" => field.to_string()
    )
    .increment(1);
}

/// Record batch size
pub fn record_batch_size(count: usize) {
    histogram!("facet_index_batch_size").record(count as f64);
}

/// Record stage latency
pub fn record_latency(stage: &str, duration: Duration) {
    histogram!(
        "facet_index_stage_seconds",
        "stage" => stage.to_string()
    )
    .record(duration.as_secs_f64());
}

/// A timing guard that records latency on drop
pub struct LatencyTimer {
    stage: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(self.stage, self.start.elapsed());
    }
}
