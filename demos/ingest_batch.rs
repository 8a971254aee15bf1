// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Batch ingest example.
//!
//! Demonstrates:
//! 1. Ingesting a small batch of detail records
//! 2. Reading back the partition's facet vocabulary
//! 3. Listing the three sorted indices
//! 4. Displaying metrics
//!
//! Uses the in-memory store unless `REDIS_URL` is set.
//!
//! # Run
//!
//! ```bash
//! cargo run --example ingest_batch
//! REDIS_URL=redis://localhost:6379 cargo run --example ingest_batch
//! ```

use std::sync::Arc;

use facet_index::storage::traits::IndexStore;
use facet_index::vocabulary::Facet;
use facet_index::{
    BatchPipeline, IndexerConfig, InMemoryIndexStore, MovieDetail, RedisIndexStore, SortOrder,
};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use tracing_subscriber::EnvFilter;

fn detail(id: i64, name: &str, tags: &str, area: &str, score: &str, update_time: &str) -> MovieDetail {
    let mut detail = MovieDetail {
        id,
        cid: 6,
        pid: 1,
        name: name.to_string(),
        ..Default::default()
    };
    let d = &mut detail.descriptor;
    d.c_name = "Action".to_string();
    d.class_tag = tags.to_string();
    d.area = area.to_string();
    d.language = "English".to_string();
    d.year = "2021".to_string();
    d.initial = name.chars().next().map(String::from).unwrap_or_default();
    d.db_score = score.to_string();
    d.db_id = 1_000 + id;
    d.update_time = update_time.to_string();
    detail
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let store: Arc<dyn IndexStore> = match std::env::var("REDIS_URL") {
        Ok(url) => {
            println!("📦 Using Redis at {}", url);
            Arc::new(RedisIndexStore::with_prefix(&url, Some("demo:")).await?)
        }
        Err(_) => {
            println!("📦 Using the in-memory store");
            Arc::new(InMemoryIndexStore::new())
        }
    };

    let config = IndexerConfig { max_concurrency: 4, ..Default::default() };
    let pipeline = BatchPipeline::new(config, store);

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Ingest
    // ─────────────────────────────────────────────────────────────────────────
    let batch = vec![
        detail(1, "Night Train", "Action/Thriller", "USA/Canada", "7.8", "2024-03-01 12:00:00"),
        detail(2, "Harbor Lights", "Drama", "Japan", "8.4", "2024-02-11 09:30:00"),
        detail(3, "Iron Field", "Action,War", "USA", "n/a", "not-a-date"),
        detail(4, "Blue Delta", "Thriller", "France", "6.1", "2023-12-24 18:45:00"),
    ];
    let report = pipeline.ingest(batch).await;
    println!(
        "✅ Ingested {}/{} records",
        report.result.succeeded, report.result.total
    );
    if let Some(e) = &report.last_error {
        println!("⚠️  Last error: {}", e);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Vocabulary
    // ─────────────────────────────────────────────────────────────────────────
    let vocabulary = pipeline.vocabulary().load(1).await?;
    println!("\n🔎 Facet vocabulary for partition 1");
    for facet in Facet::ALL {
        println!("   {:<9} {}", facet, vocabulary.facet(facet).flatten());
    }
    println!("   {:<9} {}", "Sort", vocabulary.sort_options.join(","));

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Sorted indices
    // ─────────────────────────────────────────────────────────────────────────
    for order in SortOrder::ALL {
        let records = pipeline.index_writer().range(1, order, 0, -1).await?;
        println!("\n📊 By {}", order);
        for r in records {
            println!(
                "   {:<14} time={:<11} score={:<4} rank={}",
                r.name, r.timestamp, r.score, r.rank
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Metrics
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📈 Metrics");
    dump_metrics(&snapshotter);

    Ok(())
}

/// Print every captured counter and histogram
fn dump_metrics(snapshotter: &Snapshotter) {
    let mut lines = vec![];

    for (composite_key, _, _, value) in snapshotter.snapshot().into_vec() {
        let (_, key) = composite_key.into_parts();
        let labels: Vec<_> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
        let label_str = if labels.is_empty() { String::new() } else { format!("{{{}}}", labels.join(",")) };

        let rendered = match value {
            DebugValue::Counter(v) => format!("{}", v),
            DebugValue::Gauge(v) => format!("{:.2}", v.into_inner()),
            DebugValue::Histogram(samples) => {
                let sum: f64 = samples.iter().map(|v| v.into_inner()).sum();
                format!("count={} sum={:.4}", samples.len(), sum)
            }
        };
        lines.push(format!("{}{} = {}", key.name(), label_str, rendered));
    }

    lines.sort();
    if lines.is_empty() {
        println!("   └─ (no metrics recorded)");
    }
    for line in lines {
        println!("   └─ {}", line);
    }
}
