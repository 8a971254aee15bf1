//! Integration tests against a real Redis.
//!
//! Tests use testcontainers for portability - no external docker-compose required.
//!
//! # Running Tests
//! ```bash
//! # Requires Docker
//! cargo test --test redis_integration -- --ignored
//! ```

use std::sync::Arc;
use std::time::Duration;

use facet_index::storage::traits::IndexStore;
use facet_index::{BatchPipeline, IndexerConfig, MovieDetail, RedisIndexStore, SortOrder};

use testcontainers::{clients::Cli, core::WaitFor, Container, GenericImage};

// =============================================================================
// Container Helpers
// =============================================================================

/// Create a Redis container with health check
fn redis_container(docker: &Cli) -> Container<'_, GenericImage> {
    let image = GenericImage::new("redis", "7-alpine")
        .with_exposed_port(6379)
        .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"));
    docker.run(image)
}

fn redis_url(container: &Container<'_, GenericImage>) -> String {
    format!("redis://127.0.0.1:{}", container.get_host_port_ipv4(6379))
}

fn detail(id: i64, area: &str, update_time: &str) -> MovieDetail {
    let mut detail = MovieDetail {
        id,
        cid: 6,
        pid: 1,
        name: format!("Movie {}", id),
        ..Default::default()
    };
    let d = &mut detail.descriptor;
    d.c_name = "Action".to_string();
    d.area = area.to_string();
    d.language = "English".to_string();
    d.year = "2019".to_string();
    d.db_score = "6.5".to_string();
    d.db_id = id * 10;
    d.update_time = update_time.to_string();
    detail
}

// =============================================================================
// Store Primitives
// =============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn happy_primitives_round_trip() {
    let docker = Cli::default();
    let redis = redis_container(&docker);
    let store = RedisIndexStore::new(&redis_url(&redis)).await.unwrap();

    store.set("k", b"v", None).await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
    assert_eq!(store.get("missing").await.unwrap(), None);

    store.zadd("z", 2.0, "b").await.unwrap();
    store.zadd("z", 1.0, "a").await.unwrap();
    store.zadd("z", 3.0, "c").await.unwrap();
    assert_eq!(store.zrange("z", 0, -1).await.unwrap(), vec!["a", "b", "c"]);
    assert_eq!(store.zrange("z", -1, -1).await.unwrap(), vec!["c"]);

    store
        .hmset("h", &[("Area".into(), "USA".into()), ("Year".into(), "2020".into())])
        .await
        .unwrap();
    let hash = store.hgetall("h").await.unwrap();
    assert_eq!(hash["Area"], "USA");
    assert!(store.hgetall("nothing").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn happy_set_with_ttl_expires() {
    let docker = Cli::default();
    let redis = redis_container(&docker);
    let store = RedisIndexStore::new(&redis_url(&redis)).await.unwrap();

    store.set("short", b"x", Some(Duration::from_secs(1))).await.unwrap();
    assert!(store.get("short").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(store.get("short").await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn happy_prefix_isolates_keys() {
    let docker = Cli::default();
    let redis = redis_container(&docker);
    let url = redis_url(&redis);

    let plain = RedisIndexStore::new(&url).await.unwrap();
    let film = RedisIndexStore::with_prefix(&url, Some("film:")).await.unwrap();
    assert_eq!(film.prefix(), "film:");

    film.set("k", b"prefixed", None).await.unwrap();
    assert_eq!(plain.get("film:k").await.unwrap(), Some(b"prefixed".to_vec()));
    assert_eq!(plain.get("k").await.unwrap(), None);
}

// =============================================================================
// Pipeline
// =============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn happy_pipeline_against_redis() {
    let docker = Cli::default();
    let redis = redis_container(&docker);
    let store = Arc::new(RedisIndexStore::new(&redis_url(&redis)).await.unwrap());
    let pipeline = BatchPipeline::new(IndexerConfig::default(), store.clone());

    let batch = vec![
        detail(1, "USA/Canada", "2024-01-01 08:00:00"),
        detail(2, "Japan", "not-a-date"),
        detail(3, "USA", "2023-06-15 20:30:00"),
    ];
    let report = pipeline.ingest(batch.clone()).await;
    assert_eq!(report.into_result().unwrap().succeeded, 3);

    let hash = store.hgetall("Search:Keys:Pid1").await.unwrap();
    let areas: Vec<&str> = hash["Area"].split(',').collect();
    assert_eq!(areas.len(), 3);
    assert!(areas.contains(&"Canada"));
    assert!(areas.contains(&"Japan"));
    assert_eq!(hash["Year"].split(',').count(), 12);

    let by_time = pipeline.index_writer().range(1, SortOrder::Time, 0, -1).await.unwrap();
    let ids: Vec<i64> = by_time.iter().map(|r| r.movie_id).collect();
    assert_eq!(ids, vec![2, 3, 1]);

    let snapshot = pipeline.snapshots().detail(6, 1).await.unwrap();
    assert_eq!(snapshot, Some(batch[0].clone()));

    // second pass leaves the vocabulary as it was
    pipeline.ingest(batch).await.into_result().unwrap();
    assert_eq!(store.hgetall("Search:Keys:Pid1").await.unwrap(), hash);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn happy_store_from_config() {
    let docker = Cli::default();
    let redis = redis_container(&docker);
    let config = IndexerConfig {
        redis_url: Some(redis_url(&redis)),
        key_prefix: Some("film:".into()),
        ..Default::default()
    };

    let store = RedisIndexStore::from_config(&config).await.unwrap();
    assert_eq!(store.prefix(), "film:");
}

#[tokio::test]
async fn failure_missing_url_in_config() {
    let result = RedisIndexStore::from_config(&IndexerConfig::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn failure_unreachable_redis_reports_error() {
    // nothing listens on port 1; the startup retry gives up with a backend error
    let result = RedisIndexStore::new("redis://127.0.0.1:1").await;
    assert!(result.is_err());
}
