//! The data-source boundary: where launches and reference collections
//! come from, and the fallback to synthetic data when the feed is down.

use crate::error::FeedError;
use crate::launch::RawLaunchEvent;
use crate::reference::{FromRecord, LaunchpadInfo, PayloadInfo, ReferenceTable, RocketInfo};
use crate::sample::{self, SampleConfig};
use log::{info, warn};
use serde_json::Value;
use std::path::Path;

pub const LAUNCHES: &str = "launches";
pub const ROCKETS: &str = "rockets";
pub const PAYLOADS: &str = "payloads";
pub const LAUNCHPADS: &str = "launchpads";

/// A source of raw, loosely-typed launch data. Each method returns the
/// whole collection document as delivered upstream.
#[allow(async_fn_in_trait)]
pub trait LaunchFeed {
    async fn launches(&self) -> Result<Value, FeedError>;
    async fn rockets(&self) -> Result<Value, FeedError>;
    async fn payloads(&self) -> Result<Value, FeedError>;
    async fn launchpads(&self) -> Result<Value, FeedError>;
}

/// Where a snapshot's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Feed,
    Sample,
}

/// Parsed launches plus the reference tables needed to resolve them.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub launches: Vec<RawLaunchEvent>,
    pub rockets: ReferenceTable<RocketInfo>,
    pub payloads: ReferenceTable<PayloadInfo>,
    pub launchpads: ReferenceTable<LaunchpadInfo>,
    pub source: DataSource,
}

/// A feed held entirely in memory.
///
/// Used as the deterministic fake in tests and to replay API dumps saved
/// to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryFeed {
    launches: Value,
    rockets: Value,
    payloads: Value,
    launchpads: Value,
}

impl InMemoryFeed {
    /// A feed with the given launches document and empty reference collections.
    pub fn new(launches: Value) -> Self {
        InMemoryFeed {
            launches,
            rockets: Value::Array(Vec::new()),
            payloads: Value::Array(Vec::new()),
            launchpads: Value::Array(Vec::new()),
        }
    }

    pub fn with_rockets(mut self, rockets: Value) -> Self {
        self.rockets = rockets;
        self
    }

    pub fn with_payloads(mut self, payloads: Value) -> Self {
        self.payloads = payloads;
        self
    }

    pub fn with_launchpads(mut self, launchpads: Value) -> Self {
        self.launchpads = launchpads;
        self
    }

    /// Load `launches.json` (required) and `rockets.json`, `payloads.json`,
    /// `launchpads.json` (optional, empty when missing) from a directory.
    pub fn from_dir(dir: &Path) -> Result<Self, FeedError> {
        let launches = read_document(dir, LAUNCHES)?.ok_or_else(|| FeedError::Io {
            path: dir.join("launches.json").display().to_string(),
            reason: "file not found".to_string(),
        })?;
        let mut feed = InMemoryFeed::new(launches);
        if let Some(rockets) = read_document(dir, ROCKETS)? {
            feed.rockets = rockets;
        }
        if let Some(payloads) = read_document(dir, PAYLOADS)? {
            feed.payloads = payloads;
        }
        if let Some(launchpads) = read_document(dir, LAUNCHPADS)? {
            feed.launchpads = launchpads;
        }
        info!("Loaded feed documents from {}", dir.display());
        Ok(feed)
    }
}

fn read_document(dir: &Path, collection: &str) -> Result<Option<Value>, FeedError> {
    let path = dir.join(format!("{}.json", collection));
    if !path.exists() {
        return Ok(None);
    }
    let body = std::fs::read_to_string(&path).map_err(|e| FeedError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let document = serde_json::from_str(&body).map_err(|e| FeedError::malformed(collection, e))?;
    Ok(Some(document))
}

impl LaunchFeed for InMemoryFeed {
    async fn launches(&self) -> Result<Value, FeedError> {
        Ok(self.launches.clone())
    }

    async fn rockets(&self) -> Result<Value, FeedError> {
        Ok(self.rockets.clone())
    }

    async fn payloads(&self) -> Result<Value, FeedError> {
        Ok(self.payloads.clone())
    }

    async fn launchpads(&self) -> Result<Value, FeedError> {
        Ok(self.launchpads.clone())
    }
}

/// A reference collection that cannot be fetched or parsed resolves to an
/// empty table; every lookup against it then falls back to defaults.
fn reference_table<T: FromRecord>(
    collection: &str,
    document: Result<Value, FeedError>,
) -> ReferenceTable<T> {
    match document.and_then(|doc| ReferenceTable::from_document(collection, &doc)) {
        Ok(table) => {
            info!("Loaded {} {} records", table.len(), collection);
            table
        }
        Err(e) => {
            warn!("{}; continuing with an empty {} table", e, collection);
            ReferenceTable::default()
        }
    }
}

/// Fetch and parse every collection of `feed`.
///
/// Fails only when the launches collection itself is unavailable or is not
/// a collection of events.
pub async fn fetch_snapshot<F: LaunchFeed>(feed: &F) -> Result<FeedSnapshot, FeedError> {
    let document = feed.launches().await?;
    let launches = RawLaunchEvent::parse_feed(&document)?;
    info!("Parsed {} launch events", launches.len());

    let rockets = reference_table(ROCKETS, feed.rockets().await);
    let payloads = reference_table(PAYLOADS, feed.payloads().await);
    let launchpads = reference_table(LAUNCHPADS, feed.launchpads().await);

    Ok(FeedSnapshot {
        launches,
        rockets,
        payloads,
        launchpads,
        source: DataSource::Feed,
    })
}

/// Fetch from `feed`, substituting the synthetic dataset when the launches
/// collection is unavailable. A malformed feed is still an error.
pub async fn fetch_or_sample<F: LaunchFeed>(
    feed: &F,
    config: &SampleConfig,
) -> Result<FeedSnapshot, FeedError> {
    match fetch_snapshot(feed).await {
        Err(e) if e.is_unavailable() => {
            info!("{}; using sample data (seed {})", e, config.seed);
            Ok(sample::generate(config))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A feed whose transport always fails.
    struct OfflineFeed;

    impl LaunchFeed for OfflineFeed {
        async fn launches(&self) -> Result<Value, FeedError> {
            Err(FeedError::unavailable(LAUNCHES, "connection refused"))
        }
        async fn rockets(&self) -> Result<Value, FeedError> {
            Err(FeedError::unavailable(ROCKETS, "connection refused"))
        }
        async fn payloads(&self) -> Result<Value, FeedError> {
            Err(FeedError::unavailable(PAYLOADS, "connection refused"))
        }
        async fn launchpads(&self) -> Result<Value, FeedError> {
            Err(FeedError::unavailable(LAUNCHPADS, "connection refused"))
        }
    }

    /// Launches are served, every reference collection is down.
    struct LaunchesOnlyFeed(Value);

    impl LaunchFeed for LaunchesOnlyFeed {
        async fn launches(&self) -> Result<Value, FeedError> {
            Ok(self.0.clone())
        }
        async fn rockets(&self) -> Result<Value, FeedError> {
            Err(FeedError::unavailable(ROCKETS, "timeout"))
        }
        async fn payloads(&self) -> Result<Value, FeedError> {
            Ok(json!({"error": "not found"}))
        }
        async fn launchpads(&self) -> Result<Value, FeedError> {
            Err(FeedError::unavailable(LAUNCHPADS, "timeout"))
        }
    }

    #[tokio::test]
    async fn test_fetch_snapshot_in_memory() {
        let feed = InMemoryFeed::new(json!([
            {"flight_number": 1, "rocket": "r1", "payloads": ["p1"]}
        ]))
        .with_rockets(json!([{"id": "r1", "name": "Falcon 9"}]))
        .with_payloads(json!([{"id": "p1", "mass_kg": 500, "orbit": "LEO"}]));

        let snapshot = fetch_snapshot(&feed).await.unwrap();
        assert_eq!(snapshot.launches.len(), 1);
        assert_eq!(snapshot.rockets.get("r1").unwrap().name, "Falcon 9");
        assert_eq!(snapshot.payloads.get("p1").unwrap().mass_kg, Some(500.0));
        assert!(snapshot.launchpads.is_empty());
        assert_eq!(snapshot.source, DataSource::Feed);
    }

    #[tokio::test]
    async fn test_malformed_launch_feed_is_fatal() {
        let feed = InMemoryFeed::new(json!({"launches": []}));
        let err = fetch_snapshot(&feed).await.unwrap_err();
        assert!(matches!(err, FeedError::Malformed { .. }));

        let err = fetch_or_sample(&feed, &SampleConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_reference_failures_degrade_to_empty_tables() {
        let feed = LaunchesOnlyFeed(json!([{"flight_number": 4, "rocket": "r1"}]));
        let snapshot = fetch_snapshot(&feed).await.unwrap();
        assert_eq!(snapshot.launches.len(), 1);
        assert!(snapshot.rockets.is_empty());
        assert!(snapshot.payloads.is_empty());
        assert!(snapshot.launchpads.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_feed_falls_back_to_sample() {
        let config = SampleConfig {
            seed: 7,
            launches: 25,
        };
        let first = fetch_or_sample(&OfflineFeed, &config).await.unwrap();
        let second = fetch_or_sample(&OfflineFeed, &config).await.unwrap();
        assert_eq!(first.source, DataSource::Sample);
        assert_eq!(first.launches.len(), 25);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_available_feed_is_not_replaced() {
        let feed = InMemoryFeed::new(json!([]));
        let snapshot = fetch_or_sample(&feed, &SampleConfig::default())
            .await
            .unwrap();
        assert_eq!(snapshot.source, DataSource::Feed);
        assert!(snapshot.launches.is_empty());
    }

    #[test]
    fn test_from_dir_reads_documents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        std::fs::write(dir.join("launches.json"), r#"[{"flight_number": 9}]"#).unwrap();
        std::fs::write(dir.join("rockets.json"), r#"[{"id": "r1", "name": "Falcon 1"}]"#).unwrap();

        let feed = InMemoryFeed::from_dir(dir).unwrap();
        assert_eq!(feed.launches, json!([{"flight_number": 9}]));
        assert_eq!(feed.rockets, json!([{"id": "r1", "name": "Falcon 1"}]));
        assert_eq!(feed.payloads, json!([]));
    }

    #[test]
    fn test_from_dir_requires_launches() {
        let tmp = tempfile::tempdir().unwrap();
        let err = InMemoryFeed::from_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, FeedError::Io { .. }));
    }
}
