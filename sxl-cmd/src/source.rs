//! Where launch data comes from: the live API, a directory of replayed JSON
//! documents, or the synthetic generator.

use clap::Args;
use log::info;
use std::path::PathBuf;
use sxl_data::{NormalizedLaunchRecord, Normalizer};
use sxl_feed::client::{ClientConfig, LaunchApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use sxl_feed::sample::{self, DEFAULT_LAUNCHES, DEFAULT_SEED};
use sxl_feed::{fetch_or_sample, DataSource, FeedSnapshot, InMemoryFeed, SampleConfig};

#[derive(Args, Debug, Clone, PartialEq)]
pub struct FeedArgs {
    /// Base URL of the launch API
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Skip the network and use generated sample data
    #[arg(long, global = true)]
    pub offline: bool,

    /// Seed for generated sample data
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of generated sample launches
    #[arg(long, global = true, default_value_t = DEFAULT_LAUNCHES)]
    pub sample_size: usize,

    /// Directory holding launches.json and optional rockets.json,
    /// payloads.json and launchpads.json to replay instead of the API
    #[arg(long, global = true, conflicts_with = "offline")]
    pub feed_dir: Option<PathBuf>,
}

impl Default for FeedArgs {
    fn default() -> Self {
        FeedArgs {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            offline: false,
            seed: DEFAULT_SEED,
            sample_size: DEFAULT_LAUNCHES,
            feed_dir: None,
        }
    }
}

impl FeedArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn sample_config(&self) -> SampleConfig {
        SampleConfig {
            seed: self.seed,
            launches: self.sample_size,
        }
    }
}

/// Fetch every collection. An unreachable feed falls back to sample data; a
/// malformed launches document is an error.
pub async fn load_snapshot(args: &FeedArgs) -> anyhow::Result<FeedSnapshot> {
    let sample_config = args.sample_config();
    if args.offline {
        info!(
            "Offline: generating {} sample launches (seed {})",
            sample_config.launches, sample_config.seed
        );
        return Ok(sample::generate(&sample_config));
    }

    let snapshot = match &args.feed_dir {
        Some(dir) => {
            info!("Replaying feed from {}", dir.display());
            let feed = InMemoryFeed::from_dir(dir)?;
            fetch_or_sample(&feed, &sample_config).await?
        }
        None => {
            let client = LaunchApiClient::new(&args.client_config())?;
            fetch_or_sample(&client, &sample_config).await?
        }
    };
    Ok(snapshot)
}

/// Load and normalize launches in one step.
pub async fn load_records(args: &FeedArgs) -> anyhow::Result<Vec<NormalizedLaunchRecord>> {
    let snapshot = load_snapshot(args).await?;
    let records = Normalizer::from_snapshot(&snapshot).normalize(&snapshot.launches);
    let source = match snapshot.source {
        DataSource::Feed => "feed",
        DataSource::Sample => "sample data",
    };
    info!(
        "Normalized {} launches from {} ({} rockets, {} payloads, {} launchpads)",
        records.len(),
        source,
        snapshot.rockets.len(),
        snapshot.payloads.len(),
        snapshot.launchpads.len()
    );
    Ok(records)
}
