//! Raw launch feed types and the boundary they are fetched through.
//!
//! Launches arrive as loosely-typed JSON with ids pointing into separate
//! rockets, payloads and launchpads collections. This crate parses them
//! leniently into [`RawLaunchEvent`]s and [`ReferenceTable`]s; resolving the
//! ids is the normalizer's job (`sxl-data`).

#[cfg(feature = "api")]
pub mod client;
pub mod error;
pub mod feed;
pub mod fields;
pub mod launch;
pub mod reference;
pub mod sample;

pub use error::FeedError;
pub use feed::{fetch_or_sample, fetch_snapshot, DataSource, FeedSnapshot, InMemoryFeed, LaunchFeed};
pub use launch::{EntityRef, RawCore, RawLaunchEvent};
pub use reference::{FromRecord, LaunchpadInfo, PayloadInfo, ReferenceTable, RocketInfo};
pub use sample::SampleConfig;
