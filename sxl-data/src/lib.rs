//! Launch record normalization and the analyses built on top of it.
//!
//! Raw launch events from `sxl-feed` are joined against their reference
//! tables into [`NormalizedLaunchRecord`]s, which the [`analysis`] helpers
//! and [`summary`] reports consume.

pub mod analysis;
pub mod landing;
pub mod normalize;
pub mod record;
pub mod summary;

pub use analysis::{filter_by_date_range, filter_by_prefix, group_by, rank_by_count, Field, Group};
pub use landing::{classify_landing_outcome, LandingOutcome, LandingType};
pub use normalize::{aggregate_payload_mass, normalize, Normalizer};
pub use record::{CoreLanding, NormalizedLaunchRecord};
