//! The analysis-ready projection of a launch.

use crate::landing::{LandingOutcome, LandingType};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use sxl_feed::{LaunchpadInfo, PayloadInfo, RocketInfo};

/// Landing result of one booster core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreLanding {
    pub core_id: String,
    pub landing_attempt: bool,
    pub landing_success: bool,
    pub landing_type: LandingType,
    pub reused: bool,
    pub landpad: String,
    pub outcome: LandingOutcome,
}

/// One launch with every reference resolved. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedLaunchRecord {
    pub flight_number: i64,
    pub mission_name: String,
    pub date_utc: Option<DateTime<Utc>>,
    pub date_local: Option<DateTime<FixedOffset>>,
    /// Absent upstream outcomes are counted as failures.
    pub success: bool,
    /// False when the upstream success flag was null.
    pub outcome_determined: bool,
    pub rocket: RocketInfo,
    pub launch_site: LaunchpadInfo,
    /// Resolved payloads in reference order; unresolved ids are dropped.
    pub payloads: Vec<PayloadInfo>,
    /// Sum of known positive payload masses. A total of 0 means either
    /// "no usable mass data" or a genuinely massless payload; analyses that
    /// need mass filter zero totals out.
    pub payload_mass_kg: f64,
    /// Orbit of the first payload reference only, while the mass above sums
    /// every payload.
    pub orbit: String,
    pub cores: Vec<CoreLanding>,
}

impl NormalizedLaunchRecord {
    /// UTC calendar date of the launch.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date_utc.map(|dt| dt.date_naive())
    }

    /// UTC calendar year of the launch.
    pub fn year(&self) -> Option<i32> {
        self.date_utc.map(|dt| dt.year())
    }

    pub fn has_payload_mass(&self) -> bool {
        self.payload_mass_kg > 0.0
    }
}
