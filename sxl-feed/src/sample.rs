//! Deterministic synthetic launch data, used when the live feed is
//! unavailable. The same seed always produces the same snapshot.
//!
//! The generated data goes through the same reference-table path as feed
//! data: launches only carry ids, and the rockets/payloads/launchpads
//! tables resolve them.

use crate::feed::{DataSource, FeedSnapshot};
use crate::launch::{EntityRef, RawCore, RawLaunchEvent};
use crate::reference::{LaunchpadInfo, PayloadInfo, ReferenceTable, RocketInfo};
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Number of launches generated when none is given.
pub const DEFAULT_LAUNCHES: usize = 120;

const FALCON_9_ID: &str = "sample-falcon-9";
const FALCON_HEAVY_ID: &str = "sample-falcon-heavy";

const ORBITS: [&str; 8] = ["LEO", "GTO", "SSO", "ISS", "PO", "ES-L1", "HEO", "MEO"];
const POLAR_ORBITS: [&str; 3] = ["SSO", "PO", "LEO"];
const CUSTOMERS: [&str; 6] = ["NASA", "SpaceX", "SES", "Iridium Communications", "NASA (CRS)", "USAF"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleConfig {
    pub seed: u64,
    pub launches: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        SampleConfig {
            seed: DEFAULT_SEED,
            launches: DEFAULT_LAUNCHES,
        }
    }
}

/// Mean and spread of payload mass (kg) by launch site family.
fn mass_profile(site_name: &str) -> (f64, f64) {
    if site_name.starts_with("CCAFS") {
        (5000.0, 1500.0)
    } else if site_name.starts_with("KSC") {
        (6000.0, 2000.0)
    } else if site_name.starts_with("VAFB") {
        (4000.0, 1000.0)
    } else {
        (5000.0, 1500.0)
    }
}

/// Offset of the site's local time from UTC, in hours.
fn utc_offset_hours(region: &str) -> i32 {
    match region {
        "Florida" => -5,
        "California" => -8,
        _ => 0,
    }
}

/// Normally distributed payload mass for a site, never below 1000 kg.
fn sample_mass(rng: &mut StdRng, site_name: &str) -> f64 {
    let (mean, spread) = mass_profile(site_name);
    let mass = Normal::new(mean, spread)
        .map(|normal| normal.sample(rng))
        .unwrap_or(mean);
    mass.max(1000.0).round()
}

/// Heavier payloads are harder: success probability falls with mass,
/// clamped to 60%..95%.
pub fn success_probability(mass_kg: f64) -> f64 {
    (0.9 - (mass_kg - 3000.0) / 10000.0).clamp(0.6, 0.95)
}

fn sample_core(rng: &mut StdRng, index: usize, year: i32) -> RawCore {
    let attempted = year >= 2013 && rng.gen::<f64>() < 0.85;
    let reused = Some(year >= 2017 && rng.gen::<f64>() < 0.5);
    let core = Some(format!("sample-core-{:04}", index + 1));
    if !attempted {
        return RawCore {
            core,
            landing_attempt: Some(false),
            landing_success: None,
            landing_type: None,
            reused,
            landpad: None,
        };
    }
    let (landing_type, landpad) = if year < 2015 {
        ("Ocean", None)
    } else if rng.gen::<f64>() < 0.3 {
        ("RTLS", Some("LZ-1".to_string()))
    } else {
        ("ASDS", Some("OCISLY".to_string()))
    };
    let landing_rate = if year < 2016 { 0.4 } else { 0.9 };
    RawCore {
        core,
        landing_attempt: Some(true),
        landing_success: Some(rng.gen::<f64>() < landing_rate),
        landing_type: Some(landing_type.to_string()),
        reused,
        landpad,
    }
}

/// Generate a synthetic snapshot.
///
/// Flight numbers run from 1 and launch dates never decrease with flight
/// number. Every launch falls between 2010-06-04 and the end of 2022; large
/// counts share days and are spaced down to the minute.
pub fn generate(config: &SampleConfig) -> FeedSnapshot {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let sites = LaunchpadInfo::get_launch_site_vector();

    let rockets: ReferenceTable<RocketInfo> = [
        (
            FALCON_9_ID.to_string(),
            RocketInfo {
                name: "Falcon 9".to_string(),
                kind: "rocket".to_string(),
            },
        ),
        (
            FALCON_HEAVY_ID.to_string(),
            RocketInfo {
                name: "Falcon Heavy".to_string(),
                kind: "rocket".to_string(),
            },
        ),
    ]
    .into_iter()
    .collect();

    let first_day = NaiveDate::from_ymd_opt(2010, 6, 4).unwrap_or_default();
    let end_day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
    let start = Utc.from_utc_datetime(&first_day.and_time(NaiveTime::MIN));
    let span_minutes = (end_day - first_day).num_minutes().max(1);
    let count = config.launches.max(1) as i64;
    let step_minutes = (span_minutes / count).max(1);

    let mut payloads = Vec::with_capacity(config.launches);
    let mut launches = Vec::with_capacity(config.launches);

    for i in 0..config.launches {
        let (site_id, site) = &sites[rng.gen_range(0..sites.len())];

        let mass_kg = sample_mass(&mut rng, &site.name);
        let success = rng.gen::<f64>() < success_probability(mass_kg);

        let offset = i as i64 * span_minutes / count + rng.gen_range(0..step_minutes);
        let launched = start + Duration::minutes(offset);
        let date_utc = Some(launched);
        let date_local = FixedOffset::east_opt(utc_offset_hours(&site.region) * 3600)
            .map(|offset| launched.with_timezone(&offset));
        let year = launched.year();

        let orbit = if site.region == "California" {
            POLAR_ORBITS[rng.gen_range(0..POLAR_ORBITS.len())]
        } else {
            ORBITS[rng.gen_range(0..ORBITS.len())]
        };
        let customer = CUSTOMERS[rng.gen_range(0..CUSTOMERS.len())];

        let payload_id = format!("sample-payload-{:04}", i + 1);
        payloads.push((
            payload_id.clone(),
            PayloadInfo {
                name: format!("Sample Payload {}", i + 1),
                mass_kg: Some(mass_kg),
                orbit: orbit.to_string(),
                customers: vec![customer.to_string()],
            },
        ));
        let mut payload_refs = vec![EntityRef::Id(payload_id)];

        // Occasional rideshare payload; its mass is summed but its orbit
        // never becomes the launch orbit.
        if rng.gen::<f64>() < 0.1 {
            let rideshare_id = format!("sample-payload-{:04}-b", i + 1);
            payloads.push((
                rideshare_id.clone(),
                PayloadInfo {
                    name: format!("Sample Rideshare {}", i + 1),
                    mass_kg: Some(rng.gen_range(200.0..1500.0_f64).round()),
                    orbit: "LEO".to_string(),
                    customers: vec!["SpaceX".to_string()],
                },
            ));
            payload_refs.push(EntityRef::Id(rideshare_id));
        }

        let rocket_id = if mass_kg > 8000.0 && site.name.starts_with("KSC") {
            FALCON_HEAVY_ID
        } else {
            FALCON_9_ID
        };

        launches.push(RawLaunchEvent {
            flight_number: i as i64 + 1,
            name: Some(format!("Sample Mission {}", i + 1)),
            date_utc,
            date_local,
            success: Some(success),
            rocket: Some(EntityRef::Id(rocket_id.to_string())),
            payloads: payload_refs,
            launchpad: Some(EntityRef::Id(site_id.clone())),
            cores: vec![sample_core(&mut rng, i, year)],
        });
    }

    info!(
        "Generated {} sample launches across {} sites (seed {})",
        launches.len(),
        sites.len(),
        config.seed
    );

    FeedSnapshot {
        launches,
        rockets,
        payloads: payloads.into_iter().collect(),
        launchpads: sites.into_iter().collect(),
        source: DataSource::Sample,
    }
}
