//! Report computations over the normalized launch table.
//!
//! Each summary is a pure function of the records it is given and accepts an
//! empty slice, returning zero counts or an empty list.

use crate::analysis::{filter_by_date_range, group_by, rank_by_count};
use crate::landing::{LandingOutcome, LandingType};
use crate::normalize::aggregate_payload_mass;
use crate::record::NormalizedLaunchRecord;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use sxl_feed::fields::UNKNOWN;
use sxl_utils::geo::haversine_km;

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearOutcome {
    pub year: i32,
    pub successes: usize,
    pub failures: usize,
}

/// Mission outcome totals. Rates are percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionOutcomes {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub by_year: Vec<YearOutcome>,
}

/// Count successes and failures over launches whose outcome was reported.
/// Launches with a null upstream outcome are left out entirely.
pub fn mission_outcomes(records: &[NormalizedLaunchRecord]) -> MissionOutcomes {
    let determined: Vec<&NormalizedLaunchRecord> =
        records.iter().filter(|r| r.outcome_determined).collect();
    let successful = determined.iter().filter(|r| r.success).count();
    let total = determined.len();
    let failed = total - successful;

    let mut years: BTreeMap<i32, YearOutcome> = BTreeMap::new();
    for record in &determined {
        if let Some(year) = record.year() {
            let entry = years.entry(year).or_insert(YearOutcome {
                year,
                successes: 0,
                failures: 0,
            });
            if record.success {
                entry.successes += 1;
            } else {
                entry.failures += 1;
            }
        }
    }

    MissionOutcomes {
        total,
        successful,
        failed,
        success_rate: percent(successful, total),
        failure_rate: percent(failed, total),
        by_year: years.into_values().collect(),
    }
}

/// Rank per-core landing outcomes for launches dated within `[start, end]`.
pub fn landing_outcome_ranking(
    records: &[NormalizedLaunchRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(LandingOutcome, usize)> {
    let in_range = filter_by_date_range(records, start, end);
    rank_by_count(
        in_range
            .iter()
            .flat_map(|r| r.cores.iter().map(|c| c.outcome)),
    )
}

/// Success count and percentage for one group label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessRate {
    pub label: String,
    pub successes: usize,
    pub total: usize,
    pub rate: f64,
}

fn success_rates<'a, I, F>(records: I, key_fn: F) -> Vec<SuccessRate>
where
    I: IntoIterator<Item = &'a NormalizedLaunchRecord>,
    F: Fn(&NormalizedLaunchRecord) -> String,
{
    let known = records.into_iter().filter(|r| key_fn(r) != UNKNOWN);
    let mut rates: Vec<SuccessRate> = group_by(known, &key_fn)
        .into_iter()
        .map(|group| {
            let successes = group.records.iter().filter(|r| r.success).count();
            SuccessRate {
                successes,
                total: group.count(),
                rate: percent(successes, group.count()),
                label: group.key,
            }
        })
        .collect();
    rates.sort_by(|a, b| b.rate.total_cmp(&a.rate));
    rates
}

/// Success rate per launch site name, best first.
pub fn site_success_rates(records: &[NormalizedLaunchRecord]) -> Vec<SuccessRate> {
    success_rates(records, |r| r.launch_site.name.clone())
}

/// Success rate per orbit, best first. Orbits flown fewer than
/// `min_launches` times are dropped.
pub fn orbit_success_rates(records: &[NormalizedLaunchRecord], min_launches: usize) -> Vec<SuccessRate> {
    let mut rates = success_rates(records, |r| r.orbit.clone());
    rates.retain(|rate| rate.total >= min_launches);
    rates
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTrend {
    pub year: i32,
    pub launches: usize,
    /// Mean success over the year, as a percentage.
    pub success_rate: f64,
}

/// Yearly success trend, ascending by year. Undated launches are skipped.
pub fn yearly_success_trend(records: &[NormalizedLaunchRecord]) -> Vec<YearTrend> {
    let mut years: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
    for record in records {
        if let Some(year) = record.year() {
            let (launches, successes) = years.entry(year).or_insert((0, 0));
            *launches += 1;
            if record.success {
                *successes += 1;
            }
        }
    }
    years
        .into_iter()
        .map(|(year, (launches, successes))| YearTrend {
            year,
            launches,
            success_rate: percent(successes, launches),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerLaunch {
    pub flight_number: i64,
    pub mission_name: String,
    pub date: Option<NaiveDate>,
    pub rocket_name: String,
    pub mass_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerMass {
    pub customer: String,
    pub total_mass_kg: f64,
    pub launches: Vec<CustomerLaunch>,
}

/// Payload mass carried for `customer` on successful launches.
///
/// A payload counts when any of its customers contains `customer`, ignoring
/// case. Launches that contributed no positive mass are not listed.
pub fn customer_payload_mass(records: &[NormalizedLaunchRecord], customer: &str) -> CustomerMass {
    let needle = customer.to_uppercase();
    let mut launches = Vec::new();
    for record in records.iter().filter(|r| r.success) {
        let matching: Vec<_> = record
            .payloads
            .iter()
            .filter(|p| p.customers.iter().any(|c| c.to_uppercase().contains(&needle)))
            .cloned()
            .collect();
        let mass_kg = aggregate_payload_mass(&matching);
        if mass_kg > 0.0 {
            launches.push(CustomerLaunch {
                flight_number: record.flight_number,
                mission_name: record.mission_name.clone(),
                date: record.date(),
                rocket_name: record.rocket.name.clone(),
                mass_kg,
            });
        }
    }
    CustomerMass {
        customer: customer.to_string(),
        total_mass_kg: launches.iter().map(|l| l.mass_kg).sum(),
        launches,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragePayload {
    pub rocket_pattern: String,
    pub launches: usize,
    /// `None` when no launch matched.
    pub average_mass_kg: Option<f64>,
    pub min_mass_kg: Option<f64>,
    pub max_mass_kg: Option<f64>,
}

/// Average total payload mass for launches whose rocket name contains
/// `rocket_pattern`. Launches with a zero total are ignored.
pub fn average_payload_mass(records: &[NormalizedLaunchRecord], rocket_pattern: &str) -> AveragePayload {
    let masses: Vec<f64> = records
        .iter()
        .filter(|r| r.rocket.name.contains(rocket_pattern) && r.has_payload_mass())
        .map(|r| r.payload_mass_kg)
        .collect();
    let average_mass_kg = if masses.is_empty() {
        None
    } else {
        Some(masses.iter().sum::<f64>() / masses.len() as f64)
    };
    AveragePayload {
        rocket_pattern: rocket_pattern.to_string(),
        launches: masses.len(),
        average_mass_kg,
        min_mass_kg: masses.iter().copied().reduce(f64::min),
        max_mass_kg: masses.iter().copied().reduce(f64::max),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadLaunch {
    pub flight_number: i64,
    pub mission_name: String,
    pub date: Option<NaiveDate>,
    pub rocket_name: String,
    pub payload_mass_kg: f64,
    pub success: bool,
    pub core_ids: Vec<String>,
}

impl PayloadLaunch {
    fn from_record(record: &NormalizedLaunchRecord) -> Self {
        PayloadLaunch {
            flight_number: record.flight_number,
            mission_name: record.mission_name.clone(),
            date: record.date(),
            rocket_name: record.rocket.name.clone(),
            payload_mass_kg: record.payload_mass_kg,
            success: record.success,
            core_ids: record.cores.iter().map(|c| c.core_id.clone()).collect(),
        }
    }
}

/// Every launch tied at the largest positive total payload mass.
pub fn max_payload_launches(records: &[NormalizedLaunchRecord]) -> Vec<PayloadLaunch> {
    let max = records
        .iter()
        .filter(|r| r.has_payload_mass())
        .map(|r| r.payload_mass_kg)
        .reduce(f64::max);
    match max {
        Some(max) => records
            .iter()
            .filter(|r| r.payload_mass_kg == max)
            .map(PayloadLaunch::from_record)
            .collect(),
        None => Vec::new(),
    }
}

/// One core landing together with the launch it flew on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingEvent {
    pub flight_number: i64,
    pub mission_name: String,
    pub date: Option<NaiveDate>,
    pub date_utc: Option<DateTime<Utc>>,
    pub launch_site: String,
    pub core_id: String,
    pub landpad: String,
    pub outcome: LandingOutcome,
}

/// Core landings accepted by `predicate`, in record order.
pub fn landings_matching<P>(records: &[NormalizedLaunchRecord], predicate: P) -> Vec<LandingEvent>
where
    P: Fn(&NormalizedLaunchRecord, &crate::record::CoreLanding) -> bool,
{
    let mut events = Vec::new();
    for record in records {
        for core in record.cores.iter().filter(|c| predicate(record, c)) {
            events.push(LandingEvent {
                flight_number: record.flight_number,
                mission_name: record.mission_name.clone(),
                date: record.date(),
                date_utc: record.date_utc,
                launch_site: record.launch_site.name.clone(),
                core_id: core.core_id.clone(),
                landpad: core.landpad.clone(),
                outcome: core.outcome,
            });
        }
    }
    events
}

/// Earliest successful landing of `landing_type` by launch time. Ties keep
/// record order; undated launches are not considered.
pub fn first_successful_landing(
    records: &[NormalizedLaunchRecord],
    landing_type: &LandingType,
) -> Option<LandingEvent> {
    let mut landings = landings_matching(records, |r, core| {
        r.date_utc.is_some() && core.landing_success && &core.landing_type == landing_type
    });
    landings.sort_by_key(|l| l.date_utc);
    landings.into_iter().next()
}

/// Failed landings of `landing_type` on launches dated in `year`.
pub fn failed_landings_in_year(
    records: &[NormalizedLaunchRecord],
    year: i32,
    landing_type: &LandingType,
) -> Vec<LandingEvent> {
    landings_matching(records, |r, core| {
        r.year() == Some(year) && !core.landing_success && &core.landing_type == landing_type
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitFlightStats {
    pub orbit: String,
    pub launches: usize,
    pub min_flight: i64,
    pub max_flight: i64,
    pub mean_flight: f64,
}

/// Flight number spread per known orbit, in order of first appearance.
pub fn orbit_flight_stats(records: &[NormalizedLaunchRecord]) -> Vec<OrbitFlightStats> {
    let known = records.iter().filter(|r| r.orbit != UNKNOWN);
    group_by(known, |r| r.orbit.clone())
        .into_iter()
        .map(|group| {
            let flights = group.records.iter().map(|r| r.flight_number);
            OrbitFlightStats {
                launches: group.count(),
                min_flight: flights.clone().min().unwrap_or_default(),
                max_flight: flights.max().unwrap_or_default(),
                mean_flight: group.mean(|r| r.flight_number as f64).unwrap_or_default(),
                orbit: group.key,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchSiteUsage {
    pub name: String,
    pub full_name: String,
    pub locality: String,
    pub region: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub launches: usize,
}

impl LaunchSiteUsage {
    /// Great-circle distance in kilometres to a point, when the site has
    /// coordinates.
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> Option<f64> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(haversine_km(lat, lon, latitude, longitude)),
            _ => None,
        }
    }
}

/// Distinct named launch sites with how often each was used. Coordinates
/// come from the first launch seen at the site.
pub fn unique_launch_sites<'a, I>(records: I) -> Vec<LaunchSiteUsage>
where
    I: IntoIterator<Item = &'a NormalizedLaunchRecord>,
{
    let known = records
        .into_iter()
        .filter(|r| r.launch_site.name != UNKNOWN);
    group_by(known, |r| {
        let site = &r.launch_site;
        (
            site.name.clone(),
            site.full_name.clone(),
            site.locality.clone(),
            site.region.clone(),
        )
    })
    .into_iter()
    .map(|group| {
        let launches = group.count();
        let first = &group.records[0].launch_site;
        let (latitude, longitude) = (first.latitude, first.longitude);
        let (name, full_name, locality, region) = group.key;
        LaunchSiteUsage {
            name,
            full_name,
            locality,
            region,
            latitude,
            longitude,
            launches,
        }
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitPayloadStats {
    pub orbit: String,
    pub launches: usize,
    pub min_mass_kg: f64,
    pub max_mass_kg: f64,
    pub mean_mass_kg: f64,
}

/// Total payload mass spread per known orbit, in order of first appearance.
/// Launches without a positive mass are skipped.
pub fn orbit_payload_stats(records: &[NormalizedLaunchRecord]) -> Vec<OrbitPayloadStats> {
    let weighed = records
        .iter()
        .filter(|r| r.orbit != UNKNOWN && r.has_payload_mass());
    group_by(weighed, |r| r.orbit.clone())
        .into_iter()
        .map(|group| {
            let masses = group.records.iter().map(|r| r.payload_mass_kg);
            OrbitPayloadStats {
                launches: group.count(),
                min_mass_kg: masses.clone().reduce(f64::min).unwrap_or_default(),
                max_mass_kg: masses.reduce(f64::max).unwrap_or_default(),
                mean_mass_kg: group.mean(|r| r.payload_mass_kg).unwrap_or_default(),
                orbit: group.key,
            }
        })
        .collect()
}

/// Payload mass bins as `(label, lower bound, exclusive upper bound)`.
pub const PAYLOAD_RANGES: [(&str, f64, Option<f64>); 5] = [
    ("0-1000 kg", 0.0, Some(1000.0)),
    ("1000-3000 kg", 1000.0, Some(3000.0)),
    ("3000-6000 kg", 3000.0, Some(6000.0)),
    ("6000-10000 kg", 6000.0, Some(10000.0)),
    ("10000+ kg", 10000.0, None),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadRangeOutcome {
    pub range: String,
    pub min_mass_kg: f64,
    pub max_mass_kg: Option<f64>,
    pub launches: usize,
    pub successes: usize,
    pub failures: usize,
    pub success_rate: f64,
    /// Per-site breakdown, best first.
    pub by_site: Vec<SuccessRate>,
}

/// Launch outcomes bucketed by total payload mass. Launches without a
/// positive mass are skipped and empty bins are not listed.
pub fn payload_range_outcomes(records: &[NormalizedLaunchRecord]) -> Vec<PayloadRangeOutcome> {
    PAYLOAD_RANGES
        .iter()
        .filter_map(|&(label, min, max)| {
            let in_range: Vec<&NormalizedLaunchRecord> = records
                .iter()
                .filter(|r| r.has_payload_mass() && r.payload_mass_kg >= min)
                .filter(|r| max.map_or(true, |max| r.payload_mass_kg < max))
                .collect();
            if in_range.is_empty() {
                return None;
            }
            let successes = in_range.iter().filter(|r| r.success).count();
            Some(PayloadRangeOutcome {
                range: label.to_string(),
                min_mass_kg: min,
                max_mass_kg: max,
                launches: in_range.len(),
                successes,
                failures: in_range.len() - successes,
                success_rate: percent(successes, in_range.len()),
                by_site: success_rates(in_range.iter().copied(), |r| r.launch_site.name.clone()),
            })
        })
        .collect()
}
