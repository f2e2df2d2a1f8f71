//! Launch record normalization: joins raw launch events against the
//! rockets, payloads and launchpads reference tables.
//!
//! Normalization never fails. Every unresolved reference degrades to the
//! entity's default ("Unknown" names, no mass) and every input event yields
//! exactly one output record, in input order.

use crate::landing::{LandingOutcome, LandingType};
use crate::record::{CoreLanding, NormalizedLaunchRecord};
use log::debug;
use sxl_feed::fields::UNKNOWN;
use sxl_feed::{
    EntityRef, FeedSnapshot, LaunchpadInfo, PayloadInfo, RawCore, RawLaunchEvent, ReferenceTable,
    RocketInfo,
};

/// Resolve a reference through `table`, passing embedded objects through.
fn resolve<'a, T>(
    kind: &str,
    reference: &'a EntityRef<T>,
    table: &'a ReferenceTable<T>,
) -> Option<&'a T> {
    match reference {
        EntityRef::Embedded(entity) => Some(entity),
        EntityRef::Id(id) => {
            let found = table.get(id);
            if found.is_none() {
                debug!("{} id {} not found in reference table", kind, id);
            }
            found
        }
    }
}

/// Sum payload masses in kilograms.
///
/// Missing, non-positive and non-finite masses contribute 0. This is lossy:
/// a total of 0 cannot distinguish "no mass data" from "massless payload".
pub fn aggregate_payload_mass(payloads: &[PayloadInfo]) -> f64 {
    payloads
        .iter()
        .filter_map(|p| p.mass_kg)
        .filter(|mass| mass.is_finite() && *mass > 0.0)
        .sum()
}

fn normalize_core(core: &RawCore) -> CoreLanding {
    let landing_success = core.landing_success.unwrap_or(false);
    let landing_type = LandingType::from_option(core.landing_type.as_deref());
    let outcome = LandingOutcome::classify(landing_success, &landing_type);
    CoreLanding {
        core_id: core.core.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        landing_attempt: core.landing_attempt.unwrap_or(false),
        landing_success,
        landing_type,
        reused: core.reused.unwrap_or(false),
        landpad: core.landpad.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        outcome,
    }
}

/// Borrows the three reference tables for the duration of a pass.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    rockets: &'a ReferenceTable<RocketInfo>,
    payloads: &'a ReferenceTable<PayloadInfo>,
    launchpads: &'a ReferenceTable<LaunchpadInfo>,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        rockets: &'a ReferenceTable<RocketInfo>,
        payloads: &'a ReferenceTable<PayloadInfo>,
        launchpads: &'a ReferenceTable<LaunchpadInfo>,
    ) -> Self {
        Normalizer {
            rockets,
            payloads,
            launchpads,
        }
    }

    pub fn from_snapshot(snapshot: &'a FeedSnapshot) -> Self {
        Normalizer::new(&snapshot.rockets, &snapshot.payloads, &snapshot.launchpads)
    }

    pub fn resolve_rocket(&self, reference: Option<&EntityRef<RocketInfo>>) -> RocketInfo {
        reference
            .and_then(|r| resolve("rocket", r, self.rockets))
            .cloned()
            .unwrap_or_default()
    }

    pub fn resolve_launchpad(&self, reference: Option<&EntityRef<LaunchpadInfo>>) -> LaunchpadInfo {
        reference
            .and_then(|r| resolve("launchpad", r, self.launchpads))
            .cloned()
            .unwrap_or_default()
    }

    /// Resolve every payload reference, skipping misses, keeping order.
    pub fn resolve_payloads(&self, references: &[EntityRef<PayloadInfo>]) -> Vec<PayloadInfo> {
        references
            .iter()
            .filter_map(|r| resolve("payload", r, self.payloads))
            .cloned()
            .collect()
    }

    /// Orbit of the first payload reference. A miss on the first reference
    /// is "Unknown" even if a later payload resolves.
    fn first_payload_orbit(&self, references: &[EntityRef<PayloadInfo>]) -> String {
        references
            .first()
            .and_then(|r| resolve("payload", r, self.payloads))
            .map(|p| p.orbit.clone())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn normalize_event(&self, event: &RawLaunchEvent) -> NormalizedLaunchRecord {
        let payloads = self.resolve_payloads(&event.payloads);
        let payload_mass_kg = aggregate_payload_mass(&payloads);
        NormalizedLaunchRecord {
            flight_number: event.flight_number,
            mission_name: event.name.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            date_utc: event.date_utc,
            date_local: event.date_local,
            success: event.success.unwrap_or(false),
            outcome_determined: event.success.is_some(),
            rocket: self.resolve_rocket(event.rocket.as_ref()),
            launch_site: self.resolve_launchpad(event.launchpad.as_ref()),
            orbit: self.first_payload_orbit(&event.payloads),
            payloads,
            payload_mass_kg,
            cores: event.cores.iter().map(normalize_core).collect(),
        }
    }

    /// One record per event, in input order.
    pub fn normalize(&self, events: &[RawLaunchEvent]) -> Vec<NormalizedLaunchRecord> {
        events.iter().map(|e| self.normalize_event(e)).collect()
    }
}

/// Normalize `events` against the given reference tables.
pub fn normalize(
    events: &[RawLaunchEvent],
    rockets: &ReferenceTable<RocketInfo>,
    payloads: &ReferenceTable<PayloadInfo>,
    launchpads: &ReferenceTable<LaunchpadInfo>,
) -> Vec<NormalizedLaunchRecord> {
    Normalizer::new(rockets, payloads, launchpads).normalize(events)
}
