use crate::error::FeedError;
use crate::fields;
use crate::reference::{FromRecord, LaunchpadInfo, PayloadInfo, RocketInfo};
use chrono::{DateTime, FixedOffset, Utc};
use log::warn;
use serde_json::Value;
use sxl_utils::dates::{parse_local, parse_utc};

/// A reference from a launch to another collection: either an opaque id
/// to be resolved through a reference table, or a fully embedded object.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRef<T> {
    Id(String),
    Embedded(T),
}

impl<T: FromRecord> EntityRef<T> {
    /// Strings become ids, objects become embedded entities, anything else
    /// (null, numbers, arrays) is treated as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(id) => Some(EntityRef::Id(id.clone())),
            Value::Object(_) => Some(EntityRef::Embedded(T::from_record(value))),
            _ => None,
        }
    }
}

/// A booster core flown on a launch, with its landing attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawCore {
    pub core: Option<String>,
    pub landing_attempt: Option<bool>,
    pub landing_success: Option<bool>,
    /// Upstream recovery method, e.g. "RTLS", "ASDS", "Ocean".
    pub landing_type: Option<String>,
    pub reused: Option<bool>,
    pub landpad: Option<String>,
}

impl RawCore {
    pub fn from_record(record: &Value) -> Self {
        RawCore {
            core: fields::text(record, "core"),
            landing_attempt: fields::flag(record, "landing_attempt"),
            landing_success: fields::flag(record, "landing_success"),
            landing_type: fields::text(record, "landing_type"),
            reused: fields::flag(record, "reused"),
            landpad: fields::text(record, "landpad"),
        }
    }
}

/// One launch as delivered by the upstream feed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawLaunchEvent {
    pub flight_number: i64,
    pub name: Option<String>,
    pub date_utc: Option<DateTime<Utc>>,
    pub date_local: Option<DateTime<FixedOffset>>,
    /// `None` means the outcome is unknown or not yet determined.
    pub success: Option<bool>,
    pub rocket: Option<EntityRef<RocketInfo>>,
    pub payloads: Vec<EntityRef<PayloadInfo>>,
    pub launchpad: Option<EntityRef<LaunchpadInfo>>,
    pub cores: Vec<RawCore>,
}

impl RawLaunchEvent {
    pub fn from_record(record: &Value) -> Self {
        let payloads: Vec<EntityRef<PayloadInfo>> = record
            .get("payloads")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(EntityRef::from_value).collect())
            .unwrap_or_default();
        let cores: Vec<RawCore> = record
            .get("cores")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|core| core.is_object())
                    .map(RawCore::from_record)
                    .collect()
            })
            .unwrap_or_default();
        RawLaunchEvent {
            flight_number: fields::integer(record, "flight_number").unwrap_or(0),
            name: fields::text(record, "name"),
            date_utc: fields::text(record, "date_utc").and_then(|s| parse_utc(&s)),
            date_local: fields::text(record, "date_local").and_then(|s| parse_local(&s)),
            success: fields::flag(record, "success"),
            rocket: record.get("rocket").and_then(EntityRef::from_value),
            payloads,
            launchpad: record.get("launchpad").and_then(EntityRef::from_value),
            cores,
        }
    }

    /// Parse a whole launches document.
    ///
    /// The document must be a JSON array; anything else is a hard failure
    /// since there is nothing to normalize. Array entries that are not
    /// objects are not launches and are skipped.
    pub fn parse_feed(document: &Value) -> Result<Vec<RawLaunchEvent>, FeedError> {
        let Some(records) = document.as_array() else {
            return Err(FeedError::malformed(
                "launches",
                "expected a JSON array of launch events",
            ));
        };
        let mut skipped = 0usize;
        let events = records
            .iter()
            .filter(|record| {
                let keep = record.is_object();
                if !keep {
                    skipped += 1;
                }
                keep
            })
            .map(RawLaunchEvent::from_record)
            .collect::<Vec<_>>();
        if skipped > 0 {
            warn!("Skipped {} launch entries that were not objects", skipped);
        }
        Ok(events)
    }
}
