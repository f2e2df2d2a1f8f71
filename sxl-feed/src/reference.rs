use crate::error::FeedError;
use crate::fields::{self, UNKNOWN};
use csv::ReaderBuilder;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Embedded CSV data for the launch sites used by the synthetic sample feed.
pub static LAUNCH_SITES_CSV: &str = include_str!("../../fixtures/launch_sites.csv");

/// Builds an entity from a loosely-typed feed record, defaulting every
/// absent or wrongly-typed field.
pub trait FromRecord: Sized {
    fn from_record(record: &Value) -> Self;
}

/// A launch vehicle from the rockets collection.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RocketInfo {
    pub name: String,
    /// The upstream `type` field (e.g. "rocket").
    pub kind: String,
}

impl Default for RocketInfo {
    fn default() -> Self {
        RocketInfo {
            name: UNKNOWN.to_string(),
            kind: UNKNOWN.to_string(),
        }
    }
}

impl FromRecord for RocketInfo {
    fn from_record(record: &Value) -> Self {
        RocketInfo {
            name: fields::text_or_unknown(record, "name"),
            kind: fields::text_or_unknown(record, "type"),
        }
    }
}

/// A payload from the payloads collection.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PayloadInfo {
    pub name: String,
    /// Mass in kilograms; `None` when the feed does not report it.
    pub mass_kg: Option<f64>,
    /// Orbit classification such as "LEO" or "GTO".
    pub orbit: String,
    pub customers: Vec<String>,
}

impl Default for PayloadInfo {
    fn default() -> Self {
        PayloadInfo {
            name: UNKNOWN.to_string(),
            mass_kg: None,
            orbit: UNKNOWN.to_string(),
            customers: Vec::new(),
        }
    }
}

impl FromRecord for PayloadInfo {
    fn from_record(record: &Value) -> Self {
        PayloadInfo {
            name: fields::text_or_unknown(record, "name"),
            mass_kg: fields::number(record, "mass_kg"),
            orbit: fields::text_or_unknown(record, "orbit"),
            customers: fields::text_list(record, "customers"),
        }
    }
}

/// A launch site from the launchpads collection.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LaunchpadInfo {
    /// Short name, e.g. "CCAFS SLC 40"
    pub name: String,
    pub full_name: String,
    pub locality: String,
    pub region: String,
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
}

impl Default for LaunchpadInfo {
    fn default() -> Self {
        LaunchpadInfo {
            name: UNKNOWN.to_string(),
            full_name: UNKNOWN.to_string(),
            locality: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            latitude: None,
            longitude: None,
        }
    }
}

impl FromRecord for LaunchpadInfo {
    fn from_record(record: &Value) -> Self {
        LaunchpadInfo {
            name: fields::text_or_unknown(record, "name"),
            full_name: fields::text_or_unknown(record, "full_name"),
            locality: fields::text_or_unknown(record, "locality"),
            region: fields::text_or_unknown(record, "region"),
            latitude: fields::number(record, "latitude"),
            longitude: fields::number(record, "longitude"),
        }
    }
}

fn parse_coordinate(ess: Option<&str>) -> Option<f64> {
    ess.and_then(|s| s.trim().parse::<f64>().ok())
}

impl LaunchpadInfo {
    /// Parse a CSV string of launch sites into `(id, LaunchpadInfo)` pairs.
    ///
    /// Expected CSV columns: ID, NAME, FULL_NAME, LOCALITY, REGION, LATITUDE, LONGITUDE
    pub fn parse_launch_site_csv(csv_object: &str) -> Result<Vec<(String, LaunchpadInfo)>, csv::Error> {
        let mut site_list = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let column = |idx: usize| match record.get(idx).map(str::trim) {
                Some(s) if !s.is_empty() => s.to_string(),
                _ => UNKNOWN.to_string(),
            };
            let site = LaunchpadInfo {
                name: column(1),
                full_name: column(2),
                locality: column(3),
                region: column(4),
                latitude: parse_coordinate(record.get(5)),
                longitude: parse_coordinate(record.get(6)),
            };
            site_list.push((column(0), site));
        }
        Ok(site_list)
    }

    /// Launch sites from the embedded fixture.
    pub fn get_launch_site_vector() -> Vec<(String, LaunchpadInfo)> {
        if let Ok(sites) = LaunchpadInfo::parse_launch_site_csv(LAUNCH_SITES_CSV) {
            sites
        } else {
            panic!("failed to parse launch site fixture")
        }
    }
}

/// An id-keyed lookup of full entity records.
///
/// Built once per run and read-only afterwards: there is no mutating API.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for ReferenceTable<T> {
    fn default() -> Self {
        ReferenceTable {
            entries: HashMap::new(),
        }
    }
}

impl<T> FromIterator<(String, T)> for ReferenceTable<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        ReferenceTable {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T> ReferenceTable<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: FromRecord> ReferenceTable<T> {
    /// Build a table from raw records keyed by their `id` field.
    ///
    /// Records without a string id are skipped. A repeated id keeps the
    /// later record.
    pub fn from_records(records: &[Value]) -> Self {
        let mut entries = HashMap::with_capacity(records.len());
        for record in records {
            let Some(id) = fields::text(record, "id") else {
                debug!("skipping reference record without an id");
                continue;
            };
            if entries.insert(id.clone(), T::from_record(record)).is_some() {
                debug!("duplicate reference id {}, keeping the later record", id);
            }
        }
        ReferenceTable { entries }
    }

    /// Build a table from a whole feed document, which must be a JSON array.
    pub fn from_document(collection: &str, document: &Value) -> Result<Self, FeedError> {
        match document.as_array() {
            Some(records) => Ok(ReferenceTable::from_records(records)),
            None => Err(FeedError::malformed(
                collection,
                "expected a JSON array of records",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_launch_site_vector() {
        let sites = LaunchpadInfo::get_launch_site_vector();
        assert_eq!(sites.len(), 3);
        assert_eq!(sites[0].0, "ccafs_slc_40");
        assert_eq!(sites[0].1.name, "CCAFS SLC 40");
        assert_eq!(sites[2].1.region, "California");
        assert!((sites[1].1.latitude.unwrap() - 28.573255).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_launch_site_csv_defaults() {
        let csv_data = "\
ID,NAME,FULL_NAME,LOCALITY,REGION,LATITUDE,LONGITUDE
kwaj,Kwajalein Atoll,,Omelek Island,Marshall Islands,n/a,167.74
";
        let sites = LaunchpadInfo::parse_launch_site_csv(csv_data).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].1.full_name, UNKNOWN);
        assert_eq!(sites[0].1.latitude, None);
        assert_eq!(sites[0].1.longitude, Some(167.74));
    }

    #[test]
    fn test_entity_defaults() {
        let rocket = RocketInfo::from_record(&json!({"id": "r1"}));
        assert_eq!(rocket, RocketInfo::default());

        let payload = PayloadInfo::from_record(&json!({"mass_kg": null, "customers": null}));
        assert_eq!(payload.mass_kg, None);
        assert_eq!(payload.orbit, UNKNOWN);
        assert!(payload.customers.is_empty());

        let pad = LaunchpadInfo::from_record(&json!({"name": "KSC LC 39A", "region": 12}));
        assert_eq!(pad.name, "KSC LC 39A");
        assert_eq!(pad.region, UNKNOWN);
    }

    #[test]
    fn test_table_from_records() {
        let records = vec![
            json!({"id": "r1", "name": "Falcon 1", "type": "rocket"}),
            json!({"name": "no id"}),
            json!({"id": "r2", "name": "Falcon 9"}),
            json!({"id": "r1", "name": "Falcon 1 (rev)"}),
        ];
        let table: ReferenceTable<RocketInfo> = ReferenceTable::from_records(&records);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("r1").unwrap().name, "Falcon 1 (rev)");
        assert_eq!(table.get("r2").unwrap().kind, UNKNOWN);
        assert!(table.get("r3").is_none());
    }

    #[test]
    fn test_table_from_document_requires_array() {
        let err = ReferenceTable::<PayloadInfo>::from_document("payloads", &json!({"docs": []}))
            .unwrap_err();
        assert!(matches!(err, FeedError::Malformed { .. }));
        let empty = ReferenceTable::<PayloadInfo>::from_document("payloads", &json!([])).unwrap();
        assert!(empty.is_empty());
    }
}
