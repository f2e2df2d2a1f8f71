//! Filtering, grouping and ranking over normalized records.
//!
//! Every helper takes records by reference and returns them in input order.

use crate::record::NormalizedLaunchRecord;
use chrono::NaiveDate;
use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::Hash;
use sxl_feed::fields::UNKNOWN;

/// Keep records whose UTC calendar date lies in `[start, end]`. Records
/// without a date are dropped.
pub fn filter_by_date_range<'a, I>(
    records: I,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&'a NormalizedLaunchRecord>
where
    I: IntoIterator<Item = &'a NormalizedLaunchRecord>,
{
    records
        .into_iter()
        .filter(|r| matches!(r.date(), Some(date) if date >= start && date <= end))
        .collect()
}

/// A resolved text column of a normalized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Mission,
    RocketName,
    RocketType,
    SiteName,
    SiteFullName,
    SiteLocality,
    SiteRegion,
    Orbit,
    Year,
}

impl Field {
    pub fn value<'a>(&self, record: &'a NormalizedLaunchRecord) -> Cow<'a, str> {
        match self {
            Field::Mission => Cow::Borrowed(&record.mission_name),
            Field::RocketName => Cow::Borrowed(&record.rocket.name),
            Field::RocketType => Cow::Borrowed(&record.rocket.kind),
            Field::SiteName => Cow::Borrowed(&record.launch_site.name),
            Field::SiteFullName => Cow::Borrowed(&record.launch_site.full_name),
            Field::SiteLocality => Cow::Borrowed(&record.launch_site.locality),
            Field::SiteRegion => Cow::Borrowed(&record.launch_site.region),
            Field::Orbit => Cow::Borrowed(&record.orbit),
            Field::Year => match record.year() {
                Some(year) => Cow::Owned(year.to_string()),
                None => Cow::Borrowed(UNKNOWN),
            },
        }
    }
}

/// Case-sensitive prefix match on `field`.
pub fn filter_by_prefix<'a, I>(records: I, field: Field, prefix: &str) -> Vec<&'a NormalizedLaunchRecord>
where
    I: IntoIterator<Item = &'a NormalizedLaunchRecord>,
{
    records
        .into_iter()
        .filter(|r| field.value(r).starts_with(prefix))
        .collect()
}

/// Records sharing a key.
#[derive(Debug, Clone)]
pub struct Group<'a, K> {
    pub key: K,
    pub records: Vec<&'a NormalizedLaunchRecord>,
}

impl<K> Group<'_, K> {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn sum<F>(&self, f: F) -> f64
    where
        F: Fn(&NormalizedLaunchRecord) -> f64,
    {
        self.records.iter().map(|r| f(r)).sum()
    }

    /// `None` for an empty group.
    pub fn mean<F>(&self, f: F) -> Option<f64>
    where
        F: Fn(&NormalizedLaunchRecord) -> f64,
    {
        if self.records.is_empty() {
            return None;
        }
        Some(self.sum(f) / self.records.len() as f64)
    }
}

/// Partition records by `key_fn`. Groups come out in order of first
/// occurrence, records inside a group in input order.
pub fn group_by<'a, I, K, F>(records: I, key_fn: F) -> Vec<Group<'a, K>>
where
    I: IntoIterator<Item = &'a NormalizedLaunchRecord>,
    K: Eq + Hash + Clone,
    F: Fn(&NormalizedLaunchRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Group<'a, K>> = Vec::new();
    for record in records {
        let key = key_fn(record);
        match index.get(&key) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    records: vec![record],
                });
            }
        }
    }
    groups
}

/// Count occurrences and sort by descending count. Ties keep first
/// occurrence order.
pub fn rank_by_count<K, I>(items: I) -> Vec<(K, usize)>
where
    I: IntoIterator<Item = K>,
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
