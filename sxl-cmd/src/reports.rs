//! Report tables built from normalized launch records.

use crate::report::{fmt_mass, fmt_optional, fmt_percent, Table};
use chrono::NaiveDate;
use sxl_data::analysis::{filter_by_prefix, Field};
use sxl_data::summary::{self, SuccessRate};
use sxl_data::{LandingType, NormalizedLaunchRecord};

pub fn mission_totals_table(records: &[NormalizedLaunchRecord]) -> (Table, Table) {
    let outcomes = summary::mission_outcomes(records);

    let mut totals = Table::new("Mission outcomes", &["Outcome", "Missions", "Share"]);
    totals.push(vec![
        "Success".to_string(),
        outcomes.successful.to_string(),
        fmt_percent(outcomes.success_rate),
    ]);
    totals.push(vec![
        "Failure".to_string(),
        outcomes.failed.to_string(),
        fmt_percent(outcomes.failure_rate),
    ]);
    totals.push(vec![
        "Total".to_string(),
        outcomes.total.to_string(),
        String::new(),
    ]);
    if outcomes.total == 0 {
        totals.rows.clear();
    }

    let mut by_year = Table::new("Mission outcomes by year", &["Year", "Successes", "Failures"]);
    for year in &outcomes.by_year {
        by_year.push(vec![
            year.year.to_string(),
            year.successes.to_string(),
            year.failures.to_string(),
        ]);
    }
    (totals, by_year)
}

pub fn landing_ranking_table(
    records: &[NormalizedLaunchRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Table {
    let mut table = Table::new(
        &format!("Landing outcomes between {} and {}", start, end),
        &["Rank", "Landing outcome", "Count"],
    );
    for (rank, (outcome, count)) in summary::landing_outcome_ranking(records, start, end)
        .into_iter()
        .enumerate()
    {
        table.push(vec![(rank + 1).to_string(), outcome.to_string(), count.to_string()]);
    }
    table
}

/// Unique launch sites, optionally restricted to names starting with
/// `prefix`, with distance to a reference point when one is given.
pub fn sites_table(
    records: &[NormalizedLaunchRecord],
    prefix: Option<&str>,
    from: Option<(f64, f64)>,
) -> Table {
    let selected = match prefix {
        Some(prefix) => filter_by_prefix(records, Field::SiteName, prefix),
        None => records.iter().collect(),
    };
    let title = match prefix {
        Some(prefix) => format!("Launch sites starting with '{}'", prefix),
        None => "Launch sites".to_string(),
    };
    let mut headers = vec!["Site", "Full name", "Locality", "Region", "Latitude", "Longitude", "Launches"];
    if from.is_some() {
        headers.push("Distance (km)");
    }
    let mut table = Table::new(&title, &headers);
    for site in summary::unique_launch_sites(selected) {
        let mut row = vec![
            site.name.clone(),
            site.full_name.clone(),
            site.locality.clone(),
            site.region.clone(),
            fmt_optional(site.latitude),
            fmt_optional(site.longitude),
            site.launches.to_string(),
        ];
        if let Some((lat, lon)) = from {
            row.push(fmt_optional(site.distance_km(lat, lon).map(|km| format!("{:.2}", km))));
        }
        table.push(row);
    }
    table
}

fn success_rate_table(title: &str, label: &str, rates: Vec<SuccessRate>) -> Table {
    let mut table = Table::new(title, &[label, "Successes", "Launches", "Success rate"]);
    for rate in rates {
        table.push(vec![
            rate.label,
            rate.successes.to_string(),
            rate.total.to_string(),
            fmt_percent(rate.rate),
        ]);
    }
    table
}

pub fn site_success_table(records: &[NormalizedLaunchRecord]) -> Table {
    success_rate_table(
        "Success rate by launch site",
        "Site",
        summary::site_success_rates(records),
    )
}

pub fn orbit_success_table(records: &[NormalizedLaunchRecord], min_launches: usize) -> Table {
    let title = if min_launches > 1 {
        format!("Success rate by orbit (at least {} launches)", min_launches)
    } else {
        "Success rate by orbit".to_string()
    };
    success_rate_table(
        &title,
        "Orbit",
        summary::orbit_success_rates(records, min_launches),
    )
}

pub fn orbit_flights_table(records: &[NormalizedLaunchRecord]) -> Table {
    let mut table = Table::new(
        "Flight number by orbit",
        &["Orbit", "Launches", "First flight", "Last flight", "Mean flight"],
    );
    for stats in summary::orbit_flight_stats(records) {
        table.push(vec![
            stats.orbit,
            stats.launches.to_string(),
            stats.min_flight.to_string(),
            stats.max_flight.to_string(),
            format!("{:.1}", stats.mean_flight),
        ]);
    }
    table
}

pub fn orbit_payload_table(records: &[NormalizedLaunchRecord]) -> Table {
    let mut table = Table::new(
        "Payload mass by orbit",
        &["Orbit", "Launches", "Min mass (kg)", "Max mass (kg)", "Mean mass (kg)"],
    );
    for stats in summary::orbit_payload_stats(records) {
        table.push(vec![
            stats.orbit,
            stats.launches.to_string(),
            fmt_mass(stats.min_mass_kg),
            fmt_mass(stats.max_mass_kg),
            fmt_mass(stats.mean_mass_kg),
        ]);
    }
    table
}

/// One row per payload mass range, followed by that range's per-site rows.
pub fn payload_outcome_table(records: &[NormalizedLaunchRecord]) -> Table {
    let mut table = Table::new(
        "Launch outcome by payload mass",
        &["Payload range", "Site", "Successes", "Failures", "Launches", "Success rate"],
    );
    for range in summary::payload_range_outcomes(records) {
        table.push(vec![
            range.range.clone(),
            "All sites".to_string(),
            range.successes.to_string(),
            range.failures.to_string(),
            range.launches.to_string(),
            fmt_percent(range.success_rate),
        ]);
        for site in range.by_site {
            table.push(vec![
                range.range.clone(),
                site.label,
                site.successes.to_string(),
                (site.total - site.successes).to_string(),
                site.total.to_string(),
                fmt_percent(site.rate),
            ]);
        }
    }
    table
}

pub fn yearly_trend_table(records: &[NormalizedLaunchRecord]) -> Table {
    let mut table = Table::new("Yearly launch success", &["Year", "Launches", "Success rate"]);
    for year in summary::yearly_success_trend(records) {
        table.push(vec![
            year.year.to_string(),
            year.launches.to_string(),
            fmt_percent(year.success_rate),
        ]);
    }
    table
}

pub fn customer_mass_table(records: &[NormalizedLaunchRecord], customer: &str) -> Table {
    let mass = summary::customer_payload_mass(records, customer);
    let mut table = Table::new(
        &format!(
            "Payload mass for {}: {} kg over {} successful launches",
            mass.customer,
            fmt_mass(mass.total_mass_kg),
            mass.launches.len()
        ),
        &["Flight", "Mission", "Date", "Rocket", "Mass (kg)"],
    );
    for launch in mass.launches {
        table.push(vec![
            launch.flight_number.to_string(),
            launch.mission_name,
            fmt_optional(launch.date),
            launch.rocket_name,
            fmt_mass(launch.mass_kg),
        ]);
    }
    table
}

pub fn rocket_mass_table(records: &[NormalizedLaunchRecord], rocket: &str) -> Table {
    let average = summary::average_payload_mass(records, rocket);
    let mut table = Table::new(
        &format!("Payload mass for rockets matching '{}'", average.rocket_pattern),
        &["Launches", "Average (kg)", "Min (kg)", "Max (kg)"],
    );
    if let Some(mean) = average.average_mass_kg {
        table.push(vec![
            average.launches.to_string(),
            fmt_mass(mean),
            fmt_optional(average.min_mass_kg.map(fmt_mass)),
            fmt_optional(average.max_mass_kg.map(fmt_mass)),
        ]);
    }
    table
}

pub fn max_payload_table(records: &[NormalizedLaunchRecord]) -> Table {
    let mut table = Table::new(
        "Launches carrying the maximum payload mass",
        &["Flight", "Mission", "Date", "Rocket", "Mass (kg)", "Success", "Cores"],
    );
    for launch in summary::max_payload_launches(records) {
        table.push(vec![
            launch.flight_number.to_string(),
            launch.mission_name,
            fmt_optional(launch.date),
            launch.rocket_name,
            fmt_mass(launch.payload_mass_kg),
            launch.success.to_string(),
            launch.core_ids.join(" "),
        ]);
    }
    table
}

const LANDING_HEADERS: [&str; 7] = ["Flight", "Mission", "Date", "Site", "Core", "Landpad", "Outcome"];

fn landing_row(event: summary::LandingEvent) -> Vec<String> {
    vec![
        event.flight_number.to_string(),
        event.mission_name,
        fmt_optional(event.date),
        event.launch_site,
        event.core_id,
        event.landpad,
        event.outcome.to_string(),
    ]
}

pub fn first_landing_table(records: &[NormalizedLaunchRecord], landing_type: &LandingType) -> Table {
    let mut table = Table::new(
        &format!("First successful {} landing", landing_type),
        &LANDING_HEADERS,
    );
    if let Some(event) = summary::first_successful_landing(records, landing_type) {
        table.push(landing_row(event));
    }
    table
}

pub fn failed_landings_table(
    records: &[NormalizedLaunchRecord],
    year: i32,
    landing_type: &LandingType,
) -> Table {
    let mut table = Table::new(
        &format!("Failed {} landings in {}", landing_type, year),
        &LANDING_HEADERS,
    );
    for event in summary::failed_landings_in_year(records, year, landing_type) {
        table.push(landing_row(event));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use sxl_data::normalize;
    use sxl_feed::{RawLaunchEvent, ReferenceTable};
    use serde_json::json;

    fn records() -> Vec<NormalizedLaunchRecord> {
        let rockets = ReferenceTable::from_records(&[json!({"id": "f9", "name": "Falcon 9", "type": "rocket"})]);
        let payloads = ReferenceTable::from_records(&[
            json!({"id": "p1", "mass_kg": 500, "orbit": "LEO", "customers": ["NASA (COTS)"]}),
            json!({"id": "p2", "mass_kg": 2500, "orbit": "ISS", "customers": ["NASA (CRS)"]}),
            json!({"id": "p3", "mass_kg": 4700, "orbit": "GTO", "customers": ["SES"]}),
        ]);
        let launchpads = ReferenceTable::from_records(&[
            json!({"id": "ccafs", "name": "CCAFS SLC 40", "region": "Florida", "latitude": 28.561857, "longitude": -80.577366}),
            json!({"id": "vafb", "name": "VAFB SLC 4E", "region": "California", "latitude": 34.632834, "longitude": -120.610745}),
        ]);
        let events = RawLaunchEvent::parse_feed(&json!([
            {"flight_number": 1, "name": "COTS 1", "date_utc": "2010-12-08T15:43:00.000Z", "rocket": "f9",
             "launchpad": "ccafs", "payloads": ["p1"], "success": true,
             "cores": [{"core": "B0002", "landing_success": false, "landing_type": "Ocean"}]},
            {"flight_number": 2, "name": "CRS-5", "date_utc": "2015-01-10T09:47:00.000Z", "rocket": "f9",
             "launchpad": "ccafs", "payloads": ["p2"], "success": true,
             "cores": [{"core": "B1012", "landing_success": false, "landing_type": "ASDS"}]},
            {"flight_number": 3, "name": "ORBCOMM-OG2", "date_utc": "2015-12-22T01:29:00.000Z", "rocket": "f9",
             "launchpad": "ccafs", "payloads": ["p3"], "success": true,
             "cores": [{"core": "B1019", "landing_success": true, "landing_type": "RTLS"}]},
            {"flight_number": 4, "name": "Jason-3", "date_utc": "2016-01-17T18:42:00.000Z", "rocket": "f9",
             "launchpad": "vafb", "payloads": ["p3"], "success": false,
             "cores": [{"core": "B1017", "landing_success": false, "landing_type": "ASDS"}]}
        ]))
        .unwrap();
        normalize(&events, &rockets, &payloads, &launchpads)
    }

    #[test]
    fn test_empty_records_give_empty_tables() {
        let (totals, by_year) = mission_totals_table(&[]);
        assert!(totals.is_empty());
        assert!(by_year.is_empty());
        let start = NaiveDate::from_ymd_opt(2010, 6, 4).unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 3, 20).unwrap();
        assert!(landing_ranking_table(&[], start, end).is_empty());
        assert!(sites_table(&[], Some("CCA"), None).is_empty());
        assert!(site_success_table(&[]).is_empty());
        assert!(orbit_success_table(&[], 1).is_empty());
        assert!(orbit_payload_table(&[]).is_empty());
        assert!(payload_outcome_table(&[]).is_empty());
        assert!(orbit_flights_table(&[]).is_empty());
        assert!(yearly_trend_table(&[]).is_empty());
        assert!(customer_mass_table(&[], "NASA").is_empty());
        assert!(rocket_mass_table(&[], "Falcon 9").is_empty());
        assert!(max_payload_table(&[]).is_empty());
        assert!(first_landing_table(&[], &LandingType::GroundPad).is_empty());
        assert!(failed_landings_table(&[], 2015, &LandingType::DroneShip).is_empty());
    }

    #[test]
    fn test_mission_totals() {
        let (totals, by_year) = mission_totals_table(&records());
        assert_eq!(totals.rows[0], vec!["Success", "3", "75.0%"]);
        assert_eq!(totals.rows[2][1], "4");
        assert_eq!(by_year.rows.len(), 3);
    }

    #[test]
    fn test_landing_ranking() {
        let start = NaiveDate::from_ymd_opt(2010, 6, 4).unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 3, 20).unwrap();
        let table = landing_ranking_table(&records(), start, end);
        assert_eq!(table.rows[0], vec!["1", "Failure (drone ship)", "2"]);
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn test_sites_with_prefix_and_distance() {
        let table = sites_table(&records(), Some("CCA"), Some((28.56367, -80.57163)));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "CCAFS SLC 40");
        assert_eq!(table.rows[0][6], "3");
        assert_eq!(table.rows[0][7], "0.60");
        assert_eq!(sites_table(&records(), None, None).rows.len(), 2);
    }

    #[test]
    fn test_site_success() {
        let table = site_success_table(&records());
        assert_eq!(table.rows[0], vec!["CCAFS SLC 40", "3", "3", "100.0%"]);
        assert_eq!(table.rows[1], vec!["VAFB SLC 4E", "0", "1", "0.0%"]);
    }

    #[test]
    fn test_customer_mass() {
        let table = customer_mass_table(&records(), "nasa");
        assert!(table.title.contains("3000.0 kg over 2"));
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_rocket_mass_and_max_payload() {
        let table = rocket_mass_table(&records(), "Falcon 9");
        assert_eq!(table.rows[0][0], "4");
        assert_eq!(table.rows[0][1], "3100.0");

        let max = max_payload_table(&records());
        assert_eq!(max.rows.len(), 2);
        assert_eq!(max.rows[0][6], "B1019");
        assert_eq!(max.rows[1][5], "false");
    }

    #[test]
    fn test_landing_tables() {
        let first = first_landing_table(&records(), &LandingType::GroundPad);
        assert_eq!(first.rows.len(), 1);
        assert_eq!(first.rows[0][2], "2015-12-22");
        assert_eq!(first.rows[0][6], "Success (ground pad)");

        let failed = failed_landings_table(&records(), 2015, &LandingType::DroneShip);
        assert_eq!(failed.rows.len(), 1);
        assert_eq!(failed.rows[0][4], "B1012");
    }

    #[test]
    fn test_orbit_tables() {
        let flights = orbit_flights_table(&records());
        assert_eq!(flights.rows[2], vec!["GTO", "2", "3", "4", "3.5"]);
        let success = orbit_success_table(&records(), 1);
        assert_eq!(success.rows.len(), 3);
        assert_eq!(success.rows[2][0], "GTO");
        let trend = yearly_trend_table(&records());
        assert_eq!(trend.rows[1], vec!["2015", "2", "100.0%"]);
    }

    #[test]
    fn test_orbit_success_min_launches() {
        let success = orbit_success_table(&records(), 2);
        assert!(success.title.contains("at least 2"));
        assert_eq!(success.rows, vec![vec!["GTO", "1", "2", "50.0%"]]);
    }

    #[test]
    fn test_orbit_payload() {
        let table = orbit_payload_table(&records());
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["LEO", "1", "500.0", "500.0", "500.0"]);
        assert_eq!(table.rows[2], vec!["GTO", "2", "4700.0", "4700.0", "4700.0"]);
    }

    #[test]
    fn test_payload_outcome() {
        let table = payload_outcome_table(&records());
        let ranges: Vec<(&str, &str)> = table
            .rows
            .iter()
            .map(|r| (r[0].as_str(), r[1].as_str()))
            .collect();
        assert_eq!(
            ranges,
            vec![
                ("0-1000 kg", "All sites"),
                ("0-1000 kg", "CCAFS SLC 40"),
                ("1000-3000 kg", "All sites"),
                ("1000-3000 kg", "CCAFS SLC 40"),
                ("3000-6000 kg", "All sites"),
                ("3000-6000 kg", "CCAFS SLC 40"),
                ("3000-6000 kg", "VAFB SLC 4E"),
            ]
        );
        assert_eq!(table.rows[4][2..], ["1", "1", "2", "50.0%"]);
        assert_eq!(table.rows[6][2..], ["0", "1", "1", "0.0%"]);
    }
}
