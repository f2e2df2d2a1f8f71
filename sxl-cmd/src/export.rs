//! Dump the normalized launch table.

use anyhow::Context;
use clap::ValueEnum;
use log::info;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use sxl_data::NormalizedLaunchRecord;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// One flat row per launch
    #[default]
    Csv,
    /// The full nested records
    Json,
}

/// Flat CSV view of a [`NormalizedLaunchRecord`].
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    flight_number: i64,
    mission_name: &'a str,
    date_utc: String,
    date_local: String,
    success: bool,
    outcome_determined: bool,
    rocket_name: &'a str,
    rocket_type: &'a str,
    launch_site: &'a str,
    site_full_name: &'a str,
    site_locality: &'a str,
    site_region: &'a str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    payload_count: usize,
    payload_mass_kg: f64,
    orbit: &'a str,
    core_count: usize,
    landing_outcomes: String,
}

impl<'a> From<&'a NormalizedLaunchRecord> for ExportRow<'a> {
    fn from(record: &'a NormalizedLaunchRecord) -> Self {
        ExportRow {
            flight_number: record.flight_number,
            mission_name: &record.mission_name,
            date_utc: record.date_utc.map(|d| d.to_rfc3339()).unwrap_or_default(),
            date_local: record.date_local.map(|d| d.to_rfc3339()).unwrap_or_default(),
            success: record.success,
            outcome_determined: record.outcome_determined,
            rocket_name: &record.rocket.name,
            rocket_type: &record.rocket.kind,
            launch_site: &record.launch_site.name,
            site_full_name: &record.launch_site.full_name,
            site_locality: &record.launch_site.locality,
            site_region: &record.launch_site.region,
            latitude: record.launch_site.latitude,
            longitude: record.launch_site.longitude,
            payload_count: record.payloads.len(),
            payload_mass_kg: record.payload_mass_kg,
            orbit: &record.orbit,
            core_count: record.cores.len(),
            landing_outcomes: record
                .cores
                .iter()
                .map(|c| c.outcome.label())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

const CSV_HEADERS: [&str; 19] = [
    "flight_number",
    "mission_name",
    "date_utc",
    "date_local",
    "success",
    "outcome_determined",
    "rocket_name",
    "rocket_type",
    "launch_site",
    "site_full_name",
    "site_locality",
    "site_region",
    "latitude",
    "longitude",
    "payload_count",
    "payload_mass_kg",
    "orbit",
    "core_count",
    "landing_outcomes",
];

pub fn write_csv<W: Write>(records: &[NormalizedLaunchRecord], out: W) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(records: &[NormalizedLaunchRecord], mut out: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, records)?;
    writeln!(out)?;
    Ok(())
}

/// Write the table to `output`, or stdout when no path is given.
pub fn run_export(
    records: &[NormalizedLaunchRecord],
    format: ExportFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let out = std::io::BufWriter::new(file);
            match format {
                ExportFormat::Csv => write_csv(records, out)?,
                ExportFormat::Json => write_json(records, out)?,
            }
            info!("Exported {} launches to {}", records.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            match format {
                ExportFormat::Csv => write_csv(records, stdout.lock())?,
                ExportFormat::Json => write_json(records, stdout.lock())?,
            }
        }
    }
    Ok(())
}
