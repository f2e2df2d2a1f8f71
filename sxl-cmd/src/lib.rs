//! Command implementations for SXL CLI.
//!
//! Every subcommand loads and normalizes the launch feed once, then prints a
//! report built from the normalized records.

use chrono::NaiveDate;
use clap::Subcommand;
use std::convert::Infallible;
use std::path::PathBuf;
use sxl_data::LandingType;
use sxl_utils::dates::parse_date;

pub mod export;
pub mod report;
pub mod reports;
pub mod source;

pub use export::ExportFormat;
pub use report::{ReportConfig, Table};
pub use source::FeedArgs;

fn parse_landing_type(value: &str) -> Result<LandingType, Infallible> {
    Ok(LandingType::parse(value))
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the normalized launch table
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Mission outcome totals and per-year breakdown
    Missions {
        #[command(flatten)]
        report: ReportConfig,
    },

    /// Rank landing outcomes in a date range
    Landings {
        /// First day of the range (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date, default_value = "2010-06-04")]
        start: NaiveDate,

        /// Last day of the range (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date, default_value = "2017-03-20")]
        end: NaiveDate,

        #[command(flatten)]
        report: ReportConfig,
    },

    /// Unique launch sites
    Sites {
        /// Only sites whose name starts with this (case-sensitive)
        #[arg(long)]
        prefix: Option<String>,

        /// Latitude of a point to measure distance from
        #[arg(long, requires = "from_lon", allow_negative_numbers = true)]
        from_lat: Option<f64>,

        /// Longitude of a point to measure distance from
        #[arg(long, requires = "from_lat", allow_negative_numbers = true)]
        from_lon: Option<f64>,

        #[command(flatten)]
        report: ReportConfig,
    },

    /// Success rate per launch site
    SiteSuccess {
        #[command(flatten)]
        report: ReportConfig,
    },

    /// Success rate per orbit
    OrbitSuccess {
        /// Leave out orbits flown fewer times than this
        #[arg(long, default_value_t = 1)]
        min_launches: usize,

        #[command(flatten)]
        report: ReportConfig,
    },

    /// Flight number statistics per orbit
    OrbitFlights {
        #[command(flatten)]
        report: ReportConfig,
    },

    /// Payload mass statistics per orbit
    OrbitPayload {
        #[command(flatten)]
        report: ReportConfig,
    },

    /// Launch outcomes by payload mass range, split per site
    PayloadOutcome {
        #[command(flatten)]
        report: ReportConfig,
    },

    /// Success rate per year
    YearlyTrend {
        #[command(flatten)]
        report: ReportConfig,
    },

    /// Total payload mass carried for a customer on successful launches
    CustomerMass {
        #[arg(long, default_value = "NASA")]
        customer: String,

        #[command(flatten)]
        report: ReportConfig,
    },

    /// Average payload mass for rockets whose name contains a pattern
    RocketMass {
        #[arg(long, default_value = "Falcon 9")]
        rocket: String,

        #[command(flatten)]
        report: ReportConfig,
    },

    /// Launches carrying the maximum payload mass
    MaxPayload {
        #[command(flatten)]
        report: ReportConfig,
    },

    /// First successful landing of a type (RTLS, ASDS, Ocean)
    FirstLanding {
        #[arg(long, value_parser = parse_landing_type, default_value = "RTLS")]
        landing_type: LandingType,

        #[command(flatten)]
        report: ReportConfig,
    },

    /// Failed landings of a type in a year
    FailedLandings {
        #[arg(long, default_value_t = 2015)]
        year: i32,

        #[arg(long, value_parser = parse_landing_type, default_value = "ASDS")]
        landing_type: LandingType,

        #[command(flatten)]
        report: ReportConfig,
    },
}

pub async fn run(feed: &FeedArgs, command: Command) -> anyhow::Result<()> {
    if let Command::Landings { start, end, .. } = &command {
        if start > end {
            anyhow::bail!("--start {} is after --end {}", start, end);
        }
    }

    let records = source::load_records(feed).await?;

    match command {
        Command::Export { format, output } => {
            export::run_export(&records, format, output.as_deref())
        }
        Command::Missions { report } => {
            let (totals, by_year) = reports::mission_totals_table(&records);
            print!("{}", totals.render(&report));
            println!();
            by_year.emit(&report)
        }
        Command::Landings { start, end, report } => {
            reports::landing_ranking_table(&records, start, end).emit(&report)
        }
        Command::Sites {
            prefix,
            from_lat,
            from_lon,
            report,
        } => {
            let from = from_lat.zip(from_lon);
            reports::sites_table(&records, prefix.as_deref(), from).emit(&report)
        }
        Command::SiteSuccess { report } => reports::site_success_table(&records).emit(&report),
        Command::OrbitSuccess {
            min_launches,
            report,
        } => reports::orbit_success_table(&records, min_launches).emit(&report),
        Command::OrbitFlights { report } => reports::orbit_flights_table(&records).emit(&report),
        Command::OrbitPayload { report } => reports::orbit_payload_table(&records).emit(&report),
        Command::PayloadOutcome { report } => {
            reports::payload_outcome_table(&records).emit(&report)
        }
        Command::YearlyTrend { report } => reports::yearly_trend_table(&records).emit(&report),
        Command::CustomerMass { customer, report } => {
            reports::customer_mass_table(&records, &customer).emit(&report)
        }
        Command::RocketMass { rocket, report } => {
            reports::rocket_mass_table(&records, &rocket).emit(&report)
        }
        Command::MaxPayload { report } => reports::max_payload_table(&records).emit(&report),
        Command::FirstLanding {
            landing_type,
            report,
        } => reports::first_landing_table(&records, &landing_type).emit(&report),
        Command::FailedLandings {
            year,
            landing_type,
            report,
        } => reports::failed_landings_table(&records, year, &landing_type).emit(&report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        feed: FeedArgs,

        #[command(subcommand)]
        command: Command,
    }

    fn offline() -> FeedArgs {
        FeedArgs {
            offline: true,
            sample_size: 30,
            ..FeedArgs::default()
        }
    }

    #[test]
    fn test_parse_landings_defaults() {
        let cli = TestCli::try_parse_from(["sxl-cli", "--offline", "landings"]).unwrap();
        assert!(cli.feed.offline);
        match cli.command {
            Command::Landings { start, end, report } => {
                assert_eq!(start, NaiveDate::from_ymd_opt(2010, 6, 4).unwrap());
                assert_eq!(end, NaiveDate::from_ymd_opt(2017, 3, 20).unwrap());
                assert_eq!(report, ReportConfig::default());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_feed_args_after_subcommand() {
        let cli = TestCli::try_parse_from([
            "sxl-cli", "failed-landings", "--year", "2016", "--landing-type", "RTLS", "--seed", "9",
        ])
        .unwrap();
        assert_eq!(cli.feed.seed, 9);
        match cli.command {
            Command::FailedLandings { year, landing_type, .. } => {
                assert_eq!(year, 2016);
                assert_eq!(landing_type, LandingType::GroundPad);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let cli = TestCli::try_parse_from([
            "sxl-cli", "sites", "--prefix", "CCA", "--from-lat", "28.56", "--from-lon", "-80.57",
        ])
        .unwrap();
        match cli.command {
            Command::Sites { prefix, from_lat, from_lon, .. } => {
                assert_eq!(prefix.as_deref(), Some("CCA"));
                assert_eq!(from_lat, Some(28.56));
                assert_eq!(from_lon, Some(-80.57));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        assert!(TestCli::try_parse_from(["sxl-cli", "landings", "--start", "2015-13-01"]).is_err());
        assert!(TestCli::try_parse_from(["sxl-cli", "sites", "--from-lat", "1.0"]).is_err());
    }

    #[test]
    fn test_parse_orbit_success_min_launches() {
        let cli = TestCli::try_parse_from(["sxl-cli", "orbit-success"]).unwrap();
        assert!(matches!(cli.command, Command::OrbitSuccess { min_launches: 1, .. }));
        let cli =
            TestCli::try_parse_from(["sxl-cli", "orbit-success", "--min-launches", "3"]).unwrap();
        assert!(matches!(cli.command, Command::OrbitSuccess { min_launches: 3, .. }));
        assert!(TestCli::try_parse_from(["sxl-cli", "orbit-success", "--min-launches", "-1"]).is_err());
    }

    #[tokio::test]
    async fn test_run_rejects_inverted_range() {
        let command = Command::Landings {
            start: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            report: ReportConfig::default(),
        };
        assert!(run(&offline(), command).await.is_err());
    }

    #[tokio::test]
    async fn test_run_writes_report_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trend.csv");
        let command = Command::YearlyTrend {
            report: ReportConfig {
                top: 3,
                csv: Some(path.clone()),
            },
        };
        run(&offline(), command).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Year,Launches,Success rate\n"));
        assert!(text.lines().count() > 1);
    }

    #[tokio::test]
    async fn test_run_payload_reports_csv() {
        let dir = tempfile::tempdir().unwrap();
        let orbit_path = dir.path().join("orbit_payload.csv");
        let cli = TestCli::try_parse_from([
            "sxl-cli",
            "--offline",
            "--sample-size",
            "40",
            "orbit-payload",
            "--csv",
            orbit_path.to_str().unwrap(),
        ])
        .unwrap();
        run(&cli.feed, cli.command).await.unwrap();
        let text = std::fs::read_to_string(&orbit_path).unwrap();
        assert!(text.starts_with("Orbit,Launches,Min mass (kg),Max mass (kg),Mean mass (kg)\n"));

        let range_path = dir.path().join("payload_outcome.csv");
        let command = Command::PayloadOutcome {
            report: ReportConfig {
                top: 0,
                csv: Some(range_path.clone()),
            },
        };
        run(&offline(), command).await.unwrap();
        let text = std::fs::read_to_string(&range_path).unwrap();
        assert!(text.starts_with("Payload range,Site,"));
        assert!(text.lines().skip(1).any(|line| line.contains("All sites")));
    }

    #[tokio::test]
    async fn test_run_export_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launches.json");
        let command = Command::Export {
            format: ExportFormat::Json,
            output: Some(path.clone()),
        };
        run(&offline(), command).await.unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(30));
    }
}
