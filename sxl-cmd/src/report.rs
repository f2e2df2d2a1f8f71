//! Plain-text tables on stdout, optionally mirrored to a CSV file.

use anyhow::Context;
use clap::Args;
use log::info;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const DEFAULT_TOP: usize = 10;

/// Output settings, passed explicitly to every report.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Maximum number of rows printed (0 prints every row)
    #[arg(long, default_value_t = DEFAULT_TOP)]
    pub top: usize,

    /// Also write the full table to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            top: DEFAULT_TOP,
            csv: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Table {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the first `config.top` rows with padded columns.
    pub fn render(&self, config: &ReportConfig) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(self.title.len()));
        if self.rows.is_empty() {
            let _ = writeln!(out, "No data available");
            return out;
        }

        let shown = if config.top == 0 {
            self.rows.len()
        } else {
            config.top.min(self.rows.len())
        };
        let rows = &self.rows[..shown];

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        let _ = writeln!(out, "{}", line(&self.headers));
        let _ = writeln!(
            out,
            "{}",
            widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
        );
        for row in rows {
            let _ = writeln!(out, "{}", line(row));
        }
        if shown < self.rows.len() {
            let _ = writeln!(out, "... {} more rows", self.rows.len() - shown);
        }
        out
    }

    /// Write every row, header first. An empty table yields a header-only file.
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Print to stdout and write the CSV copy when one is configured.
    pub fn emit(&self, config: &ReportConfig) -> anyhow::Result<()> {
        print!("{}", self.render(config));
        if let Some(path) = &config.csv {
            self.write_csv(path)?;
        }
        Ok(())
    }
}

pub fn fmt_mass(kg: f64) -> String {
    format!("{:.1}", kg)
}

pub fn fmt_percent(rate: f64) -> String {
    format!("{:.1}%", rate)
}

pub fn fmt_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table(rows: usize) -> Table {
        let mut table = Table::new("Sites", &["Site", "Launches"]);
        for i in 0..rows {
            table.push(vec![format!("Site {}", i), i.to_string()]);
        }
        table
    }

    #[test]
    fn test_render_empty_table() {
        let out = sample_table(0).render(&ReportConfig::default());
        assert!(out.contains("No data available"));
    }

    #[test]
    fn test_render_truncates_to_top() {
        let config = ReportConfig { top: 2, csv: None };
        let out = sample_table(5).render(&config);
        assert!(out.contains("Site 1"));
        assert!(!out.contains("Site 2"));
        assert!(out.contains("... 3 more rows"));

        let all = sample_table(5).render(&ReportConfig { top: 0, csv: None });
        assert!(all.contains("Site 4"));
    }

    #[test]
    fn test_render_pads_columns() {
        let mut table = Table::new("T", &["A", "B"]);
        table.push(vec!["long value".to_string(), "1".to_string()]);
        let out = table.render(&ReportConfig::default());
        assert!(out.contains("A           B"));
        assert!(out.contains("long value  1"));
    }

    #[test]
    fn test_write_csv_writes_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        sample_table(3).write_csv(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Site,Launches\nSite 0,0\nSite 1,1\nSite 2,2\n");
    }

    #[test]
    fn test_write_csv_empty_table_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        sample_table(0).write_csv(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Site,Launches\n");
    }

    #[test]
    fn test_formatters() {
        assert_eq!(fmt_mass(1234.56), "1234.6");
        assert_eq!(fmt_percent(66.666), "66.7%");
        assert_eq!(fmt_optional::<i32>(None), "");
        assert_eq!(fmt_optional(Some(3)), "3");
    }
}
