//! CSV export of one suite run.
//!
//! One row per completed scenario, plus a `failed` row for the scenario that
//! stopped the run and a `not_run` row for each scenario after it. The file is
//! overwritten on every export.

use std::{
    fs::create_dir_all,
    io,
    path::Path,
};

use csv::Writer;
use log::info;
use serde::Serialize;

use crate::engine::suite::SuiteReport;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    scenario: &'a str,
    duration_ms: Option<i64>,
    anomalies: usize,
    status: &'static str,
    detail: String,
}

pub fn export_report_csv(report: &SuiteReport, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(path)?;

    for r in &report.results {
        writer.serialize(CsvRow {
            scenario: &r.name,
            duration_ms: Some(r.duration_ms),
            anomalies: r.anomalies.len(),
            status: if r.anomalies.is_empty() { "ok" } else { "anomaly" },
            detail: r
                .anomalies
                .iter()
                .map(|a| a.detail.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        })?;
    }

    if let Some(f) = &report.failure {
        writer.serialize(CsvRow {
            scenario: &f.scenario,
            duration_ms: None,
            anomalies: 0,
            status: "failed",
            detail: f.cause.to_string(),
        })?;
        for name in &f.not_run {
            writer.serialize(CsvRow {
                scenario: name,
                duration_ms: None,
                anomalies: 0,
                status: "not_run",
                detail: String::new(),
            })?;
        }
    }

    writer.flush()?;
    info!("Report exported to: {}", path.display());
    Ok(())
}
