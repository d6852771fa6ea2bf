//! Report export
//!
//! Writes reports as JSON or CSV and reads JSON reports back.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

use crate::models::RunReport;

/// File format for exported reports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_name)
    }
}

/// Export a report, picking the format from the file extension
///
/// Unknown extensions fall back to JSON.
pub fn export_report(report: &RunReport, path: impl AsRef<Path>) -> Result<ExportFormat> {
    let path = path.as_ref();
    let format = ExportFormat::from_extension(path).unwrap_or(ExportFormat::Json);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    match format {
        ExportFormat::Json => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create file: {}", path.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(file), report)
                .context("Failed to serialize report")?;
        }
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)
                .with_context(|| format!("Failed to create file: {}", path.display()))?;

            writer.write_record(["run_id", "status", "item", "detail"])?;

            for result in &report.results {
                writer.write_record([report.id.as_str(), "succeeded", "", result.as_str()])?;
            }
            for failure in &report.failures {
                writer.write_record([
                    report.id.as_str(),
                    "failed",
                    failure.item.as_str(),
                    failure.error.as_str(),
                ])?;
            }

            writer.flush()?;
        }
    }

    info!("Exported run {} to {}", report.id, path.display());
    Ok(format)
}

/// Load a report previously exported as JSON
pub fn load_report(path: impl AsRef<Path>) -> Result<RunReport> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open report: {}", path.display()))?;
    let report = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse report: {}", path.display()))?;
    Ok(report)
}
