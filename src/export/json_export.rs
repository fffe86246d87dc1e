//! JSON export functionality
//!
//! Preserves the full report structure, wrapped with export metadata and a
//! small summary block.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::models::report::Report;
use crate::Error;

const EXPORT_VERSION: &str = "1.0.0";

/// Complete export structure for JSON
#[derive(Debug, Clone, Serialize)]
pub struct ReportExportJson {
    pub export_date: String,
    pub export_version: &'static str,
    pub report: Report,
    pub summary: ReportExportSummary,
}

/// Summary statistics for the export
#[derive(Debug, Clone, Serialize)]
pub struct ReportExportSummary {
    pub window_count: usize,
    pub bucket_count: usize,
    pub warning_count: usize,
    pub credit_only: bool,
}

impl ReportExportJson {
    pub fn from_report(report: &Report) -> Self {
        let summary = ReportExportSummary {
            window_count: report.windows.len(),
            bucket_count: report.windows.iter().map(|w| w.buckets.len()).sum(),
            warning_count: report.warnings.len(),
            credit_only: report.credit_only,
        };

        Self {
            export_date: chrono::Utc::now().to_rfc3339(),
            export_version: EXPORT_VERSION,
            report: report.clone(),
            summary,
        }
    }
}

/// Write a report to JSON format
pub fn write_report_json(report: &Report, path: &PathBuf) -> Result<(), Error> {
    let export = ReportExportJson::from_report(report);

    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| Error::Internal(format!("Failed to serialize report: {}", e)))?;

    let mut file = std::fs::File::create(path)
        .map_err(|e| Error::Internal(format!("Failed to create JSON file: {}", e)))?;

    file.write_all(json.as_bytes())
        .map_err(|e| Error::Internal(format!("Failed to write JSON file: {}", e)))?;

    Ok(())
}
