//! Export module for CSV and JSON export functionality
//!
//! Flattens a finished report into one record per bucket for CSV, and
//! preserves the full structure for JSON.

pub mod csv_export;
pub mod json_export;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::report::Report;
use crate::Error;

/// Export format options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(Error::Internal(format!(
                "Invalid export format: {}. Use 'csv' or 'json'",
                s
            ))),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Exportable bucket record for CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportableBucket {
    pub anchor: String,
    pub window: String,
    pub source: String,
    pub entity_id: Option<String>,
    pub total_credits: f64,
    pub estimated_cost: Option<f64>,
    pub row_count_sum: u64,
}

/// Exportable per-window grand total record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportableTotal {
    pub anchor: String,
    pub window: String,
    pub total_credits: f64,
    pub estimated_cost: Option<f64>,
    pub row_count_sum: u64,
}

/// Flatten a report into one record per bucket
pub fn flatten_buckets(report: &Report) -> Vec<ExportableBucket> {
    let mut out = Vec::new();
    for window in &report.windows {
        for bucket in &window.buckets {
            out.push(ExportableBucket {
                anchor: report.anchor.clone(),
                window: window.window.label().to_string(),
                source: bucket.source.label().to_string(),
                entity_id: bucket.entity_id.clone(),
                total_credits: bucket.total_credits,
                estimated_cost: bucket.estimated_cost,
                row_count_sum: bucket.row_count_sum,
            });
        }
    }
    out
}

/// One grand-total record per window
pub fn flatten_totals(report: &Report) -> Vec<ExportableTotal> {
    report
        .windows
        .iter()
        .map(|window| ExportableTotal {
            anchor: report.anchor.clone(),
            window: window.window.label().to_string(),
            total_credits: window.grand_total.total_credits,
            estimated_cost: window.grand_total.estimated_cost,
            row_count_sum: window.grand_total.row_count_sum,
        })
        .collect()
}

/// Get the default export directory (Downloads folder or temp dir)
pub fn get_export_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::document_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// Generate a timestamped filename for exports
pub fn generate_export_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", prefix, timestamp, extension)
}

// Re-export writers
pub use csv_export::*;
pub use json_export::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{CostBucket, WindowReport, WindowTotal};
    use crate::models::usage::{Source, TimeWindow};

    fn sample_report() -> Report {
        Report {
            anchor: "2026-08-07".to_string(),
            windows: vec![WindowReport {
                window: TimeWindow::OneDay,
                buckets: vec![
                    CostBucket {
                        source: Source::ComputeQuery,
                        window: TimeWindow::OneDay,
                        entity_id: Some("ETL_WH".to_string()),
                        total_credits: 10.0,
                        estimated_cost: Some(26.0),
                        row_count_sum: 4,
                    },
                    CostBucket::zero(Source::SearchUsage, TimeWindow::OneDay),
                ],
                grand_total: WindowTotal {
                    window: TimeWindow::OneDay,
                    total_credits: 10.0,
                    estimated_cost: Some(26.0),
                    row_count_sum: 4,
                },
            }],
            credit_only: false,
            warnings: vec![],
        }
    }

    #[test]
    fn test_export_format_from_str() {
        assert!(matches!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv));
        assert!(matches!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv));
        assert!(matches!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json));
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_flatten_buckets() {
        let records = flatten_buckets(&sample_report());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].window, "1d");
        assert_eq!(records[0].source, "Warehouse Compute");
        assert_eq!(records[0].entity_id.as_deref(), Some("ETL_WH"));
        assert_eq!(records[1].source, "Cortex Search");
        assert_eq!(records[1].total_credits, 0.0);
    }

    #[test]
    fn test_flatten_totals() {
        let totals = flatten_totals(&sample_report());
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].window, "1d");
        assert_eq!(totals[0].total_credits, 10.0);
        assert_eq!(totals[0].estimated_cost, Some(26.0));
    }

    #[test]
    fn test_generate_export_filename() {
        let filename = generate_export_filename("cost_report", "csv");
        assert!(filename.starts_with("cost_report_"));
        assert!(filename.ends_with(".csv"));
        assert!(filename.len() > 20);
    }

    #[test]
    fn test_get_export_directory() {
        let dir = get_export_directory();
        assert!(dir.to_str().is_some());
    }
}
