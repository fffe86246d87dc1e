//! Report output types
//!
//! The structures handed to the presentation layer: per-window cost buckets,
//! grand totals, and the data-quality warning list.

use serde::{Deserialize, Serialize};

use super::usage::{Source, TimeWindow};

/// Aggregated totals for one (source, window, optional entity) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBucket {
    pub source: Source,
    pub window: TimeWindow,
    /// Present only in by-entity grouping mode
    pub entity_id: Option<String>,
    pub total_credits: f64,
    /// `None` when the report runs in credit-only mode
    pub estimated_cost: Option<f64>,
    pub row_count_sum: u64,
}

impl CostBucket {
    /// An all-zero bucket, emitted so empty sources never vanish silently
    pub fn zero(source: Source, window: TimeWindow) -> Self {
        Self {
            source,
            window,
            entity_id: None,
            total_credits: 0.0,
            estimated_cost: None,
            row_count_sum: 0,
        }
    }
}

/// Grand total for one window, the arithmetic sum of its buckets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowTotal {
    pub window: TimeWindow,
    pub total_credits: f64,
    pub estimated_cost: Option<f64>,
    pub row_count_sum: u64,
}

/// One window's section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    pub window: TimeWindow,
    pub buckets: Vec<CostBucket>,
    pub grand_total: WindowTotal,
}

impl WindowReport {
    /// Buckets belonging to one source
    pub fn buckets_for(&self, source: Source) -> impl Iterator<Item = &CostBucket> {
        self.buckets.iter().filter(move |b| b.source == source)
    }

    /// Credits for one source across all of its buckets
    pub fn source_credits(&self, source: Source) -> f64 {
        self.buckets_for(source).map(|b| b.total_credits).sum()
    }
}

/// Complete cost report for one refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Anchor date the windows were computed against, `YYYY-MM-DD`
    pub anchor: String,
    pub windows: Vec<WindowReport>,
    /// True when no valid pricing was available and costs are omitted
    pub credit_only: bool,
    pub warnings: Vec<ReportWarning>,
}

impl Report {
    /// Section for a specific window, if it was requested
    pub fn window(&self, window: TimeWindow) -> Option<&WindowReport> {
        self.windows.iter().find(|w| w.window == window)
    }
}

/// Grouping mode for a report section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// One aggregate bucket per source
    #[default]
    Flat,
    /// One bucket per distinct entity within the source
    ByEntity,
}

/// Why a row was dropped during ingest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Negative or non-finite credit value
    InvalidCredits,
    /// Timestamp did not parse to a valid date
    BadTimestamp,
}

impl DropReason {
    pub fn label(&self) -> &'static str {
        match self {
            DropReason::InvalidCredits => "invalid credits",
            DropReason::BadTimestamp => "bad timestamp",
        }
    }
}

/// Non-fatal annotations surfaced alongside the report
///
/// Nothing in the aggregator is allowed to fail the whole report; every
/// degradation shows up here instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    /// Rows dropped during ingest
    DataQuality {
        source: Source,
        reason: DropReason,
        dropped: u64,
    },
    /// Edition unknown or rate invalid; report degraded to credit-only
    PricingUnavailable { detail: String },
    /// An adapter returned nothing for this source; buckets are zero-filled
    SourceUnavailable { source: Source },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bucket() {
        let bucket = CostBucket::zero(Source::AnalystUsage, TimeWindow::SevenDays);
        assert_eq!(bucket.total_credits, 0.0);
        assert_eq!(bucket.row_count_sum, 0);
        assert!(bucket.entity_id.is_none());
        assert!(bucket.estimated_cost.is_none());
    }

    #[test]
    fn test_window_report_source_credits() {
        let report = WindowReport {
            window: TimeWindow::OneDay,
            buckets: vec![
                CostBucket {
                    source: Source::SearchUsage,
                    window: TimeWindow::OneDay,
                    entity_id: Some("DOCS".to_string()),
                    total_credits: 1.5,
                    estimated_cost: None,
                    row_count_sum: 0,
                },
                CostBucket {
                    source: Source::SearchUsage,
                    window: TimeWindow::OneDay,
                    entity_id: Some("WIKI".to_string()),
                    total_credits: 0.5,
                    estimated_cost: None,
                    row_count_sum: 0,
                },
                CostBucket::zero(Source::AnalystUsage, TimeWindow::OneDay),
            ],
            grand_total: WindowTotal {
                window: TimeWindow::OneDay,
                total_credits: 2.0,
                estimated_cost: None,
                row_count_sum: 0,
            },
        };

        assert!((report.source_credits(Source::SearchUsage) - 2.0).abs() < 1e-9);
        assert_eq!(report.source_credits(Source::AnalystUsage), 0.0);
        assert_eq!(report.buckets_for(Source::SearchUsage).count(), 2);
    }

    #[test]
    fn test_report_window_lookup() {
        let report = Report {
            anchor: "2026-08-07".to_string(),
            windows: vec![WindowReport {
                window: TimeWindow::OneDay,
                buckets: vec![],
                grand_total: WindowTotal {
                    window: TimeWindow::OneDay,
                    total_credits: 0.0,
                    estimated_cost: None,
                    row_count_sum: 0,
                },
            }],
            credit_only: true,
            warnings: vec![],
        };

        assert!(report.window(TimeWindow::OneDay).is_some());
        assert!(report.window(TimeWindow::ThirtyDays).is_none());
    }

    #[test]
    fn test_grouping_default_is_flat() {
        assert_eq!(Grouping::default(), Grouping::Flat);
    }

    #[test]
    fn test_warning_serialization_is_tagged() {
        let warning = ReportWarning::DataQuality {
            source: Source::ComputeQuery,
            reason: DropReason::InvalidCredits,
            dropped: 2,
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"kind\":\"data_quality\""));
        assert!(json.contains("\"dropped\":2"));

        let unavailable = ReportWarning::SourceUnavailable {
            source: Source::SearchUsage,
        };
        let json = serde_json::to_string(&unavailable).unwrap();
        assert!(json.contains("\"kind\":\"source_unavailable\""));
        assert!(json.contains("\"search_usage\""));
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let report = Report {
            anchor: "2026-08-07".to_string(),
            windows: vec![],
            credit_only: false,
            warnings: vec![ReportWarning::PricingUnavailable {
                detail: "account edition unknown".to_string(),
            }],
        };

        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
