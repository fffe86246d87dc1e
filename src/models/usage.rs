//! Usage observation types
//!
//! Raw rows handed over by the source adapters, one observation per row.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Metric source a usage row was observed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Warehouse compute for agent-tagged queries
    ComputeQuery,
    /// Per-query credit attribution
    AttributedCredit,
    /// Text-to-SQL generation usage
    AnalystUsage,
    /// Search service consumption
    SearchUsage,
}

impl Source {
    /// All sources in report order
    pub const ALL: [Source; 4] = [
        Source::ComputeQuery,
        Source::AttributedCredit,
        Source::AnalystUsage,
        Source::SearchUsage,
    ];

    /// Human-readable label for tables and chart legends
    pub fn label(&self) -> &'static str {
        match self {
            Source::ComputeQuery => "Warehouse Compute",
            Source::AttributedCredit => "Attributed Credits",
            Source::AnalystUsage => "Cortex Analyst",
            Source::SearchUsage => "Cortex Search",
        }
    }
}

/// One usage observation from a source
///
/// The timestamp is kept as the raw adapter string; validation and date
/// normalization happen at ingest time so malformed rows can be counted
/// instead of panicking the decode path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRow {
    pub source: Source,
    /// Observation instant, ISO-8601 or plain `YYYY-MM-DD` (UTC)
    pub timestamp: String,
    /// Credits consumed, expected non-negative
    pub credits: f64,
    /// Warehouse, service, or user the row is attributed to
    pub entity_id: Option<String>,
    /// Query or request count carried by the row
    pub row_count: Option<u64>,
}

impl UsageRow {
    /// Create a row with no entity or count attribution
    pub fn new(source: Source, timestamp: impl Into<String>, credits: f64) -> Self {
        Self {
            source,
            timestamp: timestamp.into(),
            credits,
            entity_id: None,
            row_count: None,
        }
    }

    /// Attach an entity id (warehouse, service, user)
    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Attach a query/request count
    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = Some(row_count);
        self
    }
}

/// Reporting window anchored to an explicitly supplied date
///
/// The covered range is inclusive on both ends: `[anchor - N days, anchor]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    OneDay,
    ThreeDays,
    SevenDays,
    ThirtyDays,
}

impl TimeWindow {
    /// All windows, shortest first
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::OneDay,
        TimeWindow::ThreeDays,
        TimeWindow::SevenDays,
        TimeWindow::ThirtyDays,
    ];

    /// Number of days the window reaches back from its anchor
    pub fn days(&self) -> i64 {
        match self {
            TimeWindow::OneDay => 1,
            TimeWindow::ThreeDays => 3,
            TimeWindow::SevenDays => 7,
            TimeWindow::ThirtyDays => 30,
        }
    }

    /// Short label for tabs and export filenames
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::OneDay => "1d",
            TimeWindow::ThreeDays => "3d",
            TimeWindow::SevenDays => "7d",
            TimeWindow::ThirtyDays => "30d",
        }
    }

    /// Resolve a raw day count back to a window
    pub fn from_days(days: i64) -> Option<TimeWindow> {
        match days {
            1 => Some(TimeWindow::OneDay),
            3 => Some(TimeWindow::ThreeDays),
            7 => Some(TimeWindow::SevenDays),
            30 => Some(TimeWindow::ThirtyDays),
            _ => None,
        }
    }

    /// First covered date for the given anchor
    pub fn start(&self, anchor: NaiveDate) -> NaiveDate {
        anchor - Duration::days(self.days())
    }

    /// Whether a date falls inside the window (inclusive bounds)
    pub fn contains(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        date >= self.start(anchor) && date <= anchor
    }
}
