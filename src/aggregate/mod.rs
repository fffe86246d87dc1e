//! Usage aggregation
//!
//! The core of the crate: turns raw usage rows into a cost report through
//! time-window filtering, per-source summation, optional per-entity
//! grouping, and edition-aware currency conversion.
//!
//! The aggregator is an explicit, stateless function pair — `ingest` then
//! `build_report` — taking every input as a parameter (including the window
//! anchor), so a report is a pure function of its inputs and repeated builds
//! are identical.

pub mod dates;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::report::{
    CostBucket, DropReason, Grouping, Report, ReportWarning, WindowReport, WindowTotal,
};
use crate::models::usage::{Source, TimeWindow, UsageRow};
use crate::pricing::PricingMode;
use crate::Error;

/// Configuration for one report build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Windows to report on; must not be empty
    pub windows: Vec<TimeWindow>,
    #[serde(default)]
    pub grouping: GroupingConfig,
    pub pricing: PricingMode,
}

impl ReportConfig {
    /// Flat grouping for every section
    pub fn flat(windows: Vec<TimeWindow>, pricing: PricingMode) -> Self {
        Self {
            windows,
            grouping: GroupingConfig::default(),
            pricing,
        }
    }
}

/// Per-section grouping selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingConfig {
    #[serde(default)]
    pub compute_query: Grouping,
    #[serde(default)]
    pub attributed_credit: Grouping,
    #[serde(default)]
    pub analyst_usage: Grouping,
    #[serde(default)]
    pub search_usage: Grouping,
}

impl GroupingConfig {
    /// The same grouping for every section
    pub fn uniform(grouping: Grouping) -> Self {
        Self {
            compute_query: grouping,
            attributed_credit: grouping,
            analyst_usage: grouping,
            search_usage: grouping,
        }
    }

    pub fn for_source(&self, source: Source) -> Grouping {
        match source {
            Source::ComputeQuery => self.compute_query,
            Source::AttributedCredit => self.attributed_credit,
            Source::AnalystUsage => self.analyst_usage,
            Source::SearchUsage => self.search_usage,
        }
    }
}

/// A row that survived ingest validation
#[derive(Debug, Clone)]
struct NormalizedRow {
    date: NaiveDate,
    credits: f64,
    entity_id: Option<String>,
    row_count: u64,
}

/// Aggregates usage rows into time-windowed cost reports
///
/// Rows live here for the duration of one dashboard refresh; the aggregator
/// holds no connection, clock, or cache. No deduplication is performed: if
/// two adapters supply overlapping data (per-query compute attribution can
/// overlap analyst usage for the same request), both rows count, and netting
/// that out is the caller's responsibility.
#[derive(Debug)]
pub struct UsageAggregator {
    anchor: NaiveDate,
    rows: BTreeMap<Source, Vec<NormalizedRow>>,
    dropped: BTreeMap<(Source, DropReason), u64>,
    unavailable: BTreeSet<Source>,
}

impl UsageAggregator {
    /// Create an aggregator anchored to the given report date
    ///
    /// The anchor is passed in explicitly; the aggregator never reads the
    /// clock, so identical inputs produce identical reports.
    pub fn new(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            rows: BTreeMap::new(),
            dropped: BTreeMap::new(),
            unavailable: BTreeSet::new(),
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Ingest rows from any mix of sources, in any order
    ///
    /// Rows with negative or non-finite credits, or with timestamps that do
    /// not reduce to a valid date, are dropped and counted toward the
    /// report's data-quality warnings. Nothing here is fatal.
    pub fn ingest<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = UsageRow>,
    {
        let mut batch_dropped = 0u64;

        for row in rows {
            if !row.credits.is_finite() || row.credits < 0.0 {
                *self
                    .dropped
                    .entry((row.source, DropReason::InvalidCredits))
                    .or_insert(0) += 1;
                batch_dropped += 1;
                continue;
            }

            let date = match dates::extract_date(&row.timestamp) {
                Some(date) => date,
                None => {
                    *self
                        .dropped
                        .entry((row.source, DropReason::BadTimestamp))
                        .or_insert(0) += 1;
                    batch_dropped += 1;
                    continue;
                }
            };

            self.rows.entry(row.source).or_default().push(NormalizedRow {
                date,
                credits: row.credits,
                entity_id: row.entity_id,
                row_count: row.row_count.unwrap_or(0),
            });
        }

        if batch_dropped > 0 {
            tracing::warn!("dropped {} malformed usage rows during ingest", batch_dropped);
        }
    }

    /// Record that an adapter returned nothing for a source
    ///
    /// The source still appears in the report with zero-filled buckets, and
    /// a `SourceUnavailable` warning is attached instead of failing the
    /// whole report.
    pub fn mark_source_unavailable(&mut self, source: Source) {
        self.unavailable.insert(source);
    }

    /// Total rows dropped by ingest validation so far
    pub fn dropped_row_count(&self) -> u64 {
        self.dropped.values().sum()
    }

    /// Rows accepted for a source so far
    pub fn row_count(&self, source: Source) -> usize {
        self.rows.get(&source).map_or(0, Vec::len)
    }

    /// Build the report for the configured windows and pricing
    ///
    /// Empty input produces all-zero buckets, never an error; the only
    /// failure is a caller contract violation (no windows requested).
    pub fn build_report(&self, config: &ReportConfig) -> Result<Report, Error> {
        if config.windows.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one time window is required".to_string(),
            ));
        }

        let rate = config.pricing.rate();
        let mut warnings = Vec::new();

        for ((source, reason), dropped) in &self.dropped {
            warnings.push(ReportWarning::DataQuality {
                source: *source,
                reason: *reason,
                dropped: *dropped,
            });
        }

        match &config.pricing {
            PricingMode::Known(pricing) if !pricing.is_valid() => {
                tracing::warn!(
                    "invalid rate {} for {} edition, report degraded to credit-only",
                    pricing.rate_per_credit,
                    pricing.edition.label()
                );
                warnings.push(ReportWarning::PricingUnavailable {
                    detail: format!(
                        "invalid rate {} for {} edition",
                        pricing.rate_per_credit,
                        pricing.edition.label()
                    ),
                });
            }
            PricingMode::Unknown => {
                warnings.push(ReportWarning::PricingUnavailable {
                    detail: "account edition unknown".to_string(),
                });
            }
            PricingMode::Known(_) => {}
        }

        for source in &self.unavailable {
            warnings.push(ReportWarning::SourceUnavailable { source: *source });
        }

        let mut windows = config.windows.clone();
        windows.sort();
        windows.dedup();

        let window_reports = windows
            .iter()
            .map(|&window| self.build_window(window, config, rate))
            .collect();

        Ok(Report {
            anchor: dates::format_date(self.anchor),
            windows: window_reports,
            credit_only: rate.is_none(),
            warnings,
        })
    }

    fn build_window(&self, window: TimeWindow, config: &ReportConfig, rate: Option<f64>) -> WindowReport {
        let start = window.start(self.anchor);
        let mut buckets = Vec::new();

        for source in Source::ALL {
            let empty = Vec::new();
            let rows = self.rows.get(&source).unwrap_or(&empty);
            let in_window = rows.iter().filter(|r| r.date >= start && r.date <= self.anchor);

            match config.grouping.for_source(source) {
                Grouping::Flat => {
                    let mut total_credits = 0.0;
                    let mut row_count_sum = 0u64;
                    for row in in_window {
                        total_credits += row.credits;
                        row_count_sum += row.row_count;
                    }
                    buckets.push(CostBucket {
                        source,
                        window,
                        entity_id: None,
                        total_credits,
                        estimated_cost: rate.map(|r| total_credits * r),
                        row_count_sum,
                    });
                }
                Grouping::ByEntity => {
                    // BTreeMap keeps the entity order deterministic
                    let mut by_entity: BTreeMap<Option<String>, (f64, u64)> = BTreeMap::new();
                    for row in in_window {
                        let slot = by_entity.entry(row.entity_id.clone()).or_insert((0.0, 0));
                        slot.0 += row.credits;
                        slot.1 += row.row_count;
                    }

                    if by_entity.is_empty() {
                        // A grouped section with no rows still shows up
                        buckets.push(CostBucket {
                            source,
                            window,
                            entity_id: None,
                            total_credits: 0.0,
                            estimated_cost: rate.map(|_| 0.0),
                            row_count_sum: 0,
                        });
                    } else {
                        for (entity_id, (total_credits, row_count_sum)) in by_entity {
                            buckets.push(CostBucket {
                                source,
                                window,
                                entity_id,
                                total_credits,
                                estimated_cost: rate.map(|r| total_credits * r),
                                row_count_sum,
                            });
                        }
                    }
                }
            }
        }

        // The grand total is the arithmetic sum of the emitted buckets, not
        // a second pass over the rows; sources are never weighted or scaled
        // before summing.
        let total_credits: f64 = buckets.iter().map(|b| b.total_credits).sum();
        let row_count_sum: u64 = buckets.iter().map(|b| b.row_count_sum).sum();

        WindowReport {
            window,
            buckets,
            grand_total: WindowTotal {
                window,
                total_credits,
                estimated_cost: rate.map(|r| total_credits * r),
                row_count_sum,
            },
        }
    }
}
