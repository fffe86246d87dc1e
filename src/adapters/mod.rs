//! Source adapters
//!
//! Everything that turns executed statements into usage rows:
//! - The SQL text for the platform usage views
//! - A transport seam (`StatementExecutor`) with an HTTP implementation
//! - Per-source result-set decoding
//! - The concurrent fetch pass joining all sources before aggregation
//!
//! The aggregator never learns how rows were obtained; a failed source
//! degrades to an empty row set instead of blocking the refresh.

pub mod queries;
pub mod rows;
pub mod sql_api;

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::usage::{Source, UsageRow};

/// Transport-level failure while executing a statement
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Statement rejected: {0}")]
    Api(String),

    #[error("Malformed result set: {0}")]
    Decode(String),
}

/// Tabular result of one executed statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    /// Row-major cells; `None` is SQL NULL
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultSet {
    /// Position of a column, matched case-insensitively
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Cell by row index and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Executes one SQL statement against the data platform
///
/// Implementations may go over HTTP, read a fixture file, or serve canned
/// results in tests; the fetch pass only sees the decoded table.
#[async_trait]
pub trait StatementExecutor {
    async fn execute(&self, sql: &str) -> Result<ResultSet, FetchError>;
}

/// Everything the fetch pass produced for one refresh
#[derive(Debug, Default)]
pub struct FetchedUsage {
    pub rows: Vec<UsageRow>,
    /// Raw edition tag from the account view, when the lookup succeeded
    pub edition_tag: Option<String>,
    /// Sources whose statements failed; mark them unavailable on the report
    pub failed_sources: Vec<Source>,
}

/// Fetch every usage source concurrently and decode the results
///
/// The statements run in parallel and are joined before aggregation
/// begins. A failed statement contributes no rows and lands in
/// `failed_sources`. `agent_services`, when provided, narrows search usage
/// to services referenced by agent specs.
pub async fn fetch_usage<E>(
    executor: &E,
    days: u32,
    agent_services: Option<&BTreeSet<String>>,
) -> FetchedUsage
where
    E: StatementExecutor + Sync,
{
    let warehouse_sql = queries::warehouse_costs_sql(days);
    let attributed_sql = queries::attributed_credits_sql(days);
    let analyst_sql = queries::analyst_usage_sql(days);
    let search_sql = queries::search_usage_sql(days);
    let (warehouse, attributed, analyst, search, edition) = futures::join!(
        executor.execute(&warehouse_sql),
        executor.execute(&attributed_sql),
        executor.execute(&analyst_sql),
        executor.execute(&search_sql),
        executor.execute(queries::EDITION_SQL),
    );

    let mut fetched = FetchedUsage::default();

    collect(&mut fetched, Source::ComputeQuery, warehouse, rows::decode_compute);
    collect(&mut fetched, Source::AttributedCredit, attributed, rows::decode_attributed);
    collect(&mut fetched, Source::AnalystUsage, analyst, rows::decode_analyst);

    match search {
        Ok(result_set) => {
            let mut decoded = rows::decode_search(&result_set);
            if let Some(services) = agent_services {
                decoded.retain(|row| {
                    row.entity_id
                        .as_deref()
                        .map_or(false, |entity| services.contains(entity))
                });
            }
            tracing::debug!("{} search usage rows after service filter", decoded.len());
            fetched.rows.extend(decoded);
        }
        Err(e) => {
            tracing::warn!("{} fetch failed: {}", Source::SearchUsage.label(), e);
            fetched.failed_sources.push(Source::SearchUsage);
        }
    }

    match edition {
        Ok(result_set) => fetched.edition_tag = rows::decode_edition(&result_set),
        // Pricing degrades to Unknown downstream; not a source failure
        Err(e) => tracing::warn!("edition lookup failed: {}", e),
    }

    fetched
}

fn collect(
    fetched: &mut FetchedUsage,
    source: Source,
    result: Result<ResultSet, FetchError>,
    decode: fn(&ResultSet) -> Vec<UsageRow>,
) {
    match result {
        Ok(result_set) => {
            tracing::debug!("{} rows fetched for {}", result_set.len(), source.label());
            fetched.rows.extend(decode(&result_set));
        }
        Err(e) => {
            tracing::warn!("{} fetch failed: {}", source.label(), e);
            fetched.failed_sources.push(source);
        }
    }
}
