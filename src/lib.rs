//! Snowscope - cost reporting backend for Snowflake Intelligence
//!
//! This library turns platform usage rows into normalized cost reports.
//! It handles:
//! - Concurrent fetching of the usage sources over the SQL statements API
//! - Validation and time-window aggregation of usage rows
//! - Edition-aware credit-to-USD conversion
//! - Agent tool inventory and search-service attribution
//! - CSV/JSON export of finished reports
//!
//! The embedding presentation layer (tabs, toggles, charts) stays outside
//! this crate; it consumes the serializable [`models::Report`] structure.

pub mod adapters;
pub mod aggregate;
pub mod agents;
pub mod export;
pub mod format;
pub mod models;
pub mod pricing;
pub mod requests;

pub use aggregate::{GroupingConfig, ReportConfig, UsageAggregator};
pub use models::{Report, ReportWarning, Source, TimeWindow, UsageRow};
pub use pricing::{Edition, EditionPricing, PricingMode};

/// Error type for report building and export
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Fetch error: {0}")]
    Fetch(#[from] adapters::FetchError),

    #[error("Invalid report configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Initialize logging for embedding applications
///
/// Call once at startup; library code only emits `tracing` events and never
/// installs a subscriber on its own.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
}
