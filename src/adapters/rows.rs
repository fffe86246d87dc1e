//! Result-set decoding
//!
//! Maps the columns of each usage view onto `UsageRow`. Decoding is
//! deliberately tolerant: missing or unparsable numeric cells become NaN so
//! the row flows through ingest's data-quality accounting instead of this
//! layer guessing zero.

use super::ResultSet;
use crate::models::usage::{Source, UsageRow};

/// Warehouse compute rows: date, warehouse, query count, credits
pub fn decode_compute(result_set: &ResultSet) -> Vec<UsageRow> {
    decode_usage(
        result_set,
        Source::ComputeQuery,
        Columns {
            date: "usage_date",
            credits: "total_credits",
            entity: Some("warehouse_name"),
            count: Some("query_count"),
        },
    )
}

/// Per-query attribution rows: date, warehouse, query count, credits
pub fn decode_attributed(result_set: &ResultSet) -> Vec<UsageRow> {
    decode_usage(
        result_set,
        Source::AttributedCredit,
        Columns {
            date: "usage_date",
            credits: "attributed_credits",
            entity: Some("warehouse_name"),
            count: Some("query_count"),
        },
    )
}

/// Analyst usage rows: date, user, request count, credits
pub fn decode_analyst(result_set: &ResultSet) -> Vec<UsageRow> {
    decode_usage(
        result_set,
        Source::AnalystUsage,
        Columns {
            date: "usage_date",
            credits: "credits",
            entity: Some("username"),
            count: Some("request_count"),
        },
    )
}

/// Search usage rows: date, service, credits
pub fn decode_search(result_set: &ResultSet) -> Vec<UsageRow> {
    decode_usage(
        result_set,
        Source::SearchUsage,
        Columns {
            date: "usage_date",
            credits: "credits",
            entity: Some("service_name"),
            count: None,
        },
    )
}

/// Edition tag from the account lookup, first row wins
pub fn decode_edition(result_set: &ResultSet) -> Option<String> {
    result_set.cell(0, "edition").map(str::to_string)
}

struct Columns {
    date: &'static str,
    credits: &'static str,
    entity: Option<&'static str>,
    count: Option<&'static str>,
}

fn decode_usage(result_set: &ResultSet, source: Source, columns: Columns) -> Vec<UsageRow> {
    let mut out = Vec::with_capacity(result_set.len());

    for i in 0..result_set.len() {
        let timestamp = result_set.cell(i, columns.date).unwrap_or("").to_string();
        let credits = result_set
            .cell(i, columns.credits)
            .map(|c| c.trim().parse::<f64>().unwrap_or(f64::NAN))
            .unwrap_or(f64::NAN);

        let mut row = UsageRow::new(source, timestamp, credits);
        if let Some(col) = columns.entity {
            if let Some(entity) = result_set.cell(i, col) {
                row = row.with_entity(entity);
            }
        }
        if let Some(col) = columns.count {
            if let Some(count) = result_set.cell(i, col).and_then(|c| c.trim().parse::<u64>().ok()) {
                row = row.with_row_count(count);
            }
        }
        out.push(row);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_set(columns: &[&str], rows: &[&[Option<&str>]]) -> ResultSet {
        ResultSet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        }
    }

    #[test]
    fn test_decode_compute() {
        let rs = result_set(
            &["USAGE_DATE", "WAREHOUSE_NAME", "QUERY_COUNT", "TOTAL_CREDITS"],
            &[
                &[Some("2026-08-07"), Some("ETL_WH"), Some("4"), Some("1.5")],
                &[Some("2026-08-06"), Some("BI_WH"), Some("2"), Some("0.75")],
            ],
        );

        let rows = decode_compute(&rs);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source, Source::ComputeQuery);
        assert_eq!(rows[0].timestamp, "2026-08-07");
        assert_eq!(rows[0].entity_id.as_deref(), Some("ETL_WH"));
        assert_eq!(rows[0].row_count, Some(4));
        assert!((rows[0].credits - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_decode_attributed_uses_attribution_column() {
        let rs = result_set(
            &["USAGE_DATE", "WAREHOUSE_NAME", "QUERY_COUNT", "ATTRIBUTED_CREDITS"],
            &[&[Some("2026-08-07"), Some("ETL_WH"), Some("4"), Some("1.25")]],
        );

        let rows = decode_attributed(&rs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].source, Source::AttributedCredit);
        assert!((rows[0].credits - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_decode_analyst_attributes_to_user() {
        let rs = result_set(
            &["USAGE_DATE", "USERNAME", "REQUEST_COUNT", "CREDITS"],
            &[&[Some("2026-08-05"), Some("ANALYST_1"), Some("12"), Some("0.36")]],
        );

        let rows = decode_analyst(&rs);
        assert_eq!(rows[0].source, Source::AnalystUsage);
        assert_eq!(rows[0].entity_id.as_deref(), Some("ANALYST_1"));
        assert_eq!(rows[0].row_count, Some(12));
    }

    #[test]
    fn test_decode_search_has_no_count_column() {
        let rs = result_set(
            &["USAGE_DATE", "SERVICE_NAME", "CREDITS"],
            &[&[Some("2026-08-07"), Some("SALES_DOCS"), Some("0.2")]],
        );

        let rows = decode_search(&rs);
        assert_eq!(rows[0].source, Source::SearchUsage);
        assert_eq!(rows[0].entity_id.as_deref(), Some("SALES_DOCS"));
        assert_eq!(rows[0].row_count, None);
    }

    #[test]
    fn test_null_and_garbage_credits_become_nan() {
        let rs = result_set(
            &["USAGE_DATE", "SERVICE_NAME", "CREDITS"],
            &[
                &[Some("2026-08-07"), Some("A"), None],
                &[Some("2026-08-07"), Some("B"), Some("not-a-number")],
            ],
        );

        let rows = decode_search(&rs);
        assert!(rows[0].credits.is_nan());
        assert!(rows[1].credits.is_nan());
    }

    #[test]
    fn test_null_entity_and_count_stay_none() {
        let rs = result_set(
            &["USAGE_DATE", "WAREHOUSE_NAME", "QUERY_COUNT", "TOTAL_CREDITS"],
            &[&[Some("2026-08-07"), None, None, Some("1.0")]],
        );

        let rows = decode_compute(&rs);
        assert_eq!(rows[0].entity_id, None);
        assert_eq!(rows[0].row_count, None);
    }

    #[test]
    fn test_decode_edition() {
        let rs = result_set(&["EDITION"], &[&[Some("BUSINESS_CRITICAL")]]);
        assert_eq!(decode_edition(&rs).as_deref(), Some("BUSINESS_CRITICAL"));

        let empty = result_set(&["EDITION"], &[]);
        assert_eq!(decode_edition(&empty), None);
    }

    #[test]
    fn test_empty_result_set_decodes_to_no_rows() {
        let rs = result_set(&["USAGE_DATE", "SERVICE_NAME", "CREDITS"], &[]);
        assert!(decode_search(&rs).is_empty());
    }
}
