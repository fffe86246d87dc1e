//! Analyst request log summaries
//!
//! The request log is the qualitative side of the dashboard: which
//! questions were asked, against which semantic models, by whom. Only
//! counting happens here; credits for these requests are accounted by the
//! usage sources.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::adapters::ResultSet;

/// One entry from the analyst request log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub timestamp: String,
    pub semantic_model: Option<String>,
    pub user: Option<String>,
    pub question: Option<String>,
    pub feedback: Option<String>,
}

impl RequestRecord {
    /// Decode the request-log result set
    pub fn from_result_set(result_set: &ResultSet) -> Vec<RequestRecord> {
        let mut out = Vec::with_capacity(result_set.len());
        for i in 0..result_set.len() {
            out.push(RequestRecord {
                timestamp: result_set.cell(i, "timestamp").unwrap_or("").to_string(),
                semantic_model: result_set.cell(i, "semantic_model_name").map(str::to_string),
                user: result_set.cell(i, "user_name").map(str::to_string),
                question: result_set.cell(i, "latest_question").map(str::to_string),
                feedback: result_set.cell(i, "feedback").map(str::to_string),
            });
        }
        out
    }
}

/// Request counts per semantic model, most-used first
pub fn count_by_model(records: &[RequestRecord]) -> Vec<(String, u64)> {
    count_by(records, |r| r.semantic_model.as_deref())
}

/// Request counts per user, most-active first
pub fn count_by_user(records: &[RequestRecord]) -> Vec<(String, u64)> {
    count_by(records, |r| r.user.as_deref())
}

fn count_by<F>(records: &[RequestRecord], key: F) -> Vec<(String, u64)>
where
    F: Fn(&RequestRecord) -> Option<&str>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *counts.entry(k.to_string()).or_insert(0) += 1;
        }
    }

    let mut out: Vec<(String, u64)> = counts.into_iter().collect();
    // Count descending, name ascending as the tie-break
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(model: Option<&str>, user: Option<&str>) -> RequestRecord {
        RequestRecord {
            timestamp: "2026-08-07T10:00:00Z".to_string(),
            semantic_model: model.map(str::to_string),
            user: user.map(str::to_string),
            question: None,
            feedback: None,
        }
    }

    #[test]
    fn test_count_by_model_orders_by_count_then_name() {
        let records = vec![
            record(Some("REVENUE"), Some("amy")),
            record(Some("REVENUE"), Some("bo")),
            record(Some("CHURN"), Some("amy")),
            record(Some("ADOPTION"), Some("bo")),
            record(Some("CHURN"), Some("cam")),
            record(None, Some("amy")), // no model attribution
        ];

        let counts = count_by_model(&records);
        assert_eq!(
            counts,
            vec![
                ("CHURN".to_string(), 2),
                ("REVENUE".to_string(), 2),
                ("ADOPTION".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_count_by_user() {
        let records = vec![
            record(Some("REVENUE"), Some("amy")),
            record(Some("CHURN"), Some("amy")),
            record(Some("CHURN"), Some("bo")),
            record(Some("CHURN"), None),
        ];

        let counts = count_by_user(&records);
        assert_eq!(counts, vec![("amy".to_string(), 2), ("bo".to_string(), 1)]);
    }

    #[test]
    fn test_empty_records() {
        assert!(count_by_model(&[]).is_empty());
        assert!(count_by_user(&[]).is_empty());
    }

    #[test]
    fn test_from_result_set() {
        let rs = ResultSet {
            columns: vec![
                "TIMESTAMP".to_string(),
                "SEMANTIC_MODEL_NAME".to_string(),
                "USER_NAME".to_string(),
                "LATEST_QUESTION".to_string(),
                "FEEDBACK".to_string(),
            ],
            rows: vec![vec![
                Some("2026-08-07T09:15:00Z".to_string()),
                Some("REVENUE".to_string()),
                Some("amy".to_string()),
                Some("total revenue by region?".to_string()),
                None,
            ]],
        };

        let records = RequestRecord::from_result_set(&rs);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].semantic_model.as_deref(), Some("REVENUE"));
        assert_eq!(records[0].user.as_deref(), Some("amy"));
        assert_eq!(records[0].question.as_deref(), Some("total revenue by region?"));
        assert_eq!(records[0].feedback, None);
    }
}
