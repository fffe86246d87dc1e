//! Display formatting for credits and estimated cost
//!
//! Credit figures span several orders of magnitude (a single search call is
//! fractions of a millicredit, a month of warehouse compute is hundreds),
//! so precision scales with magnitude.

use serde::{Deserialize, Serialize};

use crate::models::report::CostBucket;

/// What the presentation layer renders for each figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Credits,
    EstimatedCost,
}

/// Format a credit total for display
pub fn format_credits(credits: f64) -> String {
    if credits == 0.0 {
        "0.000".to_string()
    } else if credits < 0.001 {
        format!("{:.6}", credits)
    } else if credits < 1.0 {
        format!("{:.3}", credits)
    } else {
        format!("{:.2}", credits)
    }
}

/// Format an estimated USD cost for display
pub fn format_cost(cost: f64) -> String {
    if cost == 0.0 {
        "$0.00".to_string()
    } else if cost < 0.01 {
        format!("${:.4}", cost)
    } else {
        format!("${:.2}", cost)
    }
}

/// Render one bucket figure in the selected mode
///
/// Credit-only reports have no cost figure; "n/a" keeps the table cell
/// honest instead of silently showing credits under a cost header.
pub fn bucket_display_value(bucket: &CostBucket, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Credits => format_credits(bucket.total_credits),
        DisplayMode::EstimatedCost => match bucket.estimated_cost {
            Some(cost) => format_cost(cost),
            None => "n/a".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::usage::{Source, TimeWindow};

    #[test]
    fn test_format_credits_thresholds() {
        assert_eq!(format_credits(0.0), "0.000");
        assert_eq!(format_credits(0.0000005), "0.000001");
        assert_eq!(format_credits(0.000432), "0.000432");
        assert_eq!(format_credits(0.25), "0.250");
        assert_eq!(format_credits(1.0), "1.00");
        assert_eq!(format_credits(123.456), "123.46");
    }

    #[test]
    fn test_format_cost_thresholds() {
        assert_eq!(format_cost(0.0), "$0.00");
        assert_eq!(format_cost(0.0042), "$0.0042");
        assert_eq!(format_cost(0.01), "$0.01");
        assert_eq!(format_cost(12.5), "$12.50");
    }

    #[test]
    fn test_bucket_display_value() {
        let mut bucket = CostBucket::zero(Source::AnalystUsage, TimeWindow::OneDay);
        bucket.total_credits = 0.5;
        bucket.estimated_cost = Some(1.3);

        assert_eq!(bucket_display_value(&bucket, DisplayMode::Credits), "0.500");
        assert_eq!(bucket_display_value(&bucket, DisplayMode::EstimatedCost), "$1.30");
    }

    #[test]
    fn test_bucket_display_value_credit_only() {
        let mut bucket = CostBucket::zero(Source::SearchUsage, TimeWindow::SevenDays);
        bucket.total_credits = 2.0;
        bucket.estimated_cost = None;

        assert_eq!(bucket_display_value(&bucket, DisplayMode::EstimatedCost), "n/a");
        assert_eq!(bucket_display_value(&bucket, DisplayMode::Credits), "2.00");
    }
}
