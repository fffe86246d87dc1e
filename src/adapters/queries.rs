//! SQL statements for the platform usage views
//!
//! The day parameter is inlined into the statement text; the strings are
//! opaque to the aggregator, which only ever sees decoded rows. Every
//! statement groups by day so each row carries the usage date the
//! aggregator buckets on.

/// Account edition lookup
pub const EDITION_SQL: &str = "\
SELECT edition
FROM SNOWFLAKE.ORGANIZATION_USAGE.ACCOUNTS
WHERE account_name = CURRENT_ACCOUNT_NAME()";

/// Warehouse compute for agent-tagged queries, per day and warehouse
///
/// Narrows to warehouses with agent activity first so the attribution join
/// runs over a small result set.
pub fn warehouse_costs_sql(days: u32) -> String {
    format!(
        "\
WITH agent_warehouses AS (
  SELECT DISTINCT warehouse_name
  FROM snowflake.account_usage.query_history
  WHERE start_time >= DATEADD(DAY, -{days}, CURRENT_DATE)
    AND warehouse_name IS NOT NULL
    AND query_tag IN ('cortex-agent', 'snowflake-intelligence')
), agent_queries AS (
  SELECT
    query_id,
    warehouse_name,
    DATE(start_time) AS usage_date
  FROM snowflake.account_usage.query_history
  WHERE start_time >= DATEADD(DAY, -{days}, CURRENT_DATE)
    AND warehouse_name IN (SELECT warehouse_name FROM agent_warehouses)
    AND query_tag IN ('cortex-agent', 'snowflake-intelligence')
)
SELECT
  aq.usage_date,
  aq.warehouse_name,
  COUNT(*) AS query_count,
  SUM(COALESCE(qa.credits_attributed_compute, 0)
      + COALESCE(qa.credits_used_query_acceleration, 0)) AS total_credits
FROM agent_queries aq
INNER JOIN snowflake.account_usage.query_attribution_history qa
  ON aq.query_id = qa.query_id
GROUP BY aq.usage_date, aq.warehouse_name
ORDER BY aq.usage_date DESC, aq.warehouse_name"
    )
}

/// Per-query credit attribution for agent-tagged queries, per day and warehouse
pub fn attributed_credits_sql(days: u32) -> String {
    format!(
        "\
SELECT
  DATE(qa.start_time) AS usage_date,
  qa.warehouse_name,
  COUNT(*) AS query_count,
  SUM(COALESCE(qa.credits_attributed_compute, 0)) AS attributed_credits
FROM snowflake.account_usage.query_attribution_history qa
WHERE qa.start_time >= DATEADD(DAY, -{days}, CURRENT_DATE)
  AND qa.query_tag IN ('cortex-agent', 'snowflake-intelligence')
GROUP BY DATE(qa.start_time), qa.warehouse_name
ORDER BY usage_date DESC, qa.warehouse_name"
    )
}

/// Text-to-SQL generation usage, per day and user
pub fn analyst_usage_sql(days: u32) -> String {
    format!(
        "\
SELECT
  DATE(start_time) AS usage_date,
  username,
  SUM(request_count) AS request_count,
  SUM(credits) AS credits
FROM SNOWFLAKE.ACCOUNT_USAGE.CORTEX_ANALYST_USAGE_HISTORY
WHERE start_time >= DATEADD(DAY, -{days}, CURRENT_DATE)
GROUP BY DATE(start_time), username
ORDER BY usage_date DESC"
    )
}

/// Search service consumption, per day and service
pub fn search_usage_sql(days: u32) -> String {
    format!(
        "\
SELECT
  usage_date,
  service_name,
  SUM(credits) AS credits
FROM SNOWFLAKE.ACCOUNT_USAGE.CORTEX_SEARCH_DAILY_USAGE_HISTORY
WHERE usage_date >= DATEADD(DAY, -{days}, CURRENT_DATE)
GROUP BY usage_date, service_name
ORDER BY usage_date DESC, credits DESC"
    )
}

/// Recent analyst request log, bounded
pub fn analyst_requests_sql(days: u32) -> String {
    format!(
        "\
SELECT
  timestamp,
  semantic_model_name,
  user_name,
  latest_question,
  feedback
FROM snowflake.local.CORTEX_ANALYST_REQUESTS_V
WHERE timestamp >= DATEADD(DAY, -{days}, CURRENT_DATE)
ORDER BY timestamp DESC
LIMIT 1000"
    )
}
