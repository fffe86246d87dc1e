//! SQL-over-HTTP statement executor
//!
//! Minimal client for the platform's statements endpoint: one POST per
//! statement, bearer auth, JSON result set in the response body. Session
//! management, token refresh, and retries belong to the embedding
//! application.

use async_trait::async_trait;
use serde_json::Value;

use super::{FetchError, ResultSet, StatementExecutor};

/// Client for the `/api/v2/statements` endpoint
#[derive(Debug, Clone)]
pub struct SqlApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    statement_timeout_secs: u64,
}

impl SqlApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
            statement_timeout_secs: 60,
        }
    }

    /// Override the server-side statement timeout
    pub fn with_statement_timeout(mut self, secs: u64) -> Self {
        self.statement_timeout_secs = secs;
        self
    }

    fn statements_url(&self) -> String {
        format!("{}/api/v2/statements", self.base_url)
    }

    /// Decode a statements-endpoint response body
    ///
    /// Column names come from `resultSetMetaData.rowType`; cells arrive as
    /// strings or nulls, with any other JSON type stringified.
    fn decode_response(body: &Value) -> Result<ResultSet, FetchError> {
        let row_type = body
            .pointer("/resultSetMetaData/rowType")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::Decode("missing resultSetMetaData.rowType".to_string()))?;

        let columns = row_type
            .iter()
            .map(|col| {
                col.get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();

        let data = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::Decode("missing data array".to_string()))?;

        let mut rows = Vec::with_capacity(data.len());
        for entry in data {
            let cells = entry
                .as_array()
                .ok_or_else(|| FetchError::Decode("row is not an array".to_string()))?;
            rows.push(
                cells
                    .iter()
                    .map(|cell| match cell {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            );
        }

        Ok(ResultSet { columns, rows })
    }
}

#[async_trait]
impl StatementExecutor for SqlApiClient {
    async fn execute(&self, sql: &str) -> Result<ResultSet, FetchError> {
        tracing::debug!("executing statement against {}", self.statements_url());

        let response = self
            .http
            .post(self.statements_url())
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "statement": sql,
                "timeout": self.statement_timeout_secs,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail: String = body.chars().take(200).collect();
            return Err(FetchError::Api(format!("{}: {}", status, detail)));
        }

        let body: Value = response.json().await?;
        Self::decode_response(&body)
    }
}
