//! Agent tool inventory
//!
//! Parses the JSON spec attached to each agent into the text-to-SQL tools
//! and search services it is configured with. The resulting service index
//! is what ties search-service consumption back to agents: search usage is
//! only counted when the service is referenced by at least one agent spec.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A text-to-SQL tool configured on an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystTool {
    pub name: String,
    /// Warehouse the generated SQL executes on, when specified
    pub warehouse: Option<String>,
    pub semantic_view: Option<String>,
}

/// A search service referenced by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchServiceRef {
    /// Tool name inside the agent spec
    pub tool_name: String,
    /// Unqualified service name, as the usage views report it
    pub service_name: String,
    /// Fully qualified name from the spec, when present
    pub full_name: Option<String>,
}

/// Tool inventory extracted from one agent spec
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentTools {
    pub analyst_tools: Vec<AnalystTool>,
    pub search_services: Vec<SearchServiceRef>,
}

impl AgentTools {
    /// Parse an agent spec JSON document
    ///
    /// Malformed JSON or an unexpected shape yields an empty inventory; an
    /// agent the dashboard cannot introspect still renders, just without a
    /// tool breakdown.
    pub fn from_spec_json(spec_json: &str) -> AgentTools {
        let spec: Value = match serde_json::from_str(spec_json) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("unparsable agent spec: {}", e);
                return AgentTools::default();
            }
        };
        Self::from_spec(&spec)
    }

    /// Parse an already-decoded agent spec
    pub fn from_spec(spec: &Value) -> AgentTools {
        let mut tools = AgentTools::default();

        let Some(entries) = spec.get("tools").and_then(Value::as_array) else {
            return tools;
        };

        for entry in entries {
            let Some(tool_spec) = entry.get("tool_spec") else {
                continue;
            };
            let tool_type = tool_spec.get("type").and_then(Value::as_str).unwrap_or("");
            let tool_name = tool_spec
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string();
            let resource = spec
                .pointer(&format!("/tool_resources/{}", tool_name.replace('~', "~0").replace('/', "~1")));

            match tool_type {
                "cortex_analyst_text_to_sql" => {
                    let semantic_view = resource
                        .and_then(|r| r.get("semantic_view"))
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    let warehouse = resource
                        .and_then(|r| r.get("execution_environment"))
                        .filter(|env| env.get("type").and_then(Value::as_str) == Some("warehouse"))
                        .and_then(|env| env.get("warehouse"))
                        .and_then(Value::as_str)
                        .map(str::to_string);

                    tools.analyst_tools.push(AnalystTool {
                        name: tool_name,
                        warehouse,
                        semantic_view,
                    });
                }
                "cortex_search" => {
                    let full_name = resource
                        .and_then(|r| r.get("name"))
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    // Usage views report the unqualified service name
                    let service_name = match &full_name {
                        Some(qualified) => qualified
                            .rsplit('.')
                            .next()
                            .unwrap_or(qualified)
                            .to_string(),
                        None => tool_name.clone(),
                    };

                    tools.search_services.push(SearchServiceRef {
                        tool_name,
                        service_name,
                        full_name,
                    });
                }
                _ => {}
            }
        }

        tools
    }

    pub fn is_empty(&self) -> bool {
        self.analyst_tools.is_empty() && self.search_services.is_empty()
    }
}

/// Search service name -> agents referencing it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceIndex {
    map: BTreeMap<String, Vec<String>>,
}

impl ServiceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one agent's tool inventory
    pub fn add_agent(&mut self, agent_name: &str, tools: &AgentTools) {
        for service in &tools.search_services {
            let agents = self.map.entry(service.service_name.clone()).or_default();
            if !agents.iter().any(|a| a == agent_name) {
                agents.push(agent_name.to_string());
            }
        }
    }

    /// The service names used for search-usage filtering
    pub fn service_names(&self) -> BTreeSet<String> {
        self.map.keys().cloned().collect()
    }

    /// Agents referencing a service
    pub fn agents_for(&self, service_name: &str) -> &[String] {
        self.map.get(service_name).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
