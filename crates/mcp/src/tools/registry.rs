// Tool trait, registry and schema helpers

use crate::protocol::{CallToolResult, ToolSchema};
use anyhow::Result;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, arguments: Value) -> Result<CallToolResult>;

    /// API family the tool belongs to
    fn category(&self) -> ToolCategory;
}

/// Vendor API family, used for grouping in logs and listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolCategory {
    /// Geocoding, verification, autocomplete, parsing
    Addressing,
    /// Data graph property, risk and demographic reports
    DataGraph,
    /// Tax jurisdictions
    GeoTax,
    /// PSAP / AHJ contacts
    Emergency,
    /// IP and Wi-Fi geolocation
    Geolocation,
    /// E-mail, phone and name checks
    Identity,
    Timezone,
    /// Routes and travel cost matrices
    Routing,
    /// Intersections and speed limits
    Streets,
    /// Crime risk and hazard history by location
    Risk,
    /// Checks that never leave the process
    Local,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Addressing => "addressing",
            ToolCategory::DataGraph => "data_graph",
            ToolCategory::GeoTax => "geo_tax",
            ToolCategory::Emergency => "emergency",
            ToolCategory::Geolocation => "geolocation",
            ToolCategory::Identity => "identity",
            ToolCategory::Timezone => "timezone",
            ToolCategory::Routing => "routing",
            ToolCategory::Streets => "streets",
            ToolCategory::Risk => "risk",
            ToolCategory::Local => "local",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool. A tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        if self.tools.insert(schema.name.clone(), tool).is_some() {
            tracing::warn!(tool = %schema.name, "Tool registered twice, keeping the latest");
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// All tool schemas, ordered by name
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Tool counts per category
    pub fn category_counts(&self) -> BTreeMap<ToolCategory, usize> {
        let mut counts = BTreeMap::new();
        for tool in self.tools.values() {
            *counts.entry(tool.category()).or_insert(0) += 1;
        }
        counts
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_string_default(description: &str, default: &str) -> Value {
    json!({
        "type": "string",
        "description": description,
        "default": default
    })
}

pub fn json_schema_enum(description: &str, values: &[&str]) -> Value {
    json!({
        "type": "string",
        "description": description,
        "enum": values
    })
}

pub fn json_schema_number(description: &str) -> Value {
    json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_integer(description: &str, minimum: i64, maximum: i64) -> Value {
    json!({
        "type": "integer",
        "description": description,
        "minimum": minimum,
        "maximum": maximum
    })
}

/// Free-form JSON object passed through to the vendor.
pub fn json_schema_any_object(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description
    })
}

pub fn json_schema_array(items: Value, description: &str) -> Value {
    json!({
        "type": "array",
        "items": items,
        "description": description
    })
}
