// Time zone offsets for addresses and points

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{check_lon_lat, parse_args};
use crate::tools::envelope::respond;
use crate::tools::{json_schema_any_object, json_schema_object, Tool, ToolCategory};
use anyhow::Result;
use locintel_sdk::{LocintelClient, LocintelResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezoneKind {
    Addresses,
    Locations,
}

pub struct TimezoneTool {
    client: LocintelClient,
    kind: TimezoneKind,
}

impl TimezoneTool {
    pub fn new(client: LocintelClient, kind: TimezoneKind) -> Self {
        Self { client, kind }
    }

    fn name(&self) -> &'static str {
        match self.kind {
            TimezoneKind::Addresses => "timezone_addresses",
            TimezoneKind::Locations => "timezone_locations",
        }
    }

    async fn run(&self, data: Map<String, Value>) -> LocintelResult<Value> {
        let api = self.client.timezone();
        match self.kind {
            TimezoneKind::Addresses => api.by_addresses(Value::Object(data)).await,
            TimezoneKind::Locations => {
                let points = data.get("locations").and_then(Value::as_array);
                for entry in points.into_iter().flatten() {
                    check_lon_lat(entry.pointer("/geometry/coordinates"))?;
                }
                api.by_locations(Value::Object(data)).await
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimezoneArgs {
    data: Map<String, Value>,
}

#[async_trait::async_trait]
impl Tool for TimezoneTool {
    fn schema(&self) -> ToolSchema {
        let description = match self.kind {
            TimezoneKind::Addresses => "Get timezone for addresses. Missing timestamps default to now. Example: {'data': {'addresses': [{'timestamp': 1691138974831, 'address': {'id': '1', 'addressLines': ['1700 District Ave, Burlington, MA'], 'country': 'USA'}}]}}",
            TimezoneKind::Locations => "Get timezone for coordinates. Missing timestamps default to now. Example: {'data': {'locations': [{'id': '1', 'timestamp': 1691138974831, 'geometry': {'coordinates': [-71.0589, 42.3601]}}]}}",
        };
        ToolSchema {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(
                json!({"data": json_schema_any_object("Request body with an addresses or locations array")}),
                vec!["data"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: TimezoneArgs = parse_args(self.name(), arguments)?;
        Ok(respond(self.run(args.data).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Timezone
    }
}
