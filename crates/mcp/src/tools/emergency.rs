// PSAP (911 answering point) and AHJ lookups

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::{check_lon_lat, parse_args, required};
use crate::tools::envelope::respond;
use crate::tools::{json_schema_any_object, json_schema_object, json_schema_string, Tool, ToolCategory};
use anyhow::Result;
use locintel_core::validate::require_non_empty;
use locintel_sdk::{LocintelClient, LocintelResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};

const EXAMPLE_ADDRESS: &str = "{'addressLines': ['860 White Plains Road'], 'city': 'Trumbull', 'admin1': 'CT', 'postalCode': '06611'}";
const EXAMPLE_LOCATION: &str = "{'coordinates': [-71.0589, 42.3601]}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsapKind {
    Address,
    Location,
    AhjAddress,
    AhjLocation,
}

impl PsapKind {
    pub const ALL: [PsapKind; 4] = [
        PsapKind::Address,
        PsapKind::Location,
        PsapKind::AhjAddress,
        PsapKind::AhjLocation,
    ];

    fn tool_name(&self) -> &'static str {
        match self {
            PsapKind::Address => "psap_address",
            PsapKind::Location => "psap_location",
            PsapKind::AhjAddress => "psap_ahj_address",
            PsapKind::AhjLocation => "psap_ahj_location",
        }
    }

    fn by_location(&self) -> bool {
        matches!(self, PsapKind::Location | PsapKind::AhjLocation)
    }
}

pub struct PsapTool {
    client: LocintelClient,
    kind: PsapKind,
}

impl PsapTool {
    pub fn new(client: LocintelClient, kind: PsapKind) -> Self {
        Self { client, kind }
    }

    async fn run(&self, args: PsapArgs) -> Result<LocintelResult<Value>> {
        let name = self.kind.tool_name();
        let api = self.client.emergency_info();

        if self.kind.by_location() {
            let location = required(name, "location", args.location)?;
            if let Err(e) = check_lon_lat(location.get("coordinates")) {
                return Ok(Err(e.into()));
            }
            let location = Value::Object(location);
            return Ok(match self.kind {
                PsapKind::Location => api.psap_by_location(location).await,
                _ => api.psap_ahj_by_location(location).await,
            });
        }

        let address = Value::Object(required(name, "address", args.address)?);
        Ok(match self.kind {
            PsapKind::Address => api.psap_by_address(address).await,
            _ => api.psap_ahj_by_address(address).await,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PsapArgs {
    #[serde(default)]
    address: Option<Map<String, Value>>,
    #[serde(default)]
    location: Option<Map<String, Value>>,
}

#[async_trait::async_trait]
impl Tool for PsapTool {
    fn schema(&self) -> ToolSchema {
        let (what, field, example) = match self.kind {
            PsapKind::Address => ("PSAP (911) by address", "address", EXAMPLE_ADDRESS),
            PsapKind::Location => ("PSAP by coordinates", "location", EXAMPLE_LOCATION),
            PsapKind::AhjAddress => ("PSAP+AHJ by address", "address", EXAMPLE_ADDRESS),
            PsapKind::AhjLocation => ("PSAP+AHJ by coordinates", "location", EXAMPLE_LOCATION),
        };
        let input = if self.kind.by_location() {
            json_schema_any_object("Object with coordinates [lon, lat]")
        } else {
            json_schema_any_object("Address object")
        };

        let mut properties = Map::new();
        properties.insert(field.to_string(), input);

        ToolSchema {
            name: self.kind.tool_name().to_string(),
            description: format!("Get {}. Example: {{'{}': {}}}", what, field, example),
            input_schema: json_schema_object(Value::Object(properties), vec![field]),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: PsapArgs = parse_args(self.kind.tool_name(), arguments)?;
        Ok(respond(self.run(args).await?))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Emergency
    }
}

pub struct PsapFccIdTool {
    client: LocintelClient,
}

impl PsapFccIdTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }

    async fn run(&self, fcc_id: &str) -> LocintelResult<Value> {
        let fcc_id = require_non_empty("fcc_id", fcc_id)?;
        self.client.emergency_info().psap_ahj_by_fcc_id(fcc_id).await
    }
}

#[derive(Debug, Deserialize)]
struct FccIdArgs {
    fcc_id: String,
}

#[async_trait::async_trait]
impl Tool for PsapFccIdTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "psap_ahj_fccid".to_string(),
            description: "Get PSAP+AHJ by FCC ID. Example: {'fcc_id': '1404'}".to_string(),
            input_schema: json_schema_object(
                json!({"fcc_id": json_schema_string("FCC PSAP identifier")}),
                vec!["fcc_id"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: FccIdArgs = parse_args("psap_ahj_fccid", arguments)?;
        Ok(respond(self.run(&args.fcc_id).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Emergency
    }
}
