// MCP server: JSON-RPC dispatch and the stdio loop

use crate::protocol::*;
use crate::tools::envelope::failure;
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, error, info, warn};

pub const DEFAULT_SERVER_NAME: &str = "locintel-mcp";

/// Longest stdin frame accepted before it is dropped with a parse error.
pub const MAX_LINE_LENGTH: usize = 4 * 1024 * 1024;

pub struct McpServer {
    registry: ToolRegistry,
    info: ServerInfo,
    max_line_length: usize,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            info: ServerInfo {
                name: DEFAULT_SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            max_line_length: MAX_LINE_LENGTH,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.info.name = name.into();
        self
    }

    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Handle one JSON-RPC message. Notifications never produce a response.
    pub async fn handle_message(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!(
                    "unsupported jsonrpc version '{}'",
                    request.jsonrpc
                )),
            ));
        }

        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::error(id, err),
        })
    }

    /// Handle one raw frame. Unparseable input gets a parse error with a null id.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Invalid JSON on input");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e.to_string()),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_message(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(e.to_string()),
            )),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = match params {
            Some(p) => serde_json::from_value(p)
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)))?,
            None => InitializeParams::default(),
        };

        info!(
            client = params.client_info.as_ref().map(|c| c.name.as_str()).unwrap_or("unknown"),
            protocol = params.protocol_version.as_deref().unwrap_or("unspecified"),
            "Client initialized"
        );

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: self.info.clone(),
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }

    fn list_tools(&self) -> Result<Value, JsonRpcError> {
        let result = ListToolsResult {
            tools: self.registry.list_schemas(),
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)))?;

        let result = match self.registry.get(&params.name) {
            Some(tool) => {
                debug!(tool = %params.name, "Calling tool");
                match tool.execute(params.arguments.unwrap_or(Value::Null)).await {
                    Ok(result) => result,
                    Err(e) => failure(format!("{:#}", e)),
                }
            }
            None => failure(format!("Unknown tool: {}", params.name)),
        };

        if result.is_error == Some(true) {
            error!(tool = %params.name, "Tool call failed");
        }
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes.
    pub async fn serve_stdio(&self) -> Result<()> {
        info!(tools = self.registry.len(), "MCP server listening on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut input = FramedRead::new(reader, LinesCodec::new_with_max_length(self.max_line_length));
        let mut output = FramedWrite::new(writer, LinesCodec::new());

        // FramedRead yields one `None` after a decode error; keep reading past it.
        let mut discarded = false;
        loop {
            let line = match input.next().await {
                Some(line) => line,
                None if discarded => {
                    discarded = false;
                    continue;
                }
                None => break,
            };

            let response = match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(&line).await,
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    warn!(max = self.max_line_length, "Input frame too long, discarding");
                    discarded = true;
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        JsonRpcError::parse_error(format!(
                            "frame exceeds {} bytes",
                            self.max_line_length
                        )),
                    ))
                }
                Err(LinesCodecError::Io(e)) => {
                    return Err(e).context("Failed to read from input");
                }
            };
            if let Some(response) = response {
                let frame = serde_json::to_string(&response).context("Failed to encode response")?;
                output.send(frame).await.context("Failed to write response")?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::local::ValidateCoordinatesTool;
    use locintel_core::Envelope;
    use std::sync::Arc;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    fn server() -> McpServer {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(ValidateCoordinatesTool));
        McpServer::new(registry)
    }

    fn call(id: i64, name: &str, arguments: Value) -> JsonRpcRequest {
        JsonRpcRequest::new(id, "tools/call", json!({"name": name, "arguments": arguments}))
    }

    fn envelope(response: &JsonRpcResponse) -> Envelope {
        let text = response.result.as_ref().unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = server()
            .handle_message(JsonRpcRequest::new(
                1,
                "initialize",
                json!({"protocolVersion": "2024-11-05", "clientInfo": {"name": "test", "version": "1"}}),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], DEFAULT_SERVER_NAME);
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let response = server()
            .handle_message(JsonRpcRequest::notification("notifications/initialized", None))
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = server()
            .handle_message(JsonRpcRequest::new(2, "tools/list", Value::Null))
            .await
            .unwrap();
        let tools = &response.result.unwrap()["tools"];
        assert_eq!(tools[0]["name"], "validate_coordinates");
        assert!(tools[0]["inputSchema"]["properties"]["latitude"].is_object());
    }

    #[tokio::test]
    async fn test_tool_call_success_and_argument_error() {
        let server = server();

        let ok = server
            .handle_message(call(3, "validate_coordinates", json!({"latitude": 1, "longitude": 2})))
            .await
            .unwrap();
        assert!(envelope(&ok).success);

        let bad = server
            .handle_message(call(4, "validate_coordinates", json!({"latitude": 1})))
            .await
            .unwrap();
        assert_eq!(bad.result.as_ref().unwrap()["isError"], true);
        let error = envelope(&bad).error.unwrap();
        assert!(error.starts_with("Invalid arguments for validate_coordinates"));
        assert!(error.contains("missing field `longitude`"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failure_envelope() {
        let response = server()
            .handle_message(call(5, "geocode", json!({})))
            .await
            .unwrap();
        assert_eq!(envelope(&response).error.as_deref(), Some("Unknown tool: geocode"));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server()
            .handle_message(JsonRpcRequest::new(6, "resources/list", Value::Null))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, JsonRpcError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_null_id_request_is_answered() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"tools/list"}"#)
            .await
            .expect("a request with a null id must be answered");
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.result.unwrap()["tools"][0]["name"], "validate_coordinates");
    }

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let response = server().handle_line("{not json").await.unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, JsonRpcError::PARSE_ERROR);

        let response = server().handle_line(r#"{"id": 9, "jsonrpc": "2.0"}"#).await.unwrap();
        assert_eq!(response.id, json!(9));
        assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_serve_over_lines() {
        let (client, server_side) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_side);
        let (client_read, mut client_write) = tokio::io::split(client);

        let handle = tokio::spawn(async move { server().serve(server_read, server_write).await });

        client_write
            .write_all(b"{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
            .await
            .unwrap();
        client_write.shutdown().await.unwrap();

        let mut lines = BufReader::new(client_read).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        let response: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));

        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_oversized_frame_is_rejected_and_stream_continues() {
        let (client, server_side) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_side);
        let (client_read, mut client_write) = tokio::io::split(client);

        let handle = tokio::spawn(async move {
            server()
                .with_max_line_length(64)
                .serve(server_read, server_write)
                .await
        });

        let oversized = format!(
            "{{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\",\"params\":{{\"pad\":\"{}\"}}}}\n",
            "x".repeat(200)
        );
        client_write.write_all(oversized.as_bytes()).await.unwrap();
        client_write
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n")
            .await
            .unwrap();
        client_write.shutdown().await.unwrap();

        let mut lines = BufReader::new(client_read).lines();
        let first: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(first["id"], Value::Null);
        assert_eq!(first["error"]["code"], JsonRpcError::PARSE_ERROR);

        let second: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(second, json!({"jsonrpc": "2.0", "id": 2, "result": {}}));

        handle.await.unwrap().unwrap();
    }
}
