//! Line-delimited JSON-RPC 2.0 tool server (MCP-style) over any async
//! reader/writer pair. The binary wires it to stdin/stdout.

pub mod protocol;
pub mod tools;

use crate::application::PredictionService;
use protocol::{
    INTERNAL_ERROR, INVALID_REQUEST, PARSE_ERROR, PROTOCOL_VERSION, RpcError, RpcRequest,
    RpcResponse,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

pub const SERVER_NAME: &str = "stock-predictor";

pub struct ToolServer {
    service: Arc<PredictionService>,
}

impl ToolServer {
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self { service }
    }

    /// Handles one request line. Returns `None` for notifications and blank
    /// lines.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(RpcResponse::failure(
                Value::Null,
                RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
            )),
            Ok(raw) => {
                let id = raw.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<RpcRequest>(raw) {
                    Ok(request) => self.handle_request(request).await,
                    Err(e) => Some(RpcResponse::failure(
                        id,
                        RpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e)),
                    )),
                }
            }
        };

        let response = response?;
        match serde_json::to_string(&response) {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                error!("ToolServer: failed to encode response: {}", e);
                Some(format!(
                    r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"Internal error"}}}}"#,
                    INTERNAL_ERROR
                ))
            }
        }
    }

    async fn handle_request(&self, request: RpcRequest) -> Option<RpcResponse> {
        debug!("ToolServer: <- {}", request.method);

        if request.is_notification() {
            // notifications/initialized, notifications/cancelled, ...
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let result = match request.method.as_str() {
            "initialize" => Ok(initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::tool_definitions() })),
            "tools/call" => self.call_tool(&request.params).await,
            "resources/list" => Ok(json!({ "resources": [] })),
            "resources/templates/list" => {
                Ok(json!({ "resourceTemplates": tools::resource_templates() }))
            }
            "resources/read" => self.read_resource(&request.params).await,
            other => Err(RpcError::method_not_found(other)),
        };

        Some(match result {
            Ok(value) => RpcResponse::success(id, value),
            Err(err) => RpcResponse::failure(id, err),
        })
    }

    async fn call_tool(&self, params: &Value) -> Result<Value, RpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("Missing tool name"))?;
        let ticker = params
            .get("arguments")
            .and_then(|args| args.get("ticker"))
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| RpcError::invalid_params("Missing required argument: ticker"))?;

        info!("ToolServer: {}({})", name, ticker);
        let output = match name {
            tools::PREDICT_TREND => tools::predict_trend(&self.service, ticker).await,
            tools::GET_STOCK_PRICE => tools::get_stock_price(&self.service, ticker).await,
            other => return Err(RpcError::invalid_params(format!("Unknown tool: {}", other))),
        };
        Ok(output.to_value())
    }

    async fn read_resource(&self, params: &Value) -> Result<Value, RpcError> {
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("Missing resource uri"))?;
        let ticker = tools::parse_stock_uri(uri)
            .ok_or_else(|| RpcError::invalid_params(format!("Unknown resource: {}", uri)))?;

        let text = tools::read_stock_info(&self.service, ticker)
            .await
            .map_err(|e| {
                RpcError::new(
                    INTERNAL_ERROR,
                    format!("Error fetching info for {}: {}", ticker, e),
                )
            })?;

        Ok(json!({
            "contents": [{
                "uri": uri,
                "mimeType": "application/json",
                "text": text,
            }]
        }))
    }

    /// Serves requests until `reader` reaches EOF.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        info!("ToolServer: input closed, shutting down");
        Ok(())
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "resources": {},
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}
