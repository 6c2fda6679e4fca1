//! JSON-RPC dispatch
//!
//! `McpServer` is transport-agnostic: it takes one raw message and returns
//! the response to send, if any. The stdio loop and the HTTP handler both
//! sit on top of it.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::protocol::{
    methods, negotiate_protocol_version, CallToolParams, CallToolResult, Implementation,
    InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerCapabilities, ToolsCapability,
};
use crate::tools::ToolRegistry;

/// Name the server introduces itself with
pub const SERVER_NAME: &str = "reintegros-mcp";

const INSTRUCTIONS: &str = "Herramientas para consultar afiliados y prácticas y para cargar reintegros. \
Para un reintegro nuevo: afiliado_por_dni, iniciar_reintegro, agregar_item_a_reintegro y, con confirmación \
del usuario, adjuntar_documentos_a_reintegro.";

/// Tools-only MCP server
#[derive(Debug)]
pub struct McpServer {
    registry: ToolRegistry,
    server_info: Implementation,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles one raw JSON-RPC message
    ///
    /// Returns `None` for notifications. Malformed input is answered with
    /// a JSON-RPC error carrying a `null` id.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error(e)));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                warn!(error = %e, "Invalid JSON-RPC request");
                return Some(JsonRpcResponse::failure(id, JsonRpcError::invalid_request(e)));
            }
        };

        self.handle_request(request).await
    }

    /// Handles one decoded request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = match request.id {
            Some(id) => id,
            None => {
                debug!(method = %request.method, "Notification received");
                return None;
            }
        };

        let outcome = match request.method.as_str() {
            methods::INITIALIZE => self.initialize(request.params),
            methods::PING => Ok(json!({})),
            methods::LIST_TOOLS => self.list_tools(),
            methods::CALL_TOOL => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    fn initialize(&self, params: Value) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = parse_params(params)?;
        let protocol_version = negotiate_protocol_version(params.protocol_version.as_deref());

        info!(
            client = params.client_info.as_ref().map(|c| c.name.as_str()).unwrap_or("unknown"),
            protocol_version,
            "Client initialized"
        );

        encode(InitializeResult {
            protocol_version: protocol_version.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: self.server_info.clone(),
            instructions: Some(INSTRUCTIONS.to_string()),
        })
    }

    fn list_tools(&self) -> Result<Value, JsonRpcError> {
        encode(ListToolsResult {
            tools: self.registry.list(),
        })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = parse_params(params)?;
        let name = params
            .name
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;
        let tool = self
            .registry
            .get(&name)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown tool: {}", name)))?;

        let result = match tool.call(params.arguments).await {
            Ok(value) => CallToolResult::json(&value),
            Err(e) => {
                if e.is_caller_error() {
                    debug!(tool = %name, error = %e, "Tool rejected its arguments");
                } else {
                    warn!(tool = %name, error = %e, "Tool call failed");
                }
                CallToolResult::error(e.to_string())
            }
        };

        encode(result)
    }
}

fn parse_params<T: DeserializeOwned + Default>(params: Value) -> Result<T, JsonRpcError> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

fn encode<T: serde::Serialize>(value: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(JsonRpcError::internal)
}
