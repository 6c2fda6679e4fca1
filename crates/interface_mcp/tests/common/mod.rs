//! Shared harness for the tool server tests
#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use domain_reintegros::Ports;
use interface_mcp::config::ServerConfig;
use interface_mcp::notes::NotesClient;
use interface_mcp::protocol::{methods, CallToolResult, JsonRpcRequest, JsonRpcResponse};
use interface_mcp::{McpServer, ToolRegistry};
use test_utils::InMemoryStore;

/// Nothing listens here; note calls fail fast
pub const UNREACHABLE_NOTES_URL: &str = "http://127.0.0.1:9";

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub server: McpServer,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_config(ServerConfig::default()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        Self::build(config, UNREACHABLE_NOTES_URL).await
    }

    pub async fn build(config: ServerConfig, notes_url: &str) -> Self {
        let store = Arc::new(InMemoryStore::seeded().await);
        let notes = NotesClient::new(notes_url, Duration::from_secs(2)).unwrap();
        let registry = ToolRegistry::standard(&Ports::from_adapter(store.clone()), notes, &config);
        Self {
            store,
            server: McpServer::new(registry),
        }
    }

    pub async fn request(&self, method: &str, params: Value) -> JsonRpcResponse {
        self.server
            .handle_request(JsonRpcRequest::new(1, method, params))
            .await
            .unwrap()
    }

    /// Calls a tool and returns the raw `tools/call` result
    pub async fn call(&self, tool: &str, arguments: Value) -> CallToolResult {
        let response = self
            .request(methods::CALL_TOOL, json!({"name": tool, "arguments": arguments}))
            .await;
        assert!(response.error.is_none(), "unexpected JSON-RPC error: {:?}", response.error);
        serde_json::from_value(response.result.unwrap()).unwrap()
    }

    /// Calls a tool that must succeed and decodes its JSON output
    pub async fn call_ok(&self, tool: &str, arguments: Value) -> Value {
        let result = self.call(tool, arguments).await;
        assert!(!result.is_error, "{} failed: {:?}", tool, result.text());
        serde_json::from_str(result.text().unwrap()).unwrap()
    }

    /// Calls a tool that must fail and returns its message
    pub async fn call_err(&self, tool: &str, arguments: Value) -> String {
        let result = self.call(tool, arguments).await;
        assert!(result.is_error, "{} unexpectedly succeeded: {:?}", tool, result.text());
        result.text().unwrap().to_string()
    }
}
