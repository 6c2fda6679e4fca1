//! MCP Tool Server
//!
//! Exposes affiliate lookup, practice catalog search, and reimbursement claim
//! operations as MCP tools for a conversational agent.
//!
//! # Architecture
//!
//! - **Tools**: one struct per tool, each calling a single domain port
//! - **Server**: JSON-RPC dispatch shared by both transports
//! - **Transports**: newline-delimited stdio, or `POST /mcp` over HTTP
//! - **Notes**: outbound client for the formal note service
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_mcp::{create_router, AppState, McpServer, ToolRegistry};
//!
//! let server = Arc::new(McpServer::new(ToolRegistry::standard(&ports, notes, &config)));
//! let app = create_router(AppState { server, health: adapter });
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod dto;
pub mod notes;
pub mod tools;
pub mod server;
pub mod stdio;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;

use crate::handlers::{health, mcp};

pub use crate::error::{McpError, ToolError};
pub use crate::server::McpServer;
pub use crate::tools::{McpTool, ToolRegistry};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub server: Arc<McpServer>,
    pub health: Arc<dyn HealthCheckable>,
}

/// Creates the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/mcp", post(mcp::handle_mcp))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
