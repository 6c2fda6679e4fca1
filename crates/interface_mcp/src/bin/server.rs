//! Reimbursement MCP Server Binary
//!
//! # Usage
//!
//! ```bash
//! # stdio transport (default), for clients that spawn the server
//! DB_NAME=obra_social DB_USER=app DB_PASSWORD=secret reintegros-mcp
//!
//! # HTTP transport
//! MCP_TRANSPORT=http MCP_PORT=8765 DB_NAME=... reintegros-mcp
//! ```
//!
//! # Environment Variables
//!
//! * `MCP_TRANSPORT` - `stdio` or `http` (default: stdio)
//! * `MCP_HOST` / `MCP_PORT` - HTTP bind address (default: 127.0.0.1:8765)
//! * `MCP_UPLOAD_BASE_URL` - Base URL of the document upload form
//! * `MCP_NOTES_BASE_URL` - Base URL of the note generation service
//! * `MCP_NOTES_TIMEOUT_SECS` - Note service timeout (default: 30)
//! * `MCP_ENABLE_REVIEW_SUBMISSION` - Registers `enviar_reintegro_a_revision`
//! * `MCP_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)
//! * `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_MAX_CONNECTIONS`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_reintegros::Ports;
use infra_db::{create_pool, PostgresReintegrosAdapter};
use interface_mcp::config::{DatabaseSettings, ServerConfig, TransportKind};
use interface_mcp::notes::NotesClient;
use interface_mcp::{create_router, stdio, AppState, McpServer, ToolRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().context("invalid MCP_* configuration")?;
    init_tracing(&config.log_level);

    let db_settings = DatabaseSettings::from_env().context("invalid DB_* configuration")?;
    tracing::info!(
        transport = ?config.transport,
        database = ?db_settings,
        "Starting reimbursement MCP server"
    );

    let pool = create_pool(db_settings.to_database_config())
        .await
        .context("failed to connect to the database")?;
    let adapter = Arc::new(PostgresReintegrosAdapter::new(pool));

    let notes = NotesClient::new(&config.notes_base_url, config.notes_timeout())?;
    let registry = ToolRegistry::standard(&Ports::from_adapter(adapter.clone()), notes, &config);
    tracing::info!(tools = ?registry, "Tools registered");

    let server = Arc::new(McpServer::new(registry));

    let outcome = match config.transport {
        TransportKind::Stdio => {
            tokio::select! {
                result = stdio::serve_stdio(&server) => result.map_err(anyhow::Error::from),
                _ = shutdown_signal() => Ok(()),
            }
        }
        TransportKind::Http => serve_http(&config, server, adapter.clone()).await,
    };

    adapter.close().await;
    tracing::info!("Server shutdown complete");
    outcome
}

async fn serve_http(
    config: &ServerConfig,
    server: Arc<McpServer>,
    adapter: Arc<PostgresReintegrosAdapter>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server_addr()))?;

    let app = create_router(AppState {
        server,
        health: adapter,
    });

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Logs go to stderr; on stdio, stdout belongs to the protocol.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
