//! Stdio transport
//!
//! One JSON-RPC message per line in each direction. Blank lines are skipped.
//! Logs go to stderr so stdout carries protocol traffic only.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::McpError;
use crate::protocol::{JsonRpcError, JsonRpcResponse};
use crate::server::McpServer;

/// Serves messages from `reader` until it reaches end of input
///
/// A line that is not valid UTF-8 is answered with a parse error and the
/// loop keeps reading.
pub async fn serve<R, W>(server: &McpServer, mut reader: R, mut writer: W) -> Result<(), McpError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buffer) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "Message received");
                server.handle_message(line).await
            }
            Err(e) => {
                warn!(error = %e, "Message is not valid UTF-8");
                Some(JsonRpcResponse::failure(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(e),
                ))
            }
        };

        if let Some(response) = response {
            write_response(&mut writer, &response).await?;
        }
    }

    info!("Input closed, stopping stdio transport");
    Ok(())
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), McpError>
where
    W: AsyncWrite + Unpin,
{
    let mut encoded = serde_json::to_vec(response)?;
    encoded.push(b'\n');
    writer.write_all(&encoded).await?;
    writer.flush().await?;
    Ok(())
}

/// Serves on the process's stdin and stdout
pub async fn serve_stdio(server: &McpServer) -> Result<(), McpError> {
    serve(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
