//! Client for the note generation service
//!
//! The service renders a formal request letter and answers with JSON that
//! the tool hands back untouched.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{McpError, ToolError};

const GENERAR_NOTA_PATH: &str = "/reintegros/generar-nota";

#[derive(Debug, Serialize)]
struct GenerarNotaRequest<'a> {
    motivo: &'a str,
    afiliado_numero: &'a str,
}

/// HTTP client for `POST /reintegros/generar-nota`
#[derive(Debug, Clone)]
pub struct NotesClient {
    client: reqwest::Client,
    endpoint: String,
}

impl NotesClient {
    /// Creates a client for the service at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, McpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| McpError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERAR_NOTA_PATH),
        })
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Requests a note; one attempt, no retry
    #[instrument(skip(self, motivo), fields(endpoint = %self.endpoint))]
    pub async fn generar_nota(&self, motivo: &str, afiliado_numero: &str) -> Result<Value, ToolError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerarNotaRequest {
                motivo,
                afiliado_numero,
            })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Note service unreachable");
                ToolError::Downstream(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Note service rejected the request");
            return Err(ToolError::Downstream(format!(
                "el servicio respondió con estado {}",
                status
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ToolError::Downstream(format!("respuesta no es JSON válido: {}", e)))?;

        debug!("Note generated");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = NotesClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/reintegros/generar-nota");
    }
}
