//! Tool server error handling
//!
//! `McpError` covers failures of the server itself: configuration,
//! transport I/O, and startup. `ToolError` covers a single tool call and is
//! reported back to the caller as an `isError` result, never as a JSON-RPC
//! error.

use domain_reintegros::ReintegroError;
use thiserror::Error;

/// Server-level errors
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Errors produced while executing one tool call
///
/// The display text is what the orchestrating model reads, so it is in the
/// same language as the tool descriptions.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments missing, mistyped, or failing validation
    #[error("Argumentos inválidos: {0}")]
    InvalidArguments(String),

    /// A domain operation failed
    #[error("{context}: {source}")]
    Domain {
        context: &'static str,
        #[source]
        source: ReintegroError,
    },

    /// The operation ran but did not find the record it had to change
    #[error("{0}")]
    NotApplied(String),

    /// The downstream note service failed
    #[error("Error al generar la nota: {0}")]
    Downstream(String),

    /// The result could not be encoded as JSON
    #[error("Error al serializar el resultado: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Wraps a domain error with the tool's context message
    pub fn domain(context: &'static str, source: ReintegroError) -> Self {
        ToolError::Domain { context, source }
    }

    /// Returns true if the caller's arguments were at fault
    pub fn is_caller_error(&self) -> bool {
        match self {
            ToolError::InvalidArguments(_) => true,
            ToolError::Domain { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

impl From<validator::ValidationErrors> for ToolError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ToolError::InvalidArguments(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_keeps_context_and_cause() {
        let err = ToolError::domain(
            "Error al iniciar reintegro",
            ReintegroError::persistence("create_reintegro", "connection refused"),
        );
        assert_eq!(
            err.to_string(),
            "Error al iniciar reintegro: Error en create_reintegro: connection refused"
        );
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_validation_is_a_caller_error() {
        let err = ToolError::domain(
            "Error al agregar ítem al reintegro",
            ReintegroError::validation("practica_id es requerido cuando el tipo es 'P'"),
        );
        assert!(err.is_caller_error());
    }
}
