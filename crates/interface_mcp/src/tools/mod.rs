//! MCP tools
//!
//! Each tool is a thin adapter: it parses and validates its arguments, calls
//! one port operation, and serializes the answer. Descriptions carry the
//! procedural guidance the orchestrating model is expected to follow; the
//! code does not enforce it.

pub mod afiliados;
pub mod practicas;
pub mod reintegros;
pub mod notas;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use validator::Validate;

use domain_reintegros::Ports;

use crate::config::ServerConfig;
use crate::error::ToolError;
use crate::notes::NotesClient;
use crate::protocol::ToolDescriptor;

/// Trait for MCP tool implementations
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Name the client calls the tool by
    fn name(&self) -> &'static str;

    /// Description shown to the orchestrating model
    fn description(&self) -> &'static str;

    /// JSON Schema of the arguments object
    fn input_schema(&self) -> Value;

    /// Runs the tool and returns its JSON result
    async fn call(&self, arguments: Value) -> Result<Value, ToolError>;
}

/// Registry of available tools, ordered by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry with every tool the configuration enables
    pub fn standard(ports: &Ports, notes: NotesClient, config: &ServerConfig) -> Self {
        let mut registry = Self::new();

        registry.register(afiliados::AfiliadoPorDni::new(ports.afiliados.clone()));
        registry.register(practicas::PracticaPorNombre::new(ports.practicas.clone()));
        registry.register(practicas::PracticasCubiertas::new(ports.practicas.clone()));
        registry.register(reintegros::IniciarReintegro::new(ports.reintegros.clone()));
        registry.register(reintegros::AgregarItem::new(ports.reintegros.clone()));
        registry.register(reintegros::AdjuntarDocumentos::new(
            ports.reintegros.clone(),
            config.upload_base_url.clone(),
        ));
        registry.register(reintegros::ListarReintegros::new(ports.reintegros.clone()));
        registry.register(reintegros::DetalleReintegro::new(ports.reintegros.clone()));
        registry.register(notas::GenerarNota::new(notes));

        if config.enable_review_submission {
            registry.register(reintegros::EnviarARevision::new(ports.reintegros.clone()));
        }

        registry
    }

    /// Registers a tool, replacing any tool with the same name
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Descriptors for `tools/list`
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tools.keys()).finish()
    }
}

/// Deserializes and validates a tool's arguments
///
/// A missing arguments object is treated as `{}` so the error names the
/// first missing field.
pub fn parse_arguments<T>(arguments: Value) -> Result<T, ToolError>
where
    T: DeserializeOwned + Validate,
{
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };

    let parsed: T = serde_json::from_value(arguments)
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
    parsed.validate()?;
    Ok(parsed)
}

/// Serializes a tool result
pub fn to_result<T: Serialize>(value: T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Validate)]
    struct Args {
        #[validate(length(min = 1))]
        nombre: String,
    }

    #[test]
    fn test_missing_arguments_name_the_field() {
        let err = parse_arguments::<Args>(Value::Null).unwrap_err();
        assert!(err.to_string().contains("nombre"));
    }

    #[test]
    fn test_validation_runs_after_parsing() {
        let err = parse_arguments::<Args>(json!({"nombre": ""})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(parse_arguments::<Args>(json!({"nombre": "consulta"})).is_ok());
    }
}
