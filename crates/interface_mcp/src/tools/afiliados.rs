//! Affiliate lookup tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use domain_reintegros::AfiliadoPort;

use super::{parse_arguments, to_result, McpTool};
use crate::dto::AfiliadoResponse;
use crate::error::ToolError;

#[derive(Debug, Deserialize, Validate)]
struct AfiliadoPorDniArgs {
    #[validate(length(min = 1, message = "tipo_doc no puede estar vacío"))]
    tipo_doc: String,
    #[validate(length(min = 1, message = "nro_doc no puede estar vacío"))]
    nro_doc: String,
}

/// `afiliado_por_dni`: finds an affiliate by document type and number
pub struct AfiliadoPorDni {
    afiliados: Arc<dyn AfiliadoPort>,
}

impl AfiliadoPorDni {
    pub fn new(afiliados: Arc<dyn AfiliadoPort>) -> Self {
        Self { afiliados }
    }
}

#[async_trait]
impl McpTool for AfiliadoPorDni {
    fn name(&self) -> &'static str {
        "afiliado_por_dni"
    }

    fn description(&self) -> &'static str {
        "Busca un afiliado por tipo y número de documento.\n\n\
         Devuelve los datos del afiliado, incluido su `afiliado_id` y su `plan_id`, \
         o `null` si no existe. Usá el `afiliado_id` para iniciar o listar reintegros \
         y el `plan_id` para consultar las prácticas cubiertas."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tipo_doc": {
                    "type": "string",
                    "description": "Tipo de documento (DNI, PASAPORTE, etc.)"
                },
                "nro_doc": {
                    "type": "string",
                    "description": "Número de documento"
                }
            },
            "required": ["tipo_doc", "nro_doc"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "afiliado_por_dni"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: AfiliadoPorDniArgs = parse_arguments(arguments)?;

        let afiliado = self
            .afiliados
            .find_by_documento(&args.tipo_doc, &args.nro_doc)
            .await
            .map_err(|e| ToolError::domain("Error al buscar afiliado", e))?;

        to_result(afiliado.map(AfiliadoResponse::from))
    }
}
