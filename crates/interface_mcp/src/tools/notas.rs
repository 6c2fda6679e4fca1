//! Formal note generation tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;
use validator::Validate;

use super::{parse_arguments, McpTool};
use crate::error::ToolError;
use crate::notes::NotesClient;

#[derive(Debug, Deserialize, Validate)]
struct GenerarNotaArgs {
    #[validate(length(min = 1, message = "motivo no puede estar vacío"))]
    motivo: String,
    #[validate(length(min = 1, message = "numero_afiliado no puede estar vacío"))]
    numero_afiliado: String,
}

/// `generar_nota_reintegro`: asks the note service for a formal letter
pub struct GenerarNota {
    notes: NotesClient,
}

impl GenerarNota {
    pub fn new(notes: NotesClient) -> Self {
        Self { notes }
    }
}

#[async_trait]
impl McpTool for GenerarNota {
    fn name(&self) -> &'static str {
        "generar_nota_reintegro"
    }

    fn description(&self) -> &'static str {
        "Genera una nota formal dirigida al Director/a de la obra social para una solicitud de reintegro.\n\n\
         Antes de llamarla, SIEMPRE preguntale al afiliado:\n\
         1. En qué lugar se realizó la prestación (ciudad, clínica, hospital).\n\
         2. En qué fecha fue la prestación (DD/MM/AAAA).\n\
         3. Quién fue el prestador (médico, profesional o institución).\n\
         4. Cuál es el motivo de la solicitud (qué necesita reintegrar o autorizar).\n\n\
         Con esas respuestas armá el motivo con esta estructura OBLIGATORIA:\n\
         \"Me dirijo a usted con el fin de [solicitud específica del afiliado]. La prestación fue \
         realizada en [lugar] el día [fecha] por [prestador]. Adjunto los comprobantes y \
         documentación requerida.\"\n\n\
         Ejemplo: \"Me dirijo a usted con el fin de solicitar el reintegro de una consulta médica \
         especializada. La prestación fue realizada en Clínica San Martín, Mendoza, el día \
         15/10/2024 por el Dr. Juan Pérez. Adjunto los comprobantes y documentación requerida.\"\n\n\
         Devuelve la respuesta del servicio de notas sin modificar, con la URL completa para \
         descargar la nota generada en PDF."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "motivo": {
                    "type": "string",
                    "description": "Texto completo de la nota: \"Me dirijo a usted con el fin de [solicitud]. La prestación fue realizada en [lugar] el día [fecha] por [prestador]. Adjunto los comprobantes y documentación requerida.\""
                },
                "numero_afiliado": {
                    "type": "string",
                    "description": "Número de carné del afiliado titular"
                }
            },
            "required": ["motivo", "numero_afiliado"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "generar_nota_reintegro"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: GenerarNotaArgs = parse_arguments(arguments)?;
        self.notes
            .generar_nota(&args.motivo, &args.numero_afiliado)
            .await
    }
}
