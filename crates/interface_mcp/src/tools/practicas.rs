//! Practice catalog tools

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use core_kernel::PlanId;
use domain_reintegros::PracticaPort;

use super::{parse_arguments, to_result, McpTool};
use crate::dto::PracticaResponse;
use crate::error::ToolError;

#[derive(Debug, Deserialize, Validate)]
struct PracticaPorNombreArgs {
    #[validate(length(min = 1, message = "nombre no puede estar vacío"))]
    nombre: String,
}

/// `get_id_practica_por_nombre`: partial, case-insensitive name search
pub struct PracticaPorNombre {
    practicas: Arc<dyn PracticaPort>,
}

impl PracticaPorNombre {
    pub fn new(practicas: Arc<dyn PracticaPort>) -> Self {
        Self { practicas }
    }
}

#[async_trait]
impl McpTool for PracticaPorNombre {
    fn name(&self) -> &'static str {
        "get_id_practica_por_nombre"
    }

    fn description(&self) -> &'static str {
        "Busca prácticas médicas por nombre y devuelve sus `practica_id`.\n\n\
         Usala ANTES de agregar un ítem de tipo 'P' a un reintegro. La búsqueda \
         es parcial y no distingue mayúsculas (\"consulta\", \"radio\", \"laboratorio\").\n\
         - Un solo resultado: usá ese `practica_id`.\n\
         - Varios resultados: preguntale al usuario cuál corresponde antes de seguir.\n\
         - Lista vacía: informá que no se encontró la práctica."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "nombre": {
                    "type": "string",
                    "description": "Nombre o parte del nombre de la práctica"
                }
            },
            "required": ["nombre"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "get_id_practica_por_nombre"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: PracticaPorNombreArgs = parse_arguments(arguments)?;

        let practicas = self
            .practicas
            .search_by_nombre(&args.nombre)
            .await
            .map_err(|e| ToolError::domain("Error al buscar práctica", e))?;

        to_result(
            practicas
                .into_iter()
                .map(PracticaResponse::from)
                .collect::<Vec<_>>(),
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
struct PracticasCubiertasArgs {
    plan_id: i32,
}

/// `practicas_cubiertas`: practices covered by a plan
pub struct PracticasCubiertas {
    practicas: Arc<dyn PracticaPort>,
}

impl PracticasCubiertas {
    pub fn new(practicas: Arc<dyn PracticaPort>) -> Self {
        Self { practicas }
    }
}

#[async_trait]
impl McpTool for PracticasCubiertas {
    fn name(&self) -> &'static str {
        "practicas_cubiertas"
    }

    fn description(&self) -> &'static str {
        "Lista las prácticas médicas cubiertas por un plan.\n\n\
         El `plan_id` se obtiene de los datos del afiliado (`afiliado_por_dni`). \
         Una lista vacía significa que el plan no tiene coberturas cargadas."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "plan_id": {
                    "type": "integer",
                    "description": "ID del plan"
                }
            },
            "required": ["plan_id"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "practicas_cubiertas"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: PracticasCubiertasArgs = parse_arguments(arguments)?;

        let practicas = self
            .practicas
            .covered_by_plan(PlanId::new(args.plan_id))
            .await
            .map_err(|e| ToolError::domain("Error al obtener prácticas cubiertas", e))?;

        to_result(
            practicas
                .into_iter()
                .map(PracticaResponse::from)
                .collect::<Vec<_>>(),
        )
    }
}
