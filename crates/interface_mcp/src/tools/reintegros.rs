//! Reimbursement claim tools
//!
//! The intended call order is: `iniciar_reintegro`, then
//! `agregar_item_a_reintegro` one or more times, then
//! `adjuntar_documentos_a_reintegro`. The affiliate finishes the claim in the
//! upload form. None of the tools check that order.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use core_kernel::{AfiliadoId, DateRange, MedicamentoId, Money, PracticaId, ReintegroId};
use domain_reintegros::{ItemKind, NuevoItem, NuevoReintegro, ReintegroPort};

use super::{parse_arguments, to_result, McpTool};
use crate::dto::{ActivarFormularioResponse, ReintegroDetalleResponse, ReintegroResponse};
use crate::error::ToolError;

fn monto(campo: &str, value: Decimal) -> Result<Money, ToolError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ToolError::InvalidArguments(format!(
            "{} no puede ser negativo (recibido: {})",
            campo, value
        )));
    }
    Ok(Money::new(value))
}

#[derive(Debug, Deserialize, Validate)]
struct IniciarReintegroArgs {
    #[validate(range(min = 1, message = "afiliado_id debe ser un entero positivo"))]
    afiliado_id: i32,
    #[serde(default)]
    total_presentado: Decimal,
}

/// `iniciar_reintegro`: creates the claim shell in `PENDIENTE`
pub struct IniciarReintegro {
    reintegros: Arc<dyn ReintegroPort>,
}

impl IniciarReintegro {
    pub fn new(reintegros: Arc<dyn ReintegroPort>) -> Self {
        Self { reintegros }
    }
}

#[async_trait]
impl McpTool for IniciarReintegro {
    fn name(&self) -> &'static str {
        "iniciar_reintegro"
    }

    fn description(&self) -> &'static str {
        "Crea un reintegro en estado PENDIENTE y devuelve su `reintegro_id`.\n\n\
         Flujo obligatorio:\n\
         1) Llamar primero a esta herramienta con el `afiliado_id` (obtenelo con `afiliado_por_dni`).\n\
         2) Guardar el `reintegro_id` devuelto.\n\
         3) Agregar uno o más ítems con `agregar_item_a_reintegro`.\n\
         4) Con al menos un ítem cargado, llamar a `adjuntar_documentos_a_reintegro`.\n\
         5) No llamar más herramientas después: el afiliado envía el reintegro desde el formulario.\n\n\
         No inicies otro reintegro si ya tenés uno activo en la conversación."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "afiliado_id": {
                    "type": "integer",
                    "description": "ID del afiliado que solicita el reintegro"
                },
                "total_presentado": {
                    "type": "number",
                    "description": "Total declarado por el afiliado (por defecto 0)"
                }
            },
            "required": ["afiliado_id"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "iniciar_reintegro"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: IniciarReintegroArgs = parse_arguments(arguments)?;
        let total = monto("total_presentado", args.total_presentado)?;

        let id = self
            .reintegros
            .create(NuevoReintegro::new(AfiliadoId::new(args.afiliado_id)).with_total_presentado(total))
            .await
            .map_err(|e| ToolError::domain("Error al iniciar reintegro", e))?;

        info!(reintegro_id = %id, afiliado_id = args.afiliado_id, "Claim created");
        to_result(id.value())
    }
}

#[derive(Debug, Deserialize, Validate)]
struct AgregarItemArgs {
    #[validate(range(min = 1, message = "reintegro_id debe ser un entero positivo"))]
    reintegro_id: i32,
    tipo: String,
    fecha_prestacion: NaiveDate,
    monto_presentado: Decimal,
    #[serde(default)]
    practica_id: Option<i32>,
    #[serde(default)]
    medicamento_id: Option<i32>,
}

/// `agregar_item_a_reintegro`: appends a practice or medicine line item
pub struct AgregarItem {
    reintegros: Arc<dyn ReintegroPort>,
}

impl AgregarItem {
    pub fn new(reintegros: Arc<dyn ReintegroPort>) -> Self {
        Self { reintegros }
    }
}

#[async_trait]
impl McpTool for AgregarItem {
    fn name(&self) -> &'static str {
        "agregar_item_a_reintegro"
    }

    fn description(&self) -> &'static str {
        "Agrega un ítem (práctica o medicamento) a un reintegro y devuelve su `item_id`.\n\n\
         - `tipo` = 'P' (práctica): `practica_id` es obligatorio (obtenelo con `get_id_practica_por_nombre`).\n\
         - `tipo` = 'M' (medicamento): `medicamento_id` es obligatorio.\n\
         - `fecha_prestacion` en formato YYYY-MM-DD.\n\n\
         Podés llamarla varias veces con el mismo `reintegro_id`; no se controlan duplicados. \
         Cuando haya al menos un ítem, seguí con `adjuntar_documentos_a_reintegro`."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "reintegro_id": {
                    "type": "integer",
                    "description": "ID devuelto por iniciar_reintegro"
                },
                "tipo": {
                    "type": "string",
                    "enum": ["P", "M"],
                    "description": "'P' = práctica, 'M' = medicamento"
                },
                "fecha_prestacion": {
                    "type": "string",
                    "format": "date",
                    "description": "Fecha de la prestación (YYYY-MM-DD)"
                },
                "monto_presentado": {
                    "type": "number",
                    "description": "Monto presentado del ítem"
                },
                "practica_id": {
                    "type": "integer",
                    "description": "Requerido si tipo es 'P'"
                },
                "medicamento_id": {
                    "type": "integer",
                    "description": "Requerido si tipo es 'M'"
                }
            },
            "required": ["reintegro_id", "tipo", "fecha_prestacion", "monto_presentado"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "agregar_item_a_reintegro"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        const CONTEXT: &str = "Error al agregar ítem al reintegro";

        let args: AgregarItemArgs = parse_arguments(arguments)?;

        let kind = ItemKind::from_tag(
            &args.tipo,
            args.practica_id.map(PracticaId::new),
            args.medicamento_id.map(MedicamentoId::new),
        )
        .map_err(|e| ToolError::domain(CONTEXT, e))?;
        let monto_presentado = monto("monto_presentado", args.monto_presentado)?;

        let item_id = self
            .reintegros
            .add_item(
                ReintegroId::new(args.reintegro_id),
                NuevoItem::new(kind, args.fecha_prestacion, monto_presentado),
            )
            .await
            .map_err(|e| ToolError::domain(CONTEXT, e))?;

        to_result(item_id.value())
    }
}

#[derive(Debug, Deserialize, Validate)]
struct ReintegroIdArgs {
    #[validate(range(min = 1, message = "reintegro_id debe ser un entero positivo"))]
    reintegro_id: i32,
}

/// `adjuntar_documentos_a_reintegro`: hands the claim to the upload form
pub struct AdjuntarDocumentos {
    reintegros: Arc<dyn ReintegroPort>,
    upload_base_url: String,
}

impl AdjuntarDocumentos {
    pub fn new(reintegros: Arc<dyn ReintegroPort>, upload_base_url: String) -> Self {
        Self {
            reintegros,
            upload_base_url,
        }
    }
}

#[async_trait]
impl McpTool for AdjuntarDocumentos {
    fn name(&self) -> &'static str {
        "adjuntar_documentos_a_reintegro"
    }

    fn description(&self) -> &'static str {
        "Activa el formulario donde el afiliado sube los comprobantes y envía el reintegro.\n\n\
         Cuándo usarla: solo cuando el reintegro ya tiene al menos un ítem.\n\
         OBLIGATORIO: preguntale siempre al usuario antes de llamarla, por ejemplo \
         \"¿Querés que active el formulario para subir los comprobantes ahora?\".\n\n\
         Después de activarlo, decile que puede subir hasta 2 comprobantes en PDF y que al \
         presionar 'Enviar reintegro' el trámite queda cerrado y ya no se puede modificar.\n\
         No existe una herramienta para finalizar desde acá y no hay que llamar más herramientas \
         en este flujo. No muestres al usuario los detalles técnicos de la respuesta."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "reintegro_id": {
                    "type": "integer",
                    "description": "ID del reintegro (referencia interna, no mostrarla)"
                }
            },
            "required": ["reintegro_id"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "adjuntar_documentos_a_reintegro"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ReintegroIdArgs = parse_arguments(arguments)?;

        let updated = self
            .reintegros
            .request_attachments(ReintegroId::new(args.reintegro_id))
            .await
            .map_err(|e| ToolError::domain("Error al activar el formulario de adjuntos", e))?;

        if !updated {
            return Err(ToolError::NotApplied(format!(
                "No se pudo actualizar el reintegro con ID {}",
                args.reintegro_id
            )));
        }

        info!(reintegro_id = args.reintegro_id, "Claim waiting for attachments");
        to_result(ActivarFormularioResponse::new(
            args.reintegro_id,
            &self.upload_base_url,
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
struct ListarReintegrosArgs {
    #[validate(range(min = 1, message = "afiliado_id debe ser un entero positivo"))]
    afiliado_id: i32,
    fecha_desde: NaiveDate,
    fecha_hasta: NaiveDate,
}

/// `listar_reintegros_afiliado`: claims presented within a date range
pub struct ListarReintegros {
    reintegros: Arc<dyn ReintegroPort>,
}

impl ListarReintegros {
    pub fn new(reintegros: Arc<dyn ReintegroPort>) -> Self {
        Self { reintegros }
    }
}

#[async_trait]
impl McpTool for ListarReintegros {
    fn name(&self) -> &'static str {
        "listar_reintegros_afiliado"
    }

    fn description(&self) -> &'static str {
        "Lista los reintegros de un afiliado presentados dentro de un rango de fechas (ambos extremos incluidos), \
         del más reciente al más antiguo.\n\n\
         - Pedile al usuario el rango en formato YYYY-MM-DD.\n\
         - Si solo tiene una fecha estimada, usá ese día ±5 días como rango.\n\
         - Confirmá el rango con el usuario antes de llamar a la herramienta.\n\
         Si no hay reintegros en el rango, devuelve una lista vacía."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "afiliado_id": {
                    "type": "integer",
                    "description": "ID del afiliado"
                },
                "fecha_desde": {
                    "type": "string",
                    "format": "date",
                    "description": "Fecha inicial, inclusive (YYYY-MM-DD)"
                },
                "fecha_hasta": {
                    "type": "string",
                    "format": "date",
                    "description": "Fecha final, inclusive (YYYY-MM-DD)"
                }
            },
            "required": ["afiliado_id", "fecha_desde", "fecha_hasta"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "listar_reintegros_afiliado"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ListarReintegrosArgs = parse_arguments(arguments)?;

        let reintegros = self
            .reintegros
            .list_by_afiliado(
                AfiliadoId::new(args.afiliado_id),
                DateRange::new(args.fecha_desde, args.fecha_hasta),
            )
            .await
            .map_err(|e| ToolError::domain("Error al listar reintegros del afiliado", e))?;

        to_result(
            reintegros
                .into_iter()
                .map(ReintegroResponse::from)
                .collect::<Vec<_>>(),
        )
    }
}

/// `detalle_reintegro`: a claim with its items and uploaded documents
pub struct DetalleReintegro {
    reintegros: Arc<dyn ReintegroPort>,
}

impl DetalleReintegro {
    pub fn new(reintegros: Arc<dyn ReintegroPort>) -> Self {
        Self { reintegros }
    }
}

#[async_trait]
impl McpTool for DetalleReintegro {
    fn name(&self) -> &'static str {
        "detalle_reintegro"
    }

    fn description(&self) -> &'static str {
        "Devuelve un reintegro con su estado, sus ítems y los comprobantes subidos, o `null` si no existe.\n\n\
         Usala para responder consultas sobre un reintegro puntual (por ejemplo, uno obtenido con \
         `listar_reintegros_afiliado`). No modifica nada."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "reintegro_id": {
                    "type": "integer",
                    "description": "ID del reintegro"
                }
            },
            "required": ["reintegro_id"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "detalle_reintegro"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ReintegroIdArgs = parse_arguments(arguments)?;

        let detalle = self
            .reintegros
            .get_detalle(ReintegroId::new(args.reintegro_id))
            .await
            .map_err(|e| ToolError::domain("Error al obtener el reintegro", e))?;

        to_result(detalle.map(ReintegroDetalleResponse::from))
    }
}

/// `enviar_reintegro_a_revision`: sends a claim to review without the form
///
/// Only registered when review submission is enabled.
pub struct EnviarARevision {
    reintegros: Arc<dyn ReintegroPort>,
}

impl EnviarARevision {
    pub fn new(reintegros: Arc<dyn ReintegroPort>) -> Self {
        Self { reintegros }
    }
}

#[async_trait]
impl McpTool for EnviarARevision {
    fn name(&self) -> &'static str {
        "enviar_reintegro_a_revision"
    }

    fn description(&self) -> &'static str {
        "Envía un reintegro a revisión (estado en_revision) sin pasar por el formulario de adjuntos.\n\n\
         Usala solo si el usuario confirma que no va a adjuntar comprobantes. Devuelve `true` si el \
         reintegro se actualizó y `false` si no existe."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "reintegro_id": {
                    "type": "integer",
                    "description": "ID del reintegro"
                }
            },
            "required": ["reintegro_id"]
        })
    }

    #[instrument(skip(self, arguments), fields(tool = "enviar_reintegro_a_revision"))]
    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ReintegroIdArgs = parse_arguments(arguments)?;

        let updated = self
            .reintegros
            .submit_for_review(ReintegroId::new(args.reintegro_id))
            .await
            .map_err(|e| ToolError::domain("Error al enviar el reintegro a revisión", e))?;

        to_result(updated)
    }
}
