//! Tool result shapes
//!
//! Every record keeps its table's column names on the wire (`afiliado_id`,
//! `practica_id`, ...). Amounts are plain JSON numbers, dates are
//! `YYYY-MM-DD`, and timestamps are RFC 3339.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use core_kernel::Money;
use domain_reintegros::{Afiliado, Documento, Practica, Reintegro, ReintegroDetalle, ReintegroItem};

#[derive(Debug, Clone, Serialize)]
pub struct AfiliadoResponse {
    pub afiliado_id: i32,
    pub tipo_doc: String,
    pub nro_doc: String,
    pub nombre: String,
    pub apellido: String,
    pub fecha_nac: Option<NaiveDate>,
    pub email: Option<String>,
    pub tel: Option<String>,
    pub plan_id: Option<i32>,
}

impl From<Afiliado> for AfiliadoResponse {
    fn from(afiliado: Afiliado) -> Self {
        Self {
            afiliado_id: afiliado.id.value(),
            tipo_doc: afiliado.tipo_doc,
            nro_doc: afiliado.nro_doc,
            nombre: afiliado.nombre,
            apellido: afiliado.apellido,
            fecha_nac: afiliado.fecha_nac,
            email: afiliado.email,
            tel: afiliado.tel,
            plan_id: afiliado.plan_id.map(|id| id.value()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PracticaResponse {
    pub practica_id: i32,
    pub codigo: String,
    pub nombre: String,
    pub requiere_autorizacion: bool,
}

impl From<Practica> for PracticaResponse {
    fn from(practica: Practica) -> Self {
        Self {
            practica_id: practica.id.value(),
            codigo: practica.codigo,
            nombre: practica.nombre,
            requiere_autorizacion: practica.requiere_autorizacion,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReintegroResponse {
    pub reintegro_id: i32,
    pub afiliado_id: i32,
    pub estado: String,
    pub fecha_presentacion: NaiveDate,
    pub total_presentado: Money,
    pub total_aprobado: Money,
    pub adjuntos_confirmados: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reintegro> for ReintegroResponse {
    fn from(reintegro: Reintegro) -> Self {
        Self {
            reintegro_id: reintegro.id.value(),
            afiliado_id: reintegro.afiliado_id.value(),
            estado: reintegro.estado.as_str().to_string(),
            fecha_presentacion: reintegro.fecha_presentacion,
            total_presentado: reintegro.total_presentado,
            total_aprobado: reintegro.total_aprobado,
            adjuntos_confirmados: reintegro.adjuntos_confirmados,
            created_at: reintegro.created_at,
            updated_at: reintegro.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    pub item_id: i32,
    pub tipo: &'static str,
    pub practica_id: Option<i32>,
    pub medicamento_id: Option<i32>,
    pub fecha_prestacion: NaiveDate,
    pub monto_presentado: Money,
    pub monto_aprobado: Option<Money>,
    pub copago: Option<Money>,
}

impl From<ReintegroItem> for ItemResponse {
    fn from(item: ReintegroItem) -> Self {
        Self {
            item_id: item.id.value(),
            tipo: item.kind.stored_tipo(),
            practica_id: item.kind.practica_id().map(|id| id.value()),
            medicamento_id: item.kind.medicamento_id().map(|id| id.value()),
            fecha_prestacion: item.fecha_prestacion,
            monto_presentado: item.monto_presentado,
            monto_aprobado: item.monto_aprobado,
            copago: item.copago,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentoResponse {
    pub documento_id: i32,
    pub nombre_archivo: String,
    pub tipo_mime: Option<String>,
    pub subido_at: DateTime<Utc>,
}

impl From<Documento> for DocumentoResponse {
    fn from(documento: Documento) -> Self {
        Self {
            documento_id: documento.id.value(),
            nombre_archivo: documento.nombre_archivo,
            tipo_mime: documento.tipo_mime,
            subido_at: documento.subido_at,
        }
    }
}

/// A claim with its items, documents, and the sum of its item amounts
#[derive(Debug, Clone, Serialize)]
pub struct ReintegroDetalleResponse {
    #[serde(flatten)]
    pub reintegro: ReintegroResponse,
    pub total_items: Money,
    pub items: Vec<ItemResponse>,
    pub documentos: Vec<DocumentoResponse>,
}

impl From<ReintegroDetalle> for ReintegroDetalleResponse {
    fn from(detalle: ReintegroDetalle) -> Self {
        let total_items = detalle.total_items();
        Self {
            reintegro: detalle.reintegro.into(),
            total_items,
            items: detalle.items.into_iter().map(Into::into).collect(),
            documentos: detalle.documentos.into_iter().map(Into::into).collect(),
        }
    }
}

/// Instruction for the client to open the upload form
#[derive(Debug, Clone, Serialize)]
pub struct ActivarFormularioResponse {
    pub accion: &'static str,
    pub reintegro_id: i32,
    pub url: String,
}

impl ActivarFormularioResponse {
    pub const ACCION: &'static str = "activar_form_reintegro";

    pub fn new(reintegro_id: i32, upload_base_url: &str) -> Self {
        Self {
            accion: Self::ACCION,
            reintegro_id,
            url: format!(
                "{}/reintegros/{}",
                upload_base_url.trim_end_matches('/'),
                reintegro_id
            ),
        }
    }
}
