//! Reimbursement claim aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AfiliadoId, Money, ReintegroId};
use crate::documento::Documento;
use crate::error::ReintegroError;
use crate::item::ReintegroItem;

/// Claim lifecycle state as stored in the `estado` column
///
/// The stored spellings are mixed-case in the existing data and must be kept
/// byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstadoReintegro {
    /// Created, accepting items
    #[serde(rename = "PENDIENTE")]
    Pendiente,
    /// Handed to the upload form, waiting for the affiliate's files
    #[serde(rename = "ESPERANDO_ADJUNTOS")]
    EsperandoAdjuntos,
    /// Submitted for review without going through the upload form
    #[serde(rename = "en_revision")]
    EnRevision,
    /// Submitted from the upload form; closed
    #[serde(rename = "ENVIADO")]
    Enviado,
}

impl EstadoReintegro {
    /// Returns the value stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoReintegro::Pendiente => "PENDIENTE",
            EstadoReintegro::EsperandoAdjuntos => "ESPERANDO_ADJUNTOS",
            EstadoReintegro::EnRevision => "en_revision",
            EstadoReintegro::Enviado => "ENVIADO",
        }
    }

    /// Returns true once the claim has been submitted and must not change
    pub fn is_closed(&self) -> bool {
        matches!(self, EstadoReintegro::Enviado)
    }

    /// Returns true while the intended flow still appends items
    pub fn accepts_items(&self) -> bool {
        matches!(self, EstadoReintegro::Pendiente)
    }

    /// Returns true if moving to `target` follows the intended flow
    ///
    /// Informational only: the write operations never consult it.
    pub fn is_intended_transition(&self, target: EstadoReintegro) -> bool {
        use EstadoReintegro::*;
        matches!(
            (self, target),
            (Pendiente, Pendiente)
                | (Pendiente, EsperandoAdjuntos)
                | (Pendiente, EnRevision)
                | (EsperandoAdjuntos, Enviado)
        )
    }
}

impl fmt::Display for EstadoReintegro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoReintegro {
    type Err = ReintegroError;

    /// Case-insensitive: early rows were written as `pendiente`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            EstadoReintegro::Pendiente,
            EstadoReintegro::EsperandoAdjuntos,
            EstadoReintegro::EnRevision,
            EstadoReintegro::Enviado,
        ]
        .into_iter()
        .find(|estado| estado.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| ReintegroError::validation(format!("Estado de reintegro desconocido: '{}'", s)))
    }
}

/// A reimbursement claim submitted by an affiliate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reintegro {
    pub id: ReintegroId,
    pub afiliado_id: AfiliadoId,
    pub estado: EstadoReintegro,
    /// Date the claim was presented; listings filter on it
    pub fecha_presentacion: NaiveDate,
    pub total_presentado: Money,
    /// Always zero here; adjudication happens elsewhere
    pub total_aprobado: Money,
    pub adjuntos_confirmados: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new claim shell
#[derive(Debug, Clone, PartialEq)]
pub struct NuevoReintegro {
    pub afiliado_id: AfiliadoId,
    pub total_presentado: Money,
}

impl NuevoReintegro {
    /// Creates a claim request with a zero presented total
    pub fn new(afiliado_id: AfiliadoId) -> Self {
        Self {
            afiliado_id,
            total_presentado: Money::zero(),
        }
    }

    /// Sets the presented total declared up front
    pub fn with_total_presentado(mut self, total: Money) -> Self {
        self.total_presentado = total;
        self
    }

    /// State every new claim starts in
    pub fn estado_inicial(&self) -> EstadoReintegro {
        EstadoReintegro::Pendiente
    }

    /// Approved total every new claim starts with
    pub fn total_aprobado_inicial(&self) -> Money {
        Money::zero()
    }
}

/// A claim together with its line items and uploaded documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReintegroDetalle {
    pub reintegro: Reintegro,
    pub items: Vec<ReintegroItem>,
    pub documentos: Vec<Documento>,
}

impl ReintegroDetalle {
    /// Sum of the presented amounts of every item
    ///
    /// Computed on read; the claim's own totals are never updated from items.
    pub fn total_items(&self) -> Money {
        self.items.iter().map(|item| item.monto_presentado).sum()
    }
}
