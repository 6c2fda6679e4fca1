//! Claim line items
//!
//! An item is either a practice or a medicine. The kind carries only the
//! foreign key that belongs to it, so an item tagged as a practice without a
//! practice id cannot be built.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{ItemId, MedicamentoId, Money, PracticaId, ReintegroId};
use crate::error::ReintegroError;

/// Tag the tool surface uses for practice items
pub const TAG_PRACTICA: &str = "P";
/// Tag the tool surface uses for medicine items
pub const TAG_MEDICAMENTO: &str = "M";

/// What a line item is reimbursing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "id", rename_all = "snake_case")]
pub enum ItemKind {
    Practica(PracticaId),
    Medicamento(MedicamentoId),
}

impl ItemKind {
    /// Builds the kind from the external `"P"`/`"M"` tag and optional keys
    ///
    /// The key belonging to the other kind is ignored. A missing key, or a
    /// key that cannot reference a row (zero or negative), is rejected.
    pub fn from_tag(
        tag: &str,
        practica_id: Option<PracticaId>,
        medicamento_id: Option<MedicamentoId>,
    ) -> Result<Self, ReintegroError> {
        match tag {
            TAG_PRACTICA => practica_id
                .filter(PracticaId::is_assigned)
                .map(ItemKind::Practica)
                .ok_or_else(|| {
                    ReintegroError::validation("practica_id es requerido cuando el tipo es 'P'")
                }),
            TAG_MEDICAMENTO => medicamento_id
                .filter(MedicamentoId::is_assigned)
                .map(ItemKind::Medicamento)
                .ok_or_else(|| {
                    ReintegroError::validation("medicamento_id es requerido cuando el tipo es 'M'")
                }),
            other => Err(ReintegroError::validation(format!(
                "El valor de 'tipo' debe ser 'M' o 'P' (recibido: '{}')",
                other
            ))),
        }
    }

    /// Rebuilds the kind from the stored `tipo` column and nullable keys
    pub fn from_stored(
        tipo: &str,
        practica_id: Option<i32>,
        medicamento_id: Option<i32>,
    ) -> Result<Self, ReintegroError> {
        match (tipo, practica_id, medicamento_id) {
            ("practica", Some(id), _) => Ok(ItemKind::Practica(PracticaId::new(id))),
            ("medicamento", _, Some(id)) => Ok(ItemKind::Medicamento(MedicamentoId::new(id))),
            _ => Err(ReintegroError::validation(format!(
                "Ítem almacenado inconsistente: tipo='{}', practica_id={:?}, medicamento_id={:?}",
                tipo, practica_id, medicamento_id
            ))),
        }
    }

    /// Returns the external tag
    pub fn tag(&self) -> &'static str {
        match self {
            ItemKind::Practica(_) => TAG_PRACTICA,
            ItemKind::Medicamento(_) => TAG_MEDICAMENTO,
        }
    }

    /// Returns the value stored in the `tipo` column
    pub fn stored_tipo(&self) -> &'static str {
        match self {
            ItemKind::Practica(_) => "practica",
            ItemKind::Medicamento(_) => "medicamento",
        }
    }

    pub fn practica_id(&self) -> Option<PracticaId> {
        match self {
            ItemKind::Practica(id) => Some(*id),
            ItemKind::Medicamento(_) => None,
        }
    }

    pub fn medicamento_id(&self) -> Option<MedicamentoId> {
        match self {
            ItemKind::Medicamento(id) => Some(*id),
            ItemKind::Practica(_) => None,
        }
    }
}

/// Data for appending a line item to a claim
#[derive(Debug, Clone, PartialEq)]
pub struct NuevoItem {
    pub kind: ItemKind,
    pub fecha_prestacion: NaiveDate,
    pub monto_presentado: Money,
}

impl NuevoItem {
    pub fn new(kind: ItemKind, fecha_prestacion: NaiveDate, monto_presentado: Money) -> Self {
        Self {
            kind,
            fecha_prestacion,
            monto_presentado,
        }
    }
}

/// A stored line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReintegroItem {
    pub id: ItemId,
    pub reintegro_id: ReintegroId,
    pub kind: ItemKind,
    pub fecha_prestacion: NaiveDate,
    pub monto_presentado: Money,
    /// Set by adjudication outside this system
    pub monto_aprobado: Option<Money>,
    pub copago: Option<Money>,
}
