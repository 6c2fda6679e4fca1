//! Medical practice catalog entries

use serde::{Deserialize, Serialize};

use core_kernel::PracticaId;

/// A billable medical procedure or service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practica {
    pub id: PracticaId,
    pub codigo: String,
    pub nombre: String,
    pub requiere_autorizacion: bool,
}

impl Practica {
    /// Case-insensitive substring match on the practice name
    ///
    /// Mirrors `nombre ILIKE '%term%'`.
    pub fn nombre_contiene(&self, term: &str) -> bool {
        self.nombre.to_lowercase().contains(&term.to_lowercase())
    }
}
