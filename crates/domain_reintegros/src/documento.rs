//! Uploaded document metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DocumentoId, ReintegroId};

/// A file attached to a claim by the upload UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documento {
    pub id: DocumentoId,
    pub reintegro_id: ReintegroId,
    pub nombre_archivo: String,
    pub ruta: String,
    pub tipo_mime: Option<String>,
    pub subido_at: DateTime<Utc>,
}
