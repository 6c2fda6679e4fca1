//! Affiliate records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{AfiliadoId, PlanId};

/// A health-plan member, identified by document type and number
///
/// Enrollment happens elsewhere; this system only reads affiliates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Afiliado {
    pub id: AfiliadoId,
    /// Document type (DNI, PASAPORTE, ...)
    pub tipo_doc: String,
    pub nro_doc: String,
    pub nombre: String,
    pub apellido: String,
    pub fecha_nac: Option<NaiveDate>,
    pub email: Option<String>,
    pub tel: Option<String>,
    /// Coverage plan, if one is assigned
    pub plan_id: Option<PlanId>,
}
