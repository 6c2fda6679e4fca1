//! Reimbursement Domain Ports
//!
//! The tool surface only talks to these traits. The PostgreSQL adapter in
//! `infra_db` implements all three; tests use the in-memory adapter from
//! `test_utils`.
//!
//! Every call is one independent round trip. Adapters must not keep state
//! between calls beyond what the backing store holds.

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{AfiliadoId, DateRange, DomainPort, ItemId, PlanId, ReintegroId};

use crate::afiliado::Afiliado;
use crate::error::ReintegroError;
use crate::item::NuevoItem;
use crate::practica::Practica;
use crate::reintegro::{NuevoReintegro, Reintegro, ReintegroDetalle};

/// Read access to affiliates
#[async_trait]
pub trait AfiliadoPort: DomainPort {
    /// Finds the affiliate with exactly this document type and number
    async fn find_by_documento(
        &self,
        tipo_doc: &str,
        nro_doc: &str,
    ) -> Result<Option<Afiliado>, ReintegroError>;
}

/// Read access to the practice catalog
#[async_trait]
pub trait PracticaPort: DomainPort {
    /// Case-insensitive substring search on the practice name
    async fn search_by_nombre(&self, nombre: &str) -> Result<Vec<Practica>, ReintegroError>;

    /// Practices covered by a plan
    async fn covered_by_plan(&self, plan_id: PlanId) -> Result<Vec<Practica>, ReintegroError>;
}

/// Claim lifecycle operations
#[async_trait]
pub trait ReintegroPort: DomainPort {
    /// Inserts a claim in `PENDIENTE` with a zero approved total
    async fn create(&self, nuevo: NuevoReintegro) -> Result<ReintegroId, ReintegroError>;

    /// Appends a line item; the claim's existence and state are not checked
    async fn add_item(
        &self,
        reintegro_id: ReintegroId,
        item: NuevoItem,
    ) -> Result<ItemId, ReintegroError>;

    /// Moves the claim to `ESPERANDO_ADJUNTOS`; `false` when no row matched
    async fn request_attachments(&self, reintegro_id: ReintegroId) -> Result<bool, ReintegroError>;

    /// Moves the claim to `en_revision`; `false` when no row matched
    async fn submit_for_review(&self, reintegro_id: ReintegroId) -> Result<bool, ReintegroError>;

    /// Claims of an affiliate presented within the range, newest first
    async fn list_by_afiliado(
        &self,
        afiliado_id: AfiliadoId,
        range: DateRange,
    ) -> Result<Vec<Reintegro>, ReintegroError>;

    /// A claim with its items and documents
    async fn get_detalle(
        &self,
        reintegro_id: ReintegroId,
    ) -> Result<Option<ReintegroDetalle>, ReintegroError>;
}

/// The set of ports the tool surface is wired with
#[derive(Clone)]
pub struct Ports {
    pub afiliados: Arc<dyn AfiliadoPort>,
    pub practicas: Arc<dyn PracticaPort>,
    pub reintegros: Arc<dyn ReintegroPort>,
}

impl Ports {
    /// Wires all three ports to a single adapter
    pub fn from_adapter<A>(adapter: Arc<A>) -> Self
    where
        A: AfiliadoPort + PracticaPort + ReintegroPort,
    {
        Self {
            afiliados: adapter.clone(),
            practicas: adapter.clone(),
            reintegros: adapter,
        }
    }
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ports").finish_non_exhaustive()
    }
}
