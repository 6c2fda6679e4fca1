//! In-Memory Port Adapter
//!
//! Implements every reimbursement port over plain collections so tool and
//! workflow tests run without a database. The semantics follow the SQL the
//! PostgreSQL adapter issues:
//!
//! - New claims are presented on the store's "today" date
//! - Items must reference an existing claim and catalog entry (foreign keys)
//! - State updates report whether a row matched
//! - Listings are inclusive on both ends and newest first

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use core_kernel::{
    AfiliadoId, DateRange, DocumentoId, DomainPort, HealthCheckResult, HealthCheckable, ItemId,
    MedicamentoId, PlanId, PracticaId, ReintegroId,
};
use domain_reintegros::{
    Afiliado, AfiliadoPort, Documento, EstadoReintegro, ItemKind, NuevoItem, NuevoReintegro,
    Practica, PracticaPort, Reintegro, ReintegroDetalle, ReintegroError, ReintegroItem,
    ReintegroPort,
};

use crate::fixtures::{AfiliadoFixtures, PracticaFixtures, TemporalFixtures};

#[derive(Debug, Default)]
struct StoreState {
    afiliados: Vec<Afiliado>,
    practicas: Vec<Practica>,
    coberturas: Vec<(PlanId, PracticaId)>,
    medicamentos: Vec<MedicamentoId>,
    reintegros: BTreeMap<ReintegroId, Reintegro>,
    items: BTreeMap<ItemId, ReintegroItem>,
    documentos: Vec<Documento>,
    next_reintegro_id: i32,
    next_item_id: i32,
    next_documento_id: i32,
    failure: Option<String>,
}

impl StoreState {
    fn check_failure(&self, operation: &'static str) -> Result<(), ReintegroError> {
        match &self.failure {
            Some(message) => Err(ReintegroError::persistence(operation, message)),
            None => Ok(()),
        }
    }
}

/// Port adapter backed by in-process collections
#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
    today: NaiveDate,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store whose "today" is the fixture reference date
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                next_reintegro_id: 1,
                next_item_id: 1,
                next_documento_id: 1,
                ..StoreState::default()
            }),
            today: TemporalFixtures::today(),
        }
    }

    /// Creates a store preloaded with the standard affiliates and catalog
    pub async fn seeded() -> Self {
        let store = Self::new();
        for afiliado in AfiliadoFixtures::all() {
            store.add_afiliado(afiliado).await;
        }
        for practica in PracticaFixtures::all() {
            store.add_practica(practica).await;
        }
        for practica_id in PracticaFixtures::covered_by_plan_general() {
            store
                .add_cobertura(AfiliadoFixtures::plan_general(), practica_id)
                .await;
        }
        store.add_medicamento(PracticaFixtures::medicamento_id()).await;
        store
    }

    /// Sets the date new claims are presented on
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn add_afiliado(&self, afiliado: Afiliado) {
        self.state.write().await.afiliados.push(afiliado);
    }

    pub async fn add_practica(&self, practica: Practica) {
        self.state.write().await.practicas.push(practica);
    }

    pub async fn add_cobertura(&self, plan_id: PlanId, practica_id: PracticaId) {
        self.state.write().await.coberturas.push((plan_id, practica_id));
    }

    pub async fn add_medicamento(&self, medicamento_id: MedicamentoId) {
        self.state.write().await.medicamentos.push(medicamento_id);
    }

    /// Stores a claim as-is, bypassing the create path
    ///
    /// Used to place claims on arbitrary presentation dates.
    pub async fn insert_reintegro(&self, reintegro: Reintegro) {
        let mut state = self.state.write().await;
        state.next_reintegro_id = state.next_reintegro_id.max(reintegro.id.value() + 1);
        state.reintegros.insert(reintegro.id, reintegro);
    }

    /// Records a document the way the upload form would
    pub async fn attach_documento(
        &self,
        reintegro_id: ReintegroId,
        nombre_archivo: &str,
    ) -> DocumentoId {
        let mut state = self.state.write().await;
        let id = DocumentoId::new(state.next_documento_id);
        state.next_documento_id += 1;
        state.documentos.push(Documento {
            id,
            reintegro_id,
            nombre_archivo: nombre_archivo.to_string(),
            ruta: format!("uploads/{}/{}", reintegro_id, nombre_archivo),
            tipo_mime: Some("application/pdf".to_string()),
            subido_at: Utc::now(),
        });
        id
    }

    /// Sets a claim's state directly, as the upload form does on submit
    pub async fn force_estado(&self, reintegro_id: ReintegroId, estado: EstadoReintegro) {
        if let Some(reintegro) = self.state.write().await.reintegros.get_mut(&reintegro_id) {
            reintegro.estado = estado;
            reintegro.updated_at = Utc::now();
        }
    }

    /// Makes every subsequent port call fail with a persistence error
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.write().await.failure = Some(message.into());
    }

    /// Returns a stored claim
    pub async fn reintegro(&self, reintegro_id: ReintegroId) -> Option<Reintegro> {
        self.state.read().await.reintegros.get(&reintegro_id).cloned()
    }

    /// Number of items stored for a claim
    pub async fn item_count(&self, reintegro_id: ReintegroId) -> usize {
        self.state
            .read()
            .await
            .items
            .values()
            .filter(|item| item.reintegro_id == reintegro_id)
            .count()
    }
}

impl DomainPort for InMemoryStore {}

#[async_trait]
impl HealthCheckable for InMemoryStore {
    async fn health_check(&self) -> HealthCheckResult {
        match &self.state.read().await.failure {
            Some(message) => HealthCheckResult::unhealthy("in-memory-store", 0, message.clone()),
            None => HealthCheckResult::healthy("in-memory-store", 0),
        }
    }
}

#[async_trait]
impl AfiliadoPort for InMemoryStore {
    async fn find_by_documento(
        &self,
        tipo_doc: &str,
        nro_doc: &str,
    ) -> Result<Option<Afiliado>, ReintegroError> {
        let state = self.state.read().await;
        state.check_failure("find_afiliado_by_documento")?;

        Ok(state
            .afiliados
            .iter()
            .find(|a| a.tipo_doc == tipo_doc && a.nro_doc == nro_doc)
            .cloned())
    }
}

#[async_trait]
impl PracticaPort for InMemoryStore {
    async fn search_by_nombre(&self, nombre: &str) -> Result<Vec<Practica>, ReintegroError> {
        let state = self.state.read().await;
        state.check_failure("search_practicas_by_nombre")?;

        Ok(state
            .practicas
            .iter()
            .filter(|p| p.nombre_contiene(nombre))
            .cloned()
            .collect())
    }

    async fn covered_by_plan(&self, plan_id: PlanId) -> Result<Vec<Practica>, ReintegroError> {
        let state = self.state.read().await;
        state.check_failure("list_practicas_cubiertas")?;

        Ok(state
            .practicas
            .iter()
            .filter(|p| state.coberturas.contains(&(plan_id, p.id)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReintegroPort for InMemoryStore {
    async fn create(&self, nuevo: NuevoReintegro) -> Result<ReintegroId, ReintegroError> {
        const OP: &str = "create_reintegro";

        let mut state = self.state.write().await;
        state.check_failure(OP)?;

        if !state.afiliados.iter().any(|a| a.id == nuevo.afiliado_id) {
            return Err(ReintegroError::persistence(
                OP,
                format!("Foreign key violation: afiliado {} does not exist", nuevo.afiliado_id),
            ));
        }

        let id = ReintegroId::new(state.next_reintegro_id);
        state.next_reintegro_id += 1;

        let now = Utc::now();
        state.reintegros.insert(
            id,
            Reintegro {
                id,
                afiliado_id: nuevo.afiliado_id,
                estado: nuevo.estado_inicial(),
                fecha_presentacion: self.today,
                total_presentado: nuevo.total_presentado,
                total_aprobado: nuevo.total_aprobado_inicial(),
                adjuntos_confirmados: false,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(id)
    }

    async fn add_item(
        &self,
        reintegro_id: ReintegroId,
        item: NuevoItem,
    ) -> Result<ItemId, ReintegroError> {
        const OP: &str = "add_item_to_reintegro";

        let mut state = self.state.write().await;
        state.check_failure(OP)?;

        if !state.reintegros.contains_key(&reintegro_id) {
            return Err(ReintegroError::persistence(
                OP,
                format!("Foreign key violation: reintegro {} does not exist", reintegro_id),
            ));
        }

        let catalog_entry_exists = match item.kind {
            ItemKind::Practica(id) => state.practicas.iter().any(|p| p.id == id),
            ItemKind::Medicamento(id) => state.medicamentos.contains(&id),
        };
        if !catalog_entry_exists {
            return Err(ReintegroError::persistence(
                OP,
                format!("Foreign key violation: {:?} does not exist", item.kind),
            ));
        }

        let id = ItemId::new(state.next_item_id);
        state.next_item_id += 1;
        state.items.insert(
            id,
            ReintegroItem {
                id,
                reintegro_id,
                kind: item.kind,
                fecha_prestacion: item.fecha_prestacion,
                monto_presentado: item.monto_presentado,
                monto_aprobado: None,
                copago: None,
            },
        );

        Ok(id)
    }

    async fn request_attachments(&self, reintegro_id: ReintegroId) -> Result<bool, ReintegroError> {
        let mut state = self.state.write().await;
        state.check_failure("request_attachments")?;

        Ok(match state.reintegros.get_mut(&reintegro_id) {
            Some(reintegro) => {
                reintegro.estado = EstadoReintegro::EsperandoAdjuntos;
                reintegro.adjuntos_confirmados = false;
                reintegro.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn submit_for_review(&self, reintegro_id: ReintegroId) -> Result<bool, ReintegroError> {
        let mut state = self.state.write().await;
        state.check_failure("submit_for_review")?;

        Ok(match state.reintegros.get_mut(&reintegro_id) {
            Some(reintegro) => {
                reintegro.estado = EstadoReintegro::EnRevision;
                reintegro.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn list_by_afiliado(
        &self,
        afiliado_id: AfiliadoId,
        range: DateRange,
    ) -> Result<Vec<Reintegro>, ReintegroError> {
        let state = self.state.read().await;
        state.check_failure("list_reintegros_by_afiliado")?;

        let mut reintegros: Vec<Reintegro> = state
            .reintegros
            .values()
            .filter(|r| r.afiliado_id == afiliado_id && range.contains(r.fecha_presentacion))
            .cloned()
            .collect();

        reintegros.sort_by(|a, b| {
            b.fecha_presentacion
                .cmp(&a.fecha_presentacion)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(reintegros)
    }

    async fn get_detalle(
        &self,
        reintegro_id: ReintegroId,
    ) -> Result<Option<ReintegroDetalle>, ReintegroError> {
        let state = self.state.read().await;
        state.check_failure("get_reintegro_detalle")?;

        let Some(reintegro) = state.reintegros.get(&reintegro_id).cloned() else {
            return Ok(None);
        };

        let items = state
            .items
            .values()
            .filter(|item| item.reintegro_id == reintegro_id)
            .cloned()
            .collect();

        let mut documentos: Vec<Documento> = state
            .documentos
            .iter()
            .filter(|doc| doc.reintegro_id == reintegro_id)
            .cloned()
            .collect();
        documentos.sort_by(|a, b| a.subido_at.cmp(&b.subido_at).then_with(|| a.id.cmp(&b.id)));

        Ok(Some(ReintegroDetalle {
            reintegro,
            items,
            documentos,
        }))
    }
}
