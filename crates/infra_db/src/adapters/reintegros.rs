//! PostgreSQL Reimbursement Adapter
//!
//! Implements the affiliate, practice, and claim ports on top of the
//! repositories. It:
//!
//! - Translates domain requests into repository calls
//! - Converts row structs into domain records field by field
//! - Flattens every database failure into `ReintegroError::Persistence`
//!   tagged with the operation name

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use core_kernel::{
    AdapterHealth, AfiliadoId, DateRange, DocumentoId, DomainPort, HealthCheckResult,
    HealthCheckable, ItemId, Money, PlanId, PracticaId, ReintegroId,
};
use domain_reintegros::{
    Afiliado, AfiliadoPort, Documento, EstadoReintegro, ItemKind, NuevoItem, NuevoReintegro,
    Practica, PracticaPort, Reintegro, ReintegroDetalle, ReintegroError, ReintegroItem,
    ReintegroPort,
};

use crate::error::DatabaseError;
use crate::repositories::{
    AfiliadoRepository, AfiliadoRow, DocumentoRow, NewReintegroItem, PracticaRepository,
    PracticaRow, ReintegroItemRow, ReintegroRepository, ReintegroRow,
};

const ADAPTER_ID: &str = "postgres-reintegros-adapter";

/// PostgreSQL-backed implementation of the reimbursement ports
#[derive(Debug, Clone)]
pub struct PostgresReintegrosAdapter {
    afiliados: AfiliadoRepository,
    practicas: PracticaRepository,
    reintegros: ReintegroRepository,
    pool: PgPool,
}

impl PostgresReintegrosAdapter {
    /// Creates a new adapter sharing one connection pool across repositories
    pub fn new(pool: PgPool) -> Self {
        Self {
            afiliados: AfiliadoRepository::new(pool.clone()),
            practicas: PracticaRepository::new(pool.clone()),
            reintegros: ReintegroRepository::new(pool.clone()),
            pool,
        }
    }

    /// Closes every pooled connection; used at shutdown
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl DomainPort for PostgresReintegrosAdapter {}

#[async_trait]
impl HealthCheckable for PostgresReintegrosAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e))
            }
        }
    }
}

#[async_trait]
impl AfiliadoPort for PostgresReintegrosAdapter {
    #[instrument(skip(self, nro_doc), fields(tipo_doc = %tipo_doc))]
    async fn find_by_documento(
        &self,
        tipo_doc: &str,
        nro_doc: &str,
    ) -> Result<Option<Afiliado>, ReintegroError> {
        const OP: &str = "find_afiliado_by_documento";

        let row = self
            .afiliados
            .find_by_documento(tipo_doc, nro_doc)
            .await
            .map_err(|e| db_error(OP, e))?;

        debug!(found = row.is_some(), "Affiliate lookup finished");
        Ok(row.map(row_to_afiliado))
    }
}

#[async_trait]
impl PracticaPort for PostgresReintegrosAdapter {
    #[instrument(skip(self))]
    async fn search_by_nombre(&self, nombre: &str) -> Result<Vec<Practica>, ReintegroError> {
        const OP: &str = "search_practicas_by_nombre";

        let rows = self
            .practicas
            .search_by_nombre(nombre)
            .await
            .map_err(|e| db_error(OP, e))?;

        debug!(count = rows.len(), "Practice search finished");
        Ok(rows.into_iter().map(row_to_practica).collect())
    }

    #[instrument(skip(self), fields(plan_id = %plan_id))]
    async fn covered_by_plan(&self, plan_id: PlanId) -> Result<Vec<Practica>, ReintegroError> {
        const OP: &str = "list_practicas_cubiertas";

        let rows = self
            .practicas
            .find_covered_by_plan(plan_id.value())
            .await
            .map_err(|e| db_error(OP, e))?;

        Ok(rows.into_iter().map(row_to_practica).collect())
    }
}

#[async_trait]
impl ReintegroPort for PostgresReintegrosAdapter {
    #[instrument(skip(self, nuevo), fields(afiliado_id = %nuevo.afiliado_id))]
    async fn create(&self, nuevo: NuevoReintegro) -> Result<ReintegroId, ReintegroError> {
        const OP: &str = "create_reintegro";

        let id = self
            .reintegros
            .insert(
                nuevo.afiliado_id.value(),
                nuevo.estado_inicial().as_str(),
                nuevo.total_presentado.amount(),
                nuevo.total_aprobado_inicial().amount(),
            )
            .await
            .map_err(|e| db_error(OP, e))?;

        Ok(ReintegroId::new(id))
    }

    #[instrument(skip(self, item), fields(reintegro_id = %reintegro_id, tipo = item.kind.tag()))]
    async fn add_item(
        &self,
        reintegro_id: ReintegroId,
        item: NuevoItem,
    ) -> Result<ItemId, ReintegroError> {
        const OP: &str = "add_item_to_reintegro";

        let id = self
            .reintegros
            .insert_item(NewReintegroItem {
                reintegro_id: reintegro_id.value(),
                tipo: item.kind.stored_tipo(),
                practica_id: item.kind.practica_id().map(|id| id.value()),
                medicamento_id: item.kind.medicamento_id().map(|id| id.value()),
                fecha_prestacion: item.fecha_prestacion,
                monto_presentado: item.monto_presentado.amount(),
            })
            .await
            .map_err(|e| db_error(OP, e))?;

        Ok(ItemId::new(id))
    }

    #[instrument(skip(self), fields(reintegro_id = %reintegro_id))]
    async fn request_attachments(&self, reintegro_id: ReintegroId) -> Result<bool, ReintegroError> {
        const OP: &str = "request_attachments";

        let updated = self
            .reintegros
            .update_estado_reset_adjuntos(
                reintegro_id.value(),
                EstadoReintegro::EsperandoAdjuntos.as_str(),
            )
            .await
            .map_err(|e| db_error(OP, e))?;

        debug!(updated, "Attachment request applied");
        Ok(updated > 0)
    }

    #[instrument(skip(self), fields(reintegro_id = %reintegro_id))]
    async fn submit_for_review(&self, reintegro_id: ReintegroId) -> Result<bool, ReintegroError> {
        const OP: &str = "submit_for_review";

        let updated = self
            .reintegros
            .update_estado(reintegro_id.value(), EstadoReintegro::EnRevision.as_str())
            .await
            .map_err(|e| db_error(OP, e))?;

        Ok(updated > 0)
    }

    #[instrument(skip(self), fields(afiliado_id = %afiliado_id, range = %range))]
    async fn list_by_afiliado(
        &self,
        afiliado_id: AfiliadoId,
        range: DateRange,
    ) -> Result<Vec<Reintegro>, ReintegroError> {
        const OP: &str = "list_reintegros_by_afiliado";

        let rows = self
            .reintegros
            .find_by_afiliado_between(afiliado_id.value(), range.desde, range.hasta)
            .await
            .map_err(|e| db_error(OP, e))?;

        rows.into_iter()
            .map(|row| row_to_reintegro(row).map_err(|e| db_error(OP, e)))
            .collect()
    }

    #[instrument(skip(self), fields(reintegro_id = %reintegro_id))]
    async fn get_detalle(
        &self,
        reintegro_id: ReintegroId,
    ) -> Result<Option<ReintegroDetalle>, ReintegroError> {
        const OP: &str = "get_reintegro_detalle";

        let Some((reintegro, items, documentos)) = self
            .reintegros
            .find_with_children(reintegro_id.value())
            .await
            .map_err(|e| db_error(OP, e))?
        else {
            return Ok(None);
        };

        let detalle = ReintegroDetalle {
            reintegro: row_to_reintegro(reintegro).map_err(|e| db_error(OP, e))?,
            items: items
                .into_iter()
                .map(row_to_item)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| db_error(OP, e))?,
            documentos: documentos.into_iter().map(row_to_documento).collect(),
        };

        Ok(Some(detalle))
    }
}

fn db_error(operation: &'static str, error: DatabaseError) -> ReintegroError {
    warn!(operation, error = %error, "Database operation failed");
    ReintegroError::persistence(operation, error)
}

fn row_to_afiliado(row: AfiliadoRow) -> Afiliado {
    Afiliado {
        id: AfiliadoId::new(row.afiliado_id),
        tipo_doc: row.tipo_doc,
        nro_doc: row.nro_doc,
        nombre: row.nombre,
        apellido: row.apellido,
        fecha_nac: row.fecha_nac,
        email: row.email,
        tel: row.tel,
        plan_id: row.plan_id.map(PlanId::new),
    }
}

fn row_to_practica(row: PracticaRow) -> Practica {
    Practica {
        id: PracticaId::new(row.practica_id),
        codigo: row.codigo,
        nombre: row.nombre,
        requiere_autorizacion: row.requiere_autorizacion,
    }
}

fn row_to_reintegro(row: ReintegroRow) -> Result<Reintegro, DatabaseError> {
    let estado = row
        .estado
        .parse::<EstadoReintegro>()
        .map_err(|e| DatabaseError::RowMapping(format!("reintegro {}: {}", row.reintegro_id, e)))?;

    Ok(Reintegro {
        id: ReintegroId::new(row.reintegro_id),
        afiliado_id: AfiliadoId::new(row.afiliado_id),
        estado,
        fecha_presentacion: row.fecha_presentacion,
        total_presentado: Money::new(row.total_presentado),
        total_aprobado: Money::new(row.total_aprobado),
        adjuntos_confirmados: row.adjuntos_confirmados,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_item(row: ReintegroItemRow) -> Result<ReintegroItem, DatabaseError> {
    let kind = ItemKind::from_stored(&row.tipo, row.practica_id, row.medicamento_id)
        .map_err(|e| DatabaseError::RowMapping(format!("item {}: {}", row.item_id, e)))?;

    Ok(ReintegroItem {
        id: ItemId::new(row.item_id),
        reintegro_id: ReintegroId::new(row.reintegro_id),
        kind,
        fecha_prestacion: row.fecha_prestacion,
        monto_presentado: Money::new(row.monto_presentado),
        monto_aprobado: row.monto_aprobado.map(Money::new),
        copago: row.copago.map(Money::new),
    })
}

fn row_to_documento(row: DocumentoRow) -> Documento {
    Documento {
        id: DocumentoId::new(row.documento_id),
        reintegro_id: ReintegroId::new(row.reintegro_id),
        nombre_archivo: row.nombre_archivo,
        ruta: row.ruta,
        tipo_mime: row.tipo_mime,
        subido_at: row.subido_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn reintegro_row(estado: &str) -> ReintegroRow {
        ReintegroRow {
            reintegro_id: 5,
            afiliado_id: 42,
            estado: estado.to_string(),
            fecha_presentacion: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            total_presentado: Decimal::new(150000, 2),
            total_aprobado: Decimal::ZERO,
            adjuntos_confirmados: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_to_reintegro_parses_state() {
        let reintegro = row_to_reintegro(reintegro_row("ESPERANDO_ADJUNTOS")).unwrap();
        assert_eq!(reintegro.estado, EstadoReintegro::EsperandoAdjuntos);
        assert_eq!(reintegro.total_presentado.amount(), Decimal::new(150000, 2));
    }

    #[test]
    fn test_row_to_reintegro_rejects_unknown_state() {
        let err = row_to_reintegro(reintegro_row("BORRADOR")).unwrap_err();
        assert!(matches!(err, DatabaseError::RowMapping(_)));
    }

    #[test]
    fn test_row_to_item_requires_matching_key() {
        let row = ReintegroItemRow {
            item_id: 1,
            reintegro_id: 5,
            tipo: "medicamento".to_string(),
            practica_id: Some(7),
            medicamento_id: None,
            fecha_prestacion: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            monto_presentado: Decimal::new(1000, 0),
            monto_aprobado: None,
            copago: None,
        };
        assert!(row_to_item(row).is_err());
    }

    #[test]
    fn test_db_error_carries_operation() {
        let err = db_error("create_reintegro", DatabaseError::PoolExhausted);
        assert_eq!(err.to_string(), "Error en create_reintegro: Connection pool exhausted");
    }
}
