//! Reimbursement claim repository implementation
//!
//! Every lifecycle write is a single statement. The claim's `estado` column
//! is the only record of where a claim is in its workflow.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

use crate::error::DatabaseError;

/// Repository for managing claims, their items, and their documents
#[derive(Debug, Clone)]
pub struct ReintegroRepository {
    pool: PgPool,
}

impl ReintegroRepository {
    /// Creates a new ReintegroRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a claim shell presented today
    ///
    /// # Returns
    ///
    /// The generated `reintegro_id`
    pub async fn insert(
        &self,
        afiliado_id: i32,
        estado: &str,
        total_presentado: Decimal,
        total_aprobado: Decimal,
    ) -> Result<i32, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let reintegro_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO public.reintegro (
                afiliado_id, estado, fecha_presentacion,
                total_presentado, total_aprobado, adjuntos_confirmados,
                created_at, updated_at
            ) VALUES ($1, $2, CURRENT_DATE, $3, $4, FALSE, NOW(), NOW())
            RETURNING reintegro_id
            "#,
        )
        .bind(afiliado_id)
        .bind(estado)
        .bind(total_presentado)
        .bind(total_aprobado)
        .fetch_one(&mut *conn)
        .await?;

        debug!(reintegro_id, afiliado_id, "Inserted claim");
        Ok(reintegro_id)
    }

    /// Inserts a line item referencing a claim
    ///
    /// # Returns
    ///
    /// The generated `item_id`
    pub async fn insert_item(&self, item: NewReintegroItem<'_>) -> Result<i32, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let item_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO public.reintegro_item (
                reintegro_id, tipo, practica_id, medicamento_id,
                fecha_prestacion, monto_presentado
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING item_id
            "#,
        )
        .bind(item.reintegro_id)
        .bind(item.tipo)
        .bind(item.practica_id)
        .bind(item.medicamento_id)
        .bind(item.fecha_prestacion)
        .bind(item.monto_presentado)
        .fetch_one(&mut *conn)
        .await?;

        debug!(item_id, reintegro_id = item.reintegro_id, "Inserted claim item");
        Ok(item_id)
    }

    /// Sets the claim state and clears the attachments-confirmed flag
    ///
    /// # Returns
    ///
    /// Number of rows updated (0 when the claim does not exist)
    pub async fn update_estado_reset_adjuntos(
        &self,
        reintegro_id: i32,
        estado: &str,
    ) -> Result<u64, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            r#"
            UPDATE public.reintegro
            SET estado = $2,
                adjuntos_confirmados = FALSE,
                updated_at = NOW()
            WHERE reintegro_id = $1
            "#,
        )
        .bind(reintegro_id)
        .bind(estado)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Sets the claim state
    ///
    /// # Returns
    ///
    /// Number of rows updated (0 when the claim does not exist)
    pub async fn update_estado(&self, reintegro_id: i32, estado: &str) -> Result<u64, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            r#"
            UPDATE public.reintegro
            SET estado = $2, updated_at = NOW()
            WHERE reintegro_id = $1
            "#,
        )
        .bind(reintegro_id)
        .bind(estado)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Retrieves an affiliate's claims presented within `[desde, hasta]`
    ///
    /// Ordered newest presentation first, then newest id.
    pub async fn find_by_afiliado_between(
        &self,
        afiliado_id: i32,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<ReintegroRow>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, ReintegroRow>(
            r#"
            SELECT
                reintegro_id,
                afiliado_id,
                estado,
                fecha_presentacion,
                total_presentado,
                total_aprobado,
                adjuntos_confirmados,
                created_at,
                updated_at
            FROM public.reintegro
            WHERE afiliado_id = $1
              AND fecha_presentacion BETWEEN $2 AND $3
            ORDER BY fecha_presentacion DESC, reintegro_id DESC
            "#,
        )
        .bind(afiliado_id)
        .bind(desde)
        .bind(hasta)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    /// Retrieves a claim with its items and documents
    ///
    /// The three reads share one connection but no transaction.
    pub async fn find_with_children(
        &self,
        reintegro_id: i32,
    ) -> Result<Option<(ReintegroRow, Vec<ReintegroItemRow>, Vec<DocumentoRow>)>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let Some(reintegro) = sqlx::query_as::<_, ReintegroRow>(
            r#"
            SELECT
                reintegro_id,
                afiliado_id,
                estado,
                fecha_presentacion,
                total_presentado,
                total_aprobado,
                adjuntos_confirmados,
                created_at,
                updated_at
            FROM public.reintegro
            WHERE reintegro_id = $1
            "#,
        )
        .bind(reintegro_id)
        .fetch_optional(&mut *conn)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ReintegroItemRow>(
            r#"
            SELECT
                item_id,
                reintegro_id,
                tipo,
                practica_id,
                medicamento_id,
                fecha_prestacion,
                monto_presentado,
                monto_aprobado,
                copago
            FROM public.reintegro_item
            WHERE reintegro_id = $1
            ORDER BY item_id
            "#,
        )
        .bind(reintegro_id)
        .fetch_all(&mut *conn)
        .await?;

        let documentos = sqlx::query_as::<_, DocumentoRow>(
            r#"
            SELECT documento_id, reintegro_id, nombre_archivo, ruta, tipo_mime, subido_at
            FROM public.documento
            WHERE reintegro_id = $1
            ORDER BY subido_at, documento_id
            "#,
        )
        .bind(reintegro_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some((reintegro, items, documentos)))
    }
}

/// Database row for claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReintegroRow {
    pub reintegro_id: i32,
    pub afiliado_id: i32,
    pub estado: String,
    pub fecha_presentacion: NaiveDate,
    pub total_presentado: Decimal,
    pub total_aprobado: Decimal,
    pub adjuntos_confirmados: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for claim item
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReintegroItemRow {
    pub item_id: i32,
    pub reintegro_id: i32,
    pub tipo: String,
    pub practica_id: Option<i32>,
    pub medicamento_id: Option<i32>,
    pub fecha_prestacion: NaiveDate,
    pub monto_presentado: Decimal,
    pub monto_aprobado: Option<Decimal>,
    pub copago: Option<Decimal>,
}

/// Database row for uploaded document
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentoRow {
    pub documento_id: i32,
    pub reintegro_id: i32,
    pub nombre_archivo: String,
    pub ruta: String,
    pub tipo_mime: Option<String>,
    pub subido_at: DateTime<Utc>,
}

/// Data for inserting a claim item
#[derive(Debug, Clone)]
pub struct NewReintegroItem<'a> {
    pub reintegro_id: i32,
    pub tipo: &'a str,
    pub practica_id: Option<i32>,
    pub medicamento_id: Option<i32>,
    pub fecha_prestacion: NaiveDate,
    pub monto_presentado: Decimal,
}
