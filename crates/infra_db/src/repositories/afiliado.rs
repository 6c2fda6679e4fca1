//! Affiliate repository implementation
//!
//! Affiliates are enrolled by an external process; this repository only reads.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;

use crate::error::DatabaseError;

/// Repository for reading affiliate data
#[derive(Debug, Clone)]
pub struct AfiliadoRepository {
    pool: PgPool,
}

impl AfiliadoRepository {
    /// Creates a new AfiliadoRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves the affiliate with exactly this document type and number
    ///
    /// # Returns
    ///
    /// `None` when no row matches; the pair is unique so at most one row does
    pub async fn find_by_documento(
        &self,
        tipo_doc: &str,
        nro_doc: &str,
    ) -> Result<Option<AfiliadoRow>, DatabaseError> {
        debug!(tipo_doc, "Looking up affiliate by document");
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, AfiliadoRow>(
            r#"
            SELECT
                afiliado_id,
                tipo_doc,
                nro_doc,
                nombre,
                apellido,
                fecha_nac,
                email,
                tel,
                plan_id
            FROM public.afiliado
            WHERE tipo_doc = $1 AND nro_doc = $2
            "#,
        )
        .bind(tipo_doc)
        .bind(nro_doc)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }
}

/// Database row for affiliate
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AfiliadoRow {
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
