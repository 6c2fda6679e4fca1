//! Practice catalog repository implementation

use sqlx::PgPool;
use tracing::debug;

use crate::error::DatabaseError;
use crate::repositories::escape_like;

/// Repository for reading the practice catalog and plan coverage
#[derive(Debug, Clone)]
pub struct PracticaRepository {
    pool: PgPool,
}

impl PracticaRepository {
    /// Creates a new PracticaRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Searches practices whose name contains `nombre`, ignoring case
    ///
    /// Rows come back in whatever order the database returns them.
    pub async fn search_by_nombre(&self, nombre: &str) -> Result<Vec<PracticaRow>, DatabaseError> {
        let pattern = format!("%{}%", escape_like(nombre));
        debug!(%pattern, "Searching practices by name");
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, PracticaRow>(
            r#"
            SELECT practica_id, codigo, nombre, requiere_autorizacion
            FROM public.practica
            WHERE nombre ILIKE $1
            "#,
        )
        .bind(pattern)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    /// Retrieves the practices covered by a plan
    pub async fn find_covered_by_plan(&self, plan_id: i32) -> Result<Vec<PracticaRow>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, PracticaRow>(
            r#"
            SELECT p.practica_id, p.codigo, p.nombre, p.requiere_autorizacion
            FROM public.practica p
            JOIN public.cobertura_practica cp ON p.practica_id = cp.practica_id
            WHERE cp.plan_id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }
}

/// Database row for practice
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PracticaRow {
    pub practica_id: i32,
    pub codigo: String,
    pub nombre: String,
    pub requiere_autorizacion: bool,
}
