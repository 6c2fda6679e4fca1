//! Database Test Utilities
//!
//! Provides a PostgreSQL test container with the schema applied, plus
//! helpers that seed the read-only reference tables the tool server expects
//! to already exist.

use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

use domain_reintegros::{Afiliado, Practica};
use infra_db::{create_pool, DatabaseConfig};

use crate::fixtures::{AfiliadoFixtures, PracticaFixtures};

const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "obra_social_test";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A wrapper around a PostgreSQL test container
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pub config: DatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a new PostgreSQL container and applies the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or the schema fails to apply
    pub async fn new() -> Result<Self, BoxError> {
        let container = Postgres::default()
            .with_db_name(POSTGRES_DB)
            .with_user(POSTGRES_USER)
            .with_password(POSTGRES_PASSWORD)
            .with_tag(POSTGRES_TAG)
            .start()
            .await?;

        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(5432).await?;

        let config = DatabaseConfig::new(host, POSTGRES_DB, POSTGRES_USER, POSTGRES_PASSWORD)
            .port(port)
            .max_connections(5);
        let pool = create_pool(config.clone()).await?;

        let test_db = Self {
            _container: container,
            config,
            pool,
        };

        test_db.init_schema().await?;

        Ok(test_db)
    }

    async fn init_schema(&self) -> Result<(), BoxError> {
        let schema = include_str!("../../../migrations/20240101_000001_initial_schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Clears all data and resets the serial sequences
    pub async fn clear_data(&self) -> Result<(), BoxError> {
        sqlx::raw_sql(
            r#"
            TRUNCATE TABLE
                public.documento,
                public.reintegro_item,
                public.reintegro,
                public.cobertura_practica,
                public.medicamento,
                public.practica,
                public.afiliado,
                public.plan
            RESTART IDENTITY CASCADE
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts the standard affiliates, practices, coverage, and medicine
    pub async fn seed_reference_data(&self) -> Result<(), BoxError> {
        sqlx::query("INSERT INTO public.plan (plan_id, nombre) VALUES ($1, 'Plan General')")
            .bind(AfiliadoFixtures::plan_general().value())
            .execute(&self.pool)
            .await?;

        for afiliado in AfiliadoFixtures::all() {
            self.insert_afiliado(&afiliado).await?;
        }

        for practica in PracticaFixtures::all() {
            self.insert_practica(&practica).await?;
        }

        for practica_id in PracticaFixtures::covered_by_plan_general() {
            sqlx::query("INSERT INTO public.cobertura_practica (plan_id, practica_id) VALUES ($1, $2)")
                .bind(AfiliadoFixtures::plan_general().value())
                .bind(practica_id.value())
                .execute(&self.pool)
                .await?;
        }

        sqlx::query("INSERT INTO public.medicamento (medicamento_id, nombre) VALUES ($1, 'Ibuprofeno 400 mg')")
            .bind(PracticaFixtures::medicamento_id().value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn insert_afiliado(&self, afiliado: &Afiliado) -> Result<(), BoxError> {
        sqlx::query(
            r#"
            INSERT INTO public.afiliado (
                afiliado_id, tipo_doc, nro_doc, nombre, apellido,
                fecha_nac, email, tel, plan_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(afiliado.id.value())
        .bind(&afiliado.tipo_doc)
        .bind(&afiliado.nro_doc)
        .bind(&afiliado.nombre)
        .bind(&afiliado.apellido)
        .bind(afiliado.fecha_nac)
        .bind(&afiliado.email)
        .bind(&afiliado.tel)
        .bind(afiliado.plan_id.map(|id| id.value()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn insert_practica(&self, practica: &Practica) -> Result<(), BoxError> {
        sqlx::query(
            r#"
            INSERT INTO public.practica (practica_id, codigo, nombre, requiere_autorizacion)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(practica.id.value())
        .bind(&practica.codigo)
        .bind(&practica.nombre)
        .bind(practica.requiere_autorizacion)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites a claim's presentation date
    ///
    /// New claims are always presented on `CURRENT_DATE`; range tests move
    /// them afterwards.
    pub async fn set_fecha_presentacion(
        &self,
        reintegro_id: i32,
        fecha: chrono::NaiveDate,
    ) -> Result<(), BoxError> {
        sqlx::query("UPDATE public.reintegro SET fecha_presentacion = $2 WHERE reintegro_id = $1")
            .bind(reintegro_id)
            .bind(fecha)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Records a document row the way the upload form would
    pub async fn insert_documento(
        &self,
        reintegro_id: i32,
        nombre_archivo: &str,
    ) -> Result<i32, BoxError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO public.documento (reintegro_id, nombre_archivo, ruta, tipo_mime)
            VALUES ($1, $2, $3, 'application/pdf')
            RETURNING documento_id
            "#,
        )
        .bind(reintegro_id)
        .bind(nombre_archivo)
        .bind(format!("uploads/{}/{}", reintegro_id, nombre_archivo))
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}

/// Creates an isolated, seeded test database for a single test
pub async fn create_isolated_test_database() -> Result<TestDatabase, BoxError> {
    let db = TestDatabase::new().await?;
    db.seed_reference_data().await?;
    Ok(db)
}
