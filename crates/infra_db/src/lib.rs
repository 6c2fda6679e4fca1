//! Infrastructure Database Layer
//!
//! This crate owns every SQL statement the tool server issues. It provides
//! the connection pool, the repositories for each table family, and the
//! adapter that implements the domain ports on top of them.
//!
//! # Architecture
//!
//! - Repositories acquire one pooled connection per operation and release it
//!   when the operation returns. No transaction spans two statements.
//! - Rows are decoded into `FromRow` structs and converted field by field
//!   into domain types; an unexpected stored value is a row-mapping error.
//! - Uniqueness, foreign keys, and isolation are left to PostgreSQL.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, PostgresReintegrosAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("localhost", "obra_social", "app", "secret")).await?;
//! let adapter = PostgresReintegrosAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::PostgresReintegrosAdapter;
