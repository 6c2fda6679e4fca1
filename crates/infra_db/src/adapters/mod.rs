//! Domain Adapters
//!
//! Connects the reimbursement domain ports to the PostgreSQL repositories.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresReintegrosAdapter;
//! use domain_reintegros::Ports;
//! use std::sync::Arc;
//!
//! let ports = Ports::from_adapter(Arc::new(PostgresReintegrosAdapter::new(pool)));
//! ```

pub mod reintegros;

pub use reintegros::PostgresReintegrosAdapter;
