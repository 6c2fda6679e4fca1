//! Test Utilities Crate
//!
//! Provides shared test infrastructure for the reimbursement tool server.
//!
//! # Modules
//!
//! - `memory`: In-memory implementation of every domain port
//! - `fixtures`: Pre-built test data for common records
//! - `builders`: Builder patterns for test data construction
//! - `database`: PostgreSQL test container management
//! - `assertions`: Assertion helpers for claim listings and states
//! - `generators`: Property-based test data generators

pub mod memory;
pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use memory::*;
pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
