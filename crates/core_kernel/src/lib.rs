//! Core Kernel - Foundational types for the reimbursement tool server
//!
//! This crate provides the building blocks shared by every other crate:
//! - Integer identifiers wrapped in distinct newtypes
//! - Money amounts with precise decimal arithmetic and a portable JSON form
//! - Inclusive date ranges used by claim listings
//! - Marker and health-check traits for port adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, MoneyError};
pub use temporal::DateRange;
pub use identifiers::{
    AfiliadoId, PlanId, PracticaId, MedicamentoId,
    ReintegroId, ItemId, DocumentoId,
};
pub use error::CoreError;
pub use ports::{DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
