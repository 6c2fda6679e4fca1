//! Reimbursement Claim Domain
//!
//! This crate models the records the tool server reads and the one aggregate
//! it writes: the reimbursement claim (`reintegro`) and its line items.
//!
//! # Claim Lifecycle
//!
//! ```text
//! PENDIENTE --(append item, 1..N times)--> PENDIENTE
//! PENDIENTE --(request attachments)------> ESPERANDO_ADJUNTOS
//! PENDIENTE --(submit for review)--------> en_revision
//! ESPERANDO_ADJUNTOS --(upload UI)-------> ENVIADO
//! ```
//!
//! Transitions are applied by single guarded writes in the persistence
//! adapter. Nothing here rejects an out-of-order call; the ordering is a
//! convention the orchestrating agent follows.

pub mod afiliado;
pub mod practica;
pub mod reintegro;
pub mod item;
pub mod documento;
pub mod ports;
pub mod error;

pub use afiliado::Afiliado;
pub use practica::Practica;
pub use reintegro::{EstadoReintegro, NuevoReintegro, Reintegro, ReintegroDetalle};
pub use item::{ItemKind, NuevoItem, ReintegroItem};
pub use documento::Documento;
pub use ports::{AfiliadoPort, PracticaPort, ReintegroPort, Ports};
pub use error::ReintegroError;
