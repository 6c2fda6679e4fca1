//! Reimbursement domain errors

use std::fmt::Display;
use thiserror::Error;

/// Errors that can occur in the reimbursement domain
///
/// Not-found is never an error here: lookups answer `None`, an empty list,
/// or `false`.
#[derive(Debug, Error)]
pub enum ReintegroError {
    /// The caller supplied input that cannot form a valid request
    #[error("{0}")]
    Validation(String),

    /// Any failure reported by the persistence layer, tagged with the operation
    #[error("Error en {operation}: {message}")]
    Persistence {
        operation: &'static str,
        message: String,
    },
}

impl ReintegroError {
    pub fn validation(message: impl Into<String>) -> Self {
        ReintegroError::Validation(message.into())
    }

    pub fn persistence(operation: &'static str, cause: impl Display) -> Self {
        ReintegroError::Persistence {
            operation,
            message: cause.to_string(),
        }
    }

    /// Returns true if the error came from caller input
    pub fn is_validation(&self) -> bool {
        matches!(self, ReintegroError::Validation(_))
    }
}
