//! Repository implementations for the tool server's tables
//!
//! Each repository owns the SQL for one table family and decodes rows into
//! plain row structs. Conversion into domain types happens in the adapter.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - One pooled connection acquired per operation, released on return
//! - Parameterized statements only
//! - No explicit transactions; single statements commit on their own

pub mod afiliado;
pub mod practica;
pub mod reintegro;

pub use afiliado::{AfiliadoRepository, AfiliadoRow};
pub use practica::{PracticaRepository, PracticaRow};
pub use reintegro::{
    ReintegroRepository, ReintegroRow, ReintegroItemRow, DocumentoRow, NewReintegroItem,
};

/// Escapes `%`, `_` and `\` so user text matches literally inside a LIKE pattern
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("rx_50%"), "rx\\_50\\%");
        assert_eq!(escape_like("consulta"), "consulta");
    }
}
