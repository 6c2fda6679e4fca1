//! Unit tests for the Identifiers module

use core_kernel::{AfiliadoId, ReintegroId, PracticaId, MedicamentoId, CoreError};

mod parsing {
    use super::*;

    #[test]
    fn test_from_str_trims_whitespace() {
        let id: ReintegroId = " 42 ".parse().unwrap();
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_from_str_names_the_entity_on_failure() {
        let err = "abc".parse::<AfiliadoId>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidIdentifier(_)));
        assert!(err.to_string().contains("afiliado_id"));
    }
}

mod serde_form {
    use super::*;

    #[test]
    fn test_serializes_as_bare_integer() {
        assert_eq!(serde_json::to_string(&PracticaId::new(7)).unwrap(), "7");
    }

    #[test]
    fn test_deserializes_from_bare_integer() {
        let id: MedicamentoId = serde_json::from_str("13").unwrap();
        assert_eq!(id, MedicamentoId::new(13));
    }
}

#[test]
fn test_conversions_round_trip_through_i32() {
    let raw: i32 = ReintegroId::from(9).into();
    assert_eq!(raw, 9);
}
