//! Strongly-typed identifiers for domain entities
//!
//! Every table in the schema keys its rows with a `SERIAL` integer. Wrapping
//! those integers in distinct newtypes keeps an affiliate id from being passed
//! where a claim id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wraps a raw database key
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Returns the raw database key
            pub const fn value(&self) -> i32 {
                self.0
            }

            /// Returns true when the key can reference a stored row
            ///
            /// Serial keys start at 1, so zero and negative values never match.
            pub const fn is_assigned(&self) -> bool {
                self.0 > 0
            }

            /// Returns the entity label used in messages
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i32>()
                    .map(Self)
                    .map_err(|e| CoreError::InvalidIdentifier(format!("{} '{}': {}", $label, s, e)))
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> i32 {
                id.0
            }
        }
    };
}

// Read-only reference data
define_id!(AfiliadoId, "afiliado_id");
define_id!(PlanId, "plan_id");
define_id!(PracticaId, "practica_id");
define_id!(MedicamentoId, "medicamento_id");

// Claim aggregate
define_id!(ReintegroId, "reintegro_id");
define_id!(ItemId, "item_id");
define_id!(DocumentoId, "documento_id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_plain_number() {
        assert_eq!(ReintegroId::new(17).to_string(), "17");
    }

    #[test]
    fn test_zero_is_not_assigned() {
        assert!(!PracticaId::new(0).is_assigned());
        assert!(PracticaId::new(7).is_assigned());
    }
}
