//! Core error types used across the system

use thiserror::Error;
use crate::money::MoneyError;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn parse_amount(raw: &str) -> Result<Money, CoreError> {
        Ok(Money::parse(raw)?)
    }

    #[test]
    fn test_money_error_converts() {
        let err = parse_amount("mil").unwrap_err();
        assert!(matches!(err, CoreError::Money(MoneyError::InvalidAmount(_))));
        assert!(err.to_string().starts_with("Money error:"));
    }
}
