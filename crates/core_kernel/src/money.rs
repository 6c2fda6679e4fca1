//! Money amounts with precise decimal arithmetic
//!
//! Amounts are stored as `NUMERIC(12,2)` pesos. Inside the system they stay
//! `Decimal`; at the tool boundary they are emitted as plain JSON numbers so
//! any orchestrator can read them.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use thiserror::Error;

/// Number of decimal places kept for every amount
pub const AMOUNT_SCALE: u32 = 2;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount cannot be represented as a floating point number: {0}")]
    NotPortable(Decimal),
}

/// A monetary amount in the plan's currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new amount rounded to two decimal places
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(AMOUNT_SCALE))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Parses an amount from its textual form
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        raw.trim()
            .parse::<Decimal>()
            .map(Self::new)
            .map_err(|e| MoneyError::InvalidAmount(format!("'{}': {}", raw, e)))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Converts to the portable floating point representation
    pub fn to_portable(&self) -> Result<f64, MoneyError> {
        self.0.to_f64().ok_or(MoneyError::NotPortable(self.0))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.0 + other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$ {:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let portable = self.to_portable().map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(portable)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accepts JSON numbers and numeric strings.
        <Decimal as Deserialize>::deserialize(deserializer).map(Money::new)
    }
}
