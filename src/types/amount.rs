//! Token quantities
//!
//! Arithmetic on [`Amount`] is checked: every operation that can leave
//! the `u64` range or mix currencies returns an [`AmountError`] at the
//! point of failure.

use crate::types::currency::Currency;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Amount arithmetic and parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount overflow: {left} + {right}")]
    Overflow { left: u64, right: u64 },
    #[error("Amount underflow: {left} - {right}")]
    Underflow { left: u64, right: u64 },
    #[error("Currency mismatch: expected {expected}, got {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },
    #[error("Invalid amount value: {0:?}")]
    Parse(String),
}

/// A non-negative quantity of a currency
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAmount", into = "RawAmount")]
pub struct Amount {
    value: u64,
    currency: Currency,
}

/// Wire form of an amount: the value travels as a decimal string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAmount {
    pub value: String,
    #[serde(default)]
    pub currency: Currency,
}

impl Amount {
    /// Create a new amount
    pub fn new(value: u64, currency: Currency) -> Self {
        Self { value, currency }
    }

    /// Create a zero amount of the given currency
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Parse a decimal value into an amount of the given currency
    pub fn parse(value: &str, currency: Currency) -> Result<Self, AmountError> {
        let value = value
            .trim()
            .parse::<u64>()
            .map_err(|_| AmountError::Parse(value.to_string()))?;
        Ok(Self::new(value, currency))
    }

    /// Get the numeric value
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Get the currency
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Check that `other` is expressed in the same currency
    pub fn ensure_same_currency(&self, other: &Amount) -> Result<(), AmountError> {
        if !self.currency.same_as(&other.currency) {
            return Err(AmountError::CurrencyMismatch {
                expected: self.currency.clone(),
                found: other.currency.clone(),
            });
        }
        Ok(())
    }

    /// Add two amounts
    pub fn checked_add(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.ensure_same_currency(other)?;
        let value = self
            .value
            .checked_add(other.value)
            .ok_or(AmountError::Overflow {
                left: self.value,
                right: other.value,
            })?;
        Ok(Amount::new(value, self.currency.clone()))
    }

    /// Subtract `other` from this amount
    pub fn checked_sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.ensure_same_currency(other)?;
        let value = self
            .value
            .checked_sub(other.value)
            .ok_or(AmountError::Underflow {
                left: self.value,
                right: other.value,
            })?;
        Ok(Amount::new(value, self.currency.clone()))
    }

    /// Check if this amount is strictly lower than `other`
    pub fn is_less_than(&self, other: &Amount) -> bool {
        self.value < other.value
    }

    /// Check if this amount is zero
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl TryFrom<RawAmount> for Amount {
    type Error = AmountError;

    fn try_from(raw: RawAmount) -> Result<Self, Self::Error> {
        Amount::parse(&raw.value, raw.currency)
    }
}

impl From<Amount> for RawAmount {
    fn from(amount: Amount) -> Self {
        Self {
            value: amount.value.to_string(),
            currency: amount.currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::codec;

    fn testing() -> Currency {
        Currency::new("Testing", 2)
    }

    #[test]
    fn test_add_and_compare() {
        let a1 = Amount::new(500, testing());
        let a2 = a1.checked_add(&Amount::new(100, testing())).unwrap();

        assert_eq!(a2.value(), 600);
        assert!(a1.is_less_than(&a2));

        // a1 - a2 would be negative
        assert_eq!(
            a1.checked_sub(&a2),
            Err(AmountError::Underflow {
                left: 500,
                right: 600
            })
        );
    }

    #[test]
    fn test_overflow_boundaries() {
        let max = Amount::new(u64::MAX, Currency::default());
        assert!(matches!(
            max.checked_add(&Amount::new(1, Currency::default())),
            Err(AmountError::Overflow { .. })
        ));
        assert_eq!(
            max.checked_add(&Amount::zero(Currency::default()))
                .unwrap()
                .value(),
            u64::MAX
        );
        assert!(matches!(
            Amount::zero(Currency::default()).checked_sub(&max),
            Err(AmountError::Underflow { .. })
        ));
    }

    #[test]
    fn test_currency_mismatch() {
        let a = Amount::new(1, testing());
        let b = Amount::new(1, Currency::new("Other", 2));
        assert!(matches!(
            a.checked_add(&b),
            Err(AmountError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            a.checked_sub(&b),
            Err(AmountError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Amount::parse("42", testing()).unwrap().value(), 42);
        assert!(matches!(
            Amount::parse("-1", testing()),
            Err(AmountError::Parse(_))
        ));
        assert!(matches!(
            Amount::parse("18446744073709551616", testing()),
            Err(AmountError::Parse(_))
        ));
    }

    #[test]
    fn test_wire_form() {
        let json = serde_json::to_string(&Amount::new(100, testing())).unwrap();
        assert_eq!(
            json,
            r#"{"value":"100","currency":{"name":"Testing","minor_unit":2}}"#
        );

        let bad: Result<Amount, _> =
            serde_json::from_str(r#"{"value":"ten","currency":{"name":"","minor_unit":0}}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_bundle_round_trip() {
        let amount = Amount::new(100, testing());
        let bundle = codec::encode(&amount).unwrap();
        let decoded: Amount = codec::decode(&bundle).unwrap();
        assert_eq!(decoded, amount);
    }
}
