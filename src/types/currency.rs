//! Monetary unit attached to every amount
//!
//! The minor unit is the number of digits after the decimal separator
//! (ISO 4217 style): a currency with a minor unit of 2 expresses values
//! like `10.34`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency descriptor (name + decimal precision)
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    /// Currency name (the token symbol for ledger amounts)
    pub name: String,
    /// Size of the fractional part, in digits
    pub minor_unit: u8,
}

impl Currency {
    /// Create a new currency
    pub fn new(name: impl Into<String>, minor_unit: u8) -> Self {
        Self {
            name: name.into(),
            minor_unit,
        }
    }

    /// Get the currency name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the size of the fractional part
    pub fn minor_unit(&self) -> u8 {
        self.minor_unit
    }

    /// Check if both currencies describe the same unit
    pub fn same_as(&self, other: &Currency) -> bool {
        self == other
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.minor_unit)
    }
}
