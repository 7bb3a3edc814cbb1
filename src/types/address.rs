//! Validated account addresses
//!
//! An address is an `A`-prefixed base58 string. Parsing either yields a
//! valid [`Address`] or an [`AddressError`]; there is no invalid state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix shared by every account and contract address
pub const ADDRESS_PREFIX: char = 'A';

/// Minimum address length (prefix included)
pub const MIN_ADDRESS_LEN: usize = 3;

/// Maximum address length (prefix included)
pub const MAX_ADDRESS_LEN: usize = 128;

/// Address parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address is empty")]
    Empty,
    #[error("Address must start with 'A': {0}")]
    BadPrefix(String),
    #[error("Address length {len} out of range (3-128)")]
    BadLength { len: usize },
    #[error("Address is not base58 encoded: {0}")]
    BadEncoding(String),
}

/// A ledger participant (account or contract)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and validate an address
    pub fn parse(value: &str) -> Result<Self, AddressError> {
        if value.is_empty() {
            return Err(AddressError::Empty);
        }

        if !value.starts_with(ADDRESS_PREFIX) {
            return Err(AddressError::BadPrefix(value.to_string()));
        }

        let len = value.chars().count();
        if !(MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&len) {
            return Err(AddressError::BadLength { len });
        }

        let body = &value[ADDRESS_PREFIX.len_utf8()..];
        bs58::decode(body)
            .into_vec()
            .map_err(|_| AddressError::BadEncoding(value.to_string()))?;

        Ok(Self(value.to_string()))
    }

    /// Wrap an address produced by base58 encoding; always well-formed
    pub(crate) fn from_encoded(value: String) -> Self {
        debug_assert!(Self::parse(&value).is_ok());
        Self(value)
    }

    /// Get the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if both addresses are the same
    pub fn same_as(&self, other: &Address) -> bool {
        self == other
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
