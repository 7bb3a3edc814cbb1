//! Argument records for the serialized entry points
//!
//! Records hold the wire form of their fields (address strings and raw
//! amounts) so that a malformed field surfaces as `InvalidAddress` or
//! `InvalidAmount` rather than as an undecodable bundle.

use crate::token::ledger::TokenError;
use crate::types::{codec, Address, Amount, RawAmount};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Encoding shared by all argument records
pub trait Bundle: Serialize + DeserializeOwned {
    /// Encode into a bundle string
    fn to_bundle(&self) -> Result<String, TokenError> {
        Ok(codec::encode(self)?)
    }

    /// Decode from a bundle string
    fn from_bundle(bundle: &str) -> Result<Self, TokenError> {
        Ok(codec::decode(bundle)?)
    }
}

fn parse_address(raw: &str) -> Result<Address, TokenError> {
    Ok(Address::parse(raw)?)
}

fn parse_amount(raw: &RawAmount) -> Result<Amount, TokenError> {
    Amount::try_from(raw.clone()).map_err(|e| TokenError::InvalidAmount(e.to_string()))
}

/// Arguments of `balanceOf`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountArgs {
    pub account: String,
}

impl AccountArgs {
    pub fn new(account: &Address) -> Self {
        Self {
            account: account.to_string(),
        }
    }

    pub fn account(&self) -> Result<Address, TokenError> {
        parse_address(&self.account)
    }
}

impl Bundle for AccountArgs {}

/// Arguments of `allowance`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceArgs {
    pub owner: String,
    pub spender: String,
}

impl AllowanceArgs {
    pub fn new(owner: &Address, spender: &Address) -> Self {
        Self {
            owner: owner.to_string(),
            spender: spender.to_string(),
        }
    }

    pub fn owner(&self) -> Result<Address, TokenError> {
        parse_address(&self.owner)
    }

    pub fn spender(&self) -> Result<Address, TokenError> {
        parse_address(&self.spender)
    }
}

impl Bundle for AllowanceArgs {}

/// Arguments of `approve`, `increaseAllowance` and `decreaseAllowance`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAllowanceArgs {
    pub spender: String,
    pub amount: RawAmount,
}

impl SetAllowanceArgs {
    pub fn new(spender: &Address, amount: Amount) -> Self {
        Self {
            spender: spender.to_string(),
            amount: amount.into(),
        }
    }

    pub fn spender(&self) -> Result<Address, TokenError> {
        parse_address(&self.spender)
    }

    pub fn amount(&self) -> Result<Amount, TokenError> {
        parse_amount(&self.amount)
    }
}

impl Bundle for SetAllowanceArgs {}

/// Arguments of `mint`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintArgs {
    pub to: String,
    pub amount: RawAmount,
}

impl MintArgs {
    pub fn new(to: &Address, amount: Amount) -> Self {
        Self {
            to: to.to_string(),
            amount: amount.into(),
        }
    }

    pub fn to(&self) -> Result<Address, TokenError> {
        parse_address(&self.to)
    }

    pub fn amount(&self) -> Result<Amount, TokenError> {
        parse_amount(&self.amount)
    }
}

impl Bundle for MintArgs {}

/// Arguments of `transfer`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferArgs {
    pub to: String,
    pub amount: RawAmount,
}

impl TransferArgs {
    pub fn new(to: &Address, amount: Amount) -> Self {
        Self {
            to: to.to_string(),
            amount: amount.into(),
        }
    }

    pub fn to(&self) -> Result<Address, TokenError> {
        parse_address(&self.to)
    }

    pub fn amount(&self) -> Result<Amount, TokenError> {
        parse_amount(&self.amount)
    }
}

impl Bundle for TransferArgs {}

/// Arguments of `transferFrom`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFromArgs {
    pub from: String,
    pub to: String,
    pub amount: RawAmount,
}

impl TransferFromArgs {
    pub fn new(from: &Address, to: &Address, amount: Amount) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            amount: amount.into(),
        }
    }

    pub fn from_account(&self) -> Result<Address, TokenError> {
        parse_address(&self.from)
    }

    pub fn to(&self) -> Result<Address, TokenError> {
        parse_address(&self.to)
    }

    pub fn amount(&self) -> Result<Amount, TokenError> {
        parse_amount(&self.amount)
    }
}

impl Bundle for TransferFromArgs {}
