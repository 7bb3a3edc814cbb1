//! Token deployment configuration
//!
//! Policy choices that differ between integrations (who may mint, how
//! allowance keys are laid out) are explicit fields here rather than
//! baked into the ledger.

use crate::token::ledger::TokenError;
use crate::types::Currency;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Maximum token name length
pub const MAX_NAME_LEN: usize = 50;

/// Maximum token symbol length
pub const MAX_SYMBOL_LEN: usize = 10;

/// Maximum decimal places
pub const MAX_DECIMALS: u8 = 18;

/// Who is allowed to call `mint`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MintPolicy {
    /// Any caller may mint
    Open,
    /// Only the deploying account may mint
    OwnerOnly,
}

/// Layout of allowance storage keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceKeyScheme {
    /// `ALLOW_<owner><spender>`
    ///
    /// Variable-length addresses can collide under this layout
    /// (`"A1A2" + "A3"` vs `"A1" + "A2A3"`).
    #[default]
    Concatenated,
    /// `ALLOW_<owner>:<spender>`; `:` is outside the base58 alphabet
    Delimited,
}

/// Ledger behaviour that is fixed at deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPolicy {
    pub mint: MintPolicy,
    #[serde(default)]
    pub allowance_keys: AllowanceKeyScheme,
}

impl LedgerPolicy {
    pub fn new(mint: MintPolicy, allowance_keys: AllowanceKeyScheme) -> Self {
        Self {
            mint,
            allowance_keys,
        }
    }
}

/// Token metadata and policies supplied at deployment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token name (e.g., "Massa ERC20 Token")
    pub name: String,
    /// Token symbol (e.g., "MET")
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
    /// Amount minted to the deployer at deployment
    #[serde(default)]
    pub initial_supply: u64,
    pub mint_policy: MintPolicy,
    #[serde(default)]
    pub allowance_keys: AllowanceKeyScheme,
}

impl TokenConfig {
    /// Create a configuration with no initial supply
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        mint_policy: MintPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            initial_supply: 0,
            mint_policy,
            allowance_keys: AllowanceKeyScheme::default(),
        }
    }

    /// Set the amount minted to the deployer
    pub fn with_initial_supply(mut self, initial_supply: u64) -> Self {
        self.initial_supply = initial_supply;
        self
    }

    /// Set the allowance key layout
    pub fn with_allowance_keys(mut self, allowance_keys: AllowanceKeyScheme) -> Self {
        self.allowance_keys = allowance_keys;
        self
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, TokenError> {
        let data =
            fs::read_to_string(path).map_err(|e| TokenError::InvalidConfig(e.to_string()))?;
        let config: TokenConfig =
            serde_json::from_str(&data).map_err(|e| TokenError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate metadata bounds
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.name.is_empty() || self.name.chars().count() > MAX_NAME_LEN {
            return Err(TokenError::InvalidName);
        }

        if self.symbol.is_empty() || self.symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(TokenError::InvalidSymbol);
        }

        if self.decimals > MAX_DECIMALS {
            return Err(TokenError::InvalidDecimals);
        }

        Ok(())
    }

    /// Currency of every amount held in this token
    pub fn currency(&self) -> Currency {
        Currency::new(self.symbol.clone(), self.decimals)
    }

    /// Policies handed to the ledger
    pub fn policy(&self) -> LedgerPolicy {
        LedgerPolicy::new(self.mint_policy, self.allowance_keys)
    }
}
