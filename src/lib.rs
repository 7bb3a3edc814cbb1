//! Token Ledger: an ERC-20 style fungible token in a deterministic contract host
//!
//! This crate provides:
//! - Checked value types (addresses, amounts, currencies) and the argument bundle codec
//! - Narrow host interfaces: key-value storage, caller identity, event sink
//! - The token ledger: balances, allowances, mint, transfer, approve, transfer-from
//! - A contract host that commits a call's writes and events only on success
//! - JSON persistence of the host state with rotating backups
//!
//! # Example
//!
//! ```rust
//! use token_ledger::contract::ContractHost;
//! use token_ledger::crypto::account_address;
//! use token_ledger::token::{MintPolicy, TokenConfig};
//!
//! let mut host = ContractHost::new();
//! let deployer = account_address("deployer");
//!
//! let config = TokenConfig::new("Massa ERC20 Token", "MET", 9, MintPolicy::OwnerOnly)
//!     .with_initial_supply(1_000_000);
//! let token = host.deploy(config, &deployer, 0, 1).unwrap();
//!
//! let result = host.call(&token, &deployer, "totalSupply", "", 0, 1).unwrap();
//! assert!(result.success);
//! ```

pub mod cli;
pub mod contract;
pub mod crypto;
pub mod host;
pub mod storage;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use contract::{CallResult, ContractError, ContractHost};
pub use host::{CallContext, EventLog, EventSink, KeyValueStore, MemoryStore};
pub use storage::{HostSnapshot, Storage, StorageConfig};
pub use token::{MintPolicy, TokenConfig, TokenError, TokenLedger};
pub use types::{Address, Amount, Currency};
