//! Contract host
//!
//! Deploys token contracts and dispatches serialized calls to them.
//!
//! # Example
//!
//! ```rust
//! use token_ledger::contract::ContractHost;
//! use token_ledger::crypto::account_address;
//! use token_ledger::token::{Bundle, MintPolicy, TokenConfig, TransferArgs};
//! use token_ledger::types::{Amount, Currency};
//!
//! let mut host = ContractHost::new();
//! let deployer = account_address("deployer");
//! let config = TokenConfig::new("My Token", "MTK", 2, MintPolicy::OwnerOnly)
//!     .with_initial_supply(1000);
//! let token = host.deploy(config, &deployer, 0, 1).unwrap();
//!
//! let bob = account_address("bob");
//! let args = TransferArgs::new(&bob, Amount::new(10, Currency::new("MTK", 2)))
//!     .to_bundle()
//!     .unwrap();
//! let result = host.call(&token, &deployer, "transfer", &args, 0, 2).unwrap();
//! assert!(result.success);
//! ```

pub mod contract;

pub use contract::{
    CallResult, ContractError, ContractHost, HostEvent, TokenContract, MAX_EVENT_HISTORY,
};
