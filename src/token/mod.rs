//! ERC-20 style fungible token ledger
//!
//! Provides a single-token ledger executed against host storage with:
//! - Balances per address
//! - Allowances for delegated transfers
//! - Mint, transfer, approve and transfer-from operations
//!
//! # Example
//!
//! ```rust
//! use token_ledger::host::{EventLog, MemoryStore};
//! use token_ledger::token::{MintPolicy, TokenConfig, TokenLedger};
//! use token_ledger::types::{Address, Amount};
//!
//! let config = TokenConfig::new("My Token", "MTK", 2, MintPolicy::Open);
//! let mut ledger = TokenLedger::new(MemoryStore::new(), EventLog::new(), config.policy());
//!
//! let alice = Address::parse("Aa1ice").unwrap();
//! let bob = Address::parse("Abob").unwrap();
//! ledger.initialize(&config, &alice).unwrap();
//!
//! // The caller is passed explicitly: here alice mints and then pays bob
//! let currency = ledger.currency();
//! ledger.mint(&alice, &alice, Amount::new(1000, currency.clone())).unwrap();
//! ledger.transfer(&alice, &bob, Amount::new(250, currency)).unwrap();
//!
//! assert_eq!(ledger.balance_of(&bob).value(), 250);
//! assert_eq!(ledger.total_supply().value(), 1000);
//! ```

pub mod args;
pub mod config;
pub mod entrypoints;
pub mod events;
pub mod ledger;

pub use args::{
    AccountArgs, AllowanceArgs, Bundle, MintArgs, SetAllowanceArgs, TransferArgs,
    TransferFromArgs,
};
pub use config::{AllowanceKeyScheme, LedgerPolicy, MintPolicy, TokenConfig};
pub use entrypoints::{dispatch, is_entry_point, is_read_only, SUCCESS};
pub use events::{TokenEvent, APPROVAL_EVENT_NAME, TRANSFER_EVENT_NAME};
pub use ledger::{TokenError, TokenLedger};
