//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 / RIPEMD-160 hashing
//! - Base58Check address derivation for accounts and contracts

pub mod address;
pub mod hash;

pub use address::{account_address, contract_address, derive_address};
pub use hash::{double_sha256, hash160, sha256};
