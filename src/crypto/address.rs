//! Address derivation
//!
//! Addresses are `A` + Base58Check(version || HASH160(seed)), the same
//! construction as Bitcoin P2PKH addresses with an `A` prefix in front.

use super::hash::{double_sha256, hash160};
use crate::types::{Address, ADDRESS_PREFIX};

/// Version byte for user accounts
pub const ACCOUNT_VERSION: u8 = 0x00;

/// Version byte for contracts
pub const CONTRACT_VERSION: u8 = 0x01;

/// Derive an address from arbitrary seed bytes
pub fn derive_address(version: u8, seed: &[u8]) -> Address {
    let mut payload = vec![version];
    payload.extend_from_slice(&hash160(seed));

    let checksum = double_sha256(&payload);
    payload.extend_from_slice(&checksum[..4]);

    let encoded = format!("{}{}", ADDRESS_PREFIX, bs58::encode(payload).into_string());
    Address::from_encoded(encoded)
}

/// Derive the address of a user account from a seed phrase
pub fn account_address(seed: &str) -> Address {
    derive_address(ACCOUNT_VERSION, seed.as_bytes())
}

/// Derive the address of a contract from its deployer and deployment nonce
pub fn contract_address(deployer: &Address, nonce: u64) -> Address {
    let input = format!("{}:{}", deployer, nonce);
    derive_address(CONTRACT_VERSION, input.as_bytes())
}
