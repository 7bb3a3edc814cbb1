//! Argument bundle codec
//!
//! A bundle is the JSON encoding of a value, written out as its byte
//! values joined with commas (`123,34,118,...`). This is the single
//! string form in which arguments cross the contract call boundary.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Separator between byte values in a bundle
pub const BYTE_SEPARATOR: char = ',';

/// Bundle encoding errors
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid byte {0:?} in bundle")]
    InvalidByte(String),
    #[error("Empty bundle")]
    Empty,
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a value into a bundle string
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(bytes_to_bundle(&bytes))
}

/// Decode a bundle string into a value
pub fn decode<T: DeserializeOwned>(bundle: &str) -> Result<T, CodecError> {
    let bytes = bundle_to_bytes(bundle)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Render raw bytes as a bundle string
pub fn bytes_to_bundle(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(&BYTE_SEPARATOR.to_string())
}

/// Parse a bundle string back into raw bytes
pub fn bundle_to_bytes(bundle: &str) -> Result<Vec<u8>, CodecError> {
    let bundle = bundle.trim();
    if bundle.is_empty() {
        return Err(CodecError::Empty);
    }

    bundle
        .split(BYTE_SEPARATOR)
        .map(parse_byte)
        .collect()
}

/// A byte is a plain run of decimal digits (no sign) in 0..=255
fn parse_byte(part: &str) -> Result<u8, CodecError> {
    let digits = part.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::InvalidByte(part.to_string()));
    }
    digits
        .parse::<u8>()
        .map_err(|_| CodecError::InvalidByte(part.to_string()))
}
