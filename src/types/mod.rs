//! Value types exchanged across the contract call boundary
//!
//! - [`Address`]: validated account identifier
//! - [`Amount`]: checked token quantity paired with a [`Currency`]
//! - [`codec`]: the serialized argument bundle format

pub mod address;
pub mod amount;
pub mod codec;
pub mod currency;

pub use address::{Address, AddressError, ADDRESS_PREFIX, MAX_ADDRESS_LEN, MIN_ADDRESS_LEN};
pub use amount::{Amount, AmountError, RawAmount};
pub use codec::{decode, encode, CodecError};
pub use currency::Currency;
