//! Per-invocation call context
//!
//! The caller of an operation is passed explicitly instead of being read
//! from ambient host state.

use crate::types::Address;
use serde::{Deserialize, Serialize};

/// Source of the account that invoked the current operation
pub trait CallerIdentity {
    /// The calling account
    fn caller(&self) -> &Address;
}

impl CallerIdentity for Address {
    fn caller(&self) -> &Address {
        self
    }
}

/// Execution context of a single contract call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Account that invoked the call
    pub caller: Address,
    /// Contract being executed
    pub contract: Address,
    /// Block timestamp (seconds)
    pub timestamp: u64,
    /// Block number
    pub block_number: u64,
}

impl CallContext {
    /// Create a context for a call at the given block
    pub fn new(caller: Address, contract: Address, timestamp: u64, block_number: u64) -> Self {
        Self {
            caller,
            contract,
            timestamp,
            block_number,
        }
    }
}

impl CallerIdentity for CallContext {
    fn caller(&self) -> &Address {
        &self.caller
    }
}
