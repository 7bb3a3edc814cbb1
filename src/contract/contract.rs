//! Token contract deployment and invocation
//!
//! Each call runs against a [`WriteBuffer`] over the contract's storage.
//! Writes and events are committed only when the entry point succeeds;
//! a rejected call leaves the contract exactly as it was.

use crate::crypto::contract_address;
use crate::host::{CallContext, EventLog, MemoryStore, WriteBuffer};
use crate::token::ledger::BALANCE_KEY_PREFIX;
use crate::token::{dispatch, is_entry_point, is_read_only, TokenConfig, TokenError, TokenLedger};
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Number of host events kept in history
pub const MAX_EVENT_HISTORY: usize = 10_000;

/// Contract errors
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Contract not found: {0}")]
    NotFound(String),
    #[error("Contract already exists: {0}")]
    AlreadyExists(String),
    #[error("Deployment failed: {0}")]
    DeploymentFailed(#[from] TokenError),
}

/// Outcome of a contract call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResult {
    /// Whether the call succeeded (and was committed)
    pub success: bool,
    /// Return value (if any)
    pub return_value: Option<String>,
    /// Error message (if failed)
    pub error: Option<String>,
    /// Events emitted by the call
    pub events: Vec<String>,
    /// Number of storage entries written
    pub storage_changes: usize,
}

impl CallResult {
    fn succeeded(return_value: String, events: Vec<String>, storage_changes: usize) -> Self {
        Self {
            success: true,
            return_value: Some(return_value),
            error: None,
            events,
            storage_changes,
        }
    }

    fn failed(error: &TokenError) -> Self {
        Self {
            success: false,
            return_value: None,
            error: Some(error.to_string()),
            events: Vec::new(),
            storage_changes: 0,
        }
    }
}

/// An event recorded by the host, with its call metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEvent {
    pub contract: Address,
    pub caller: Address,
    pub block_number: u64,
    pub timestamp: u64,
    pub data: String,
}

/// A deployed token contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenContract {
    /// Contract address (derived from deployer + nonce)
    pub address: Address,
    /// Deployment configuration
    pub config: TokenConfig,
    /// Contract storage (key-value pairs)
    pub storage: MemoryStore,
    /// Deployer address
    pub deployer: Address,
    /// Block number when deployed
    pub deployed_at: u64,
}

impl TokenContract {
    fn deploy(
        address: Address,
        config: TokenConfig,
        deployer: Address,
        block_number: u64,
    ) -> Result<(Self, Vec<String>), TokenError> {
        let mut contract = Self {
            address,
            config,
            storage: MemoryStore::new(),
            deployer,
            deployed_at: block_number,
        };

        let (changes, events) = {
            let mut ledger = TokenLedger::new(
                WriteBuffer::new(&contract.storage),
                EventLog::new(),
                contract.config.policy(),
            );
            ledger.initialize(&contract.config, &contract.deployer)?;
            let (buffer, log) = ledger.into_parts();
            (buffer.into_changes(), log.into_events())
        };
        contract.storage.apply(changes);

        Ok((contract, events))
    }

    /// Execute an entry point
    pub fn execute(&mut self, ctx: &CallContext, function: &str, args: &str) -> CallResult {
        let (outcome, changes, events) = {
            let mut ledger = TokenLedger::new(
                WriteBuffer::new(&self.storage),
                EventLog::new(),
                self.config.policy(),
            );
            let outcome = dispatch(&mut ledger, ctx, function, args);
            let (buffer, log) = ledger.into_parts();
            (outcome, buffer.into_changes(), log.into_events())
        };

        match outcome {
            Ok(return_value) => {
                let written = changes.len();
                self.storage.apply(changes);
                CallResult::succeeded(return_value, events, written)
            }
            // Buffered writes and events are dropped
            Err(err) => CallResult::failed(&err),
        }
    }

    /// Accounts with a stored balance entry, in key order
    pub fn holders(&self) -> Vec<(Address, u64)> {
        self.storage
            .scan_prefix(BALANCE_KEY_PREFIX)
            .filter_map(|(key, value)| {
                let account = Address::parse(&key[BALANCE_KEY_PREFIX.len()..]).ok()?;
                match value.parse::<u64>() {
                    Ok(balance) => Some((account, balance)),
                    Err(_) => {
                        log::error!("Corrupt balance entry {}: {:?}", key, value);
                        None
                    }
                }
            })
            .collect()
    }

    /// Read-only ledger view (writes through it are discarded)
    pub fn view(&self) -> TokenLedger<WriteBuffer<'_, MemoryStore>, EventLog> {
        TokenLedger::new(
            WriteBuffer::new(&self.storage),
            EventLog::new(),
            self.config.policy(),
        )
    }
}

/// Manages all deployed token contracts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractHost {
    /// All deployed contracts by address
    contracts: BTreeMap<Address, TokenContract>,
    /// Committed events, oldest first
    events: Vec<HostEvent>,
    /// Deployment counter for address generation
    nonce: u64,
}

impl ContractHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a new token contract
    ///
    /// A rejected deployment leaves the host untouched, nonce included.
    pub fn deploy(
        &mut self,
        config: TokenConfig,
        deployer: &Address,
        timestamp: u64,
        block_number: u64,
    ) -> Result<Address, ContractError> {
        let address = contract_address(deployer, self.nonce);

        if self.contracts.contains_key(&address) {
            return Err(ContractError::AlreadyExists(address.to_string()));
        }

        let (contract, events) =
            TokenContract::deploy(address.clone(), config, deployer.clone(), block_number)?;
        self.nonce += 1;

        log::info!(
            "Token {} ({}) deployed at {}",
            contract.config.name,
            contract.config.symbol,
            address
        );

        self.record_events(&address, deployer, block_number, timestamp, events);
        self.contracts.insert(address.clone(), contract);
        Ok(address)
    }

    /// Call a contract entry point with a serialized argument bundle
    pub fn call(
        &mut self,
        address: &Address,
        caller: &Address,
        function: &str,
        args: &str,
        timestamp: u64,
        block_number: u64,
    ) -> Result<CallResult, ContractError> {
        let contract = self
            .contracts
            .get_mut(address)
            .ok_or_else(|| ContractError::NotFound(address.to_string()))?;

        let ctx = CallContext::new(caller.clone(), address.clone(), timestamp, block_number);
        let result = contract.execute(&ctx, function, args);

        if result.success && is_read_only(function) {
            log::debug!("{} read {}.{}", caller, address, function);
        } else if result.success {
            log::info!(
                "{} called {}.{} ({} writes)",
                caller,
                address,
                function,
                result.storage_changes
            );
            self.record_events(address, caller, block_number, timestamp, result.events.clone());
        } else if is_entry_point(function) {
            log::warn!(
                "{} call to {}.{} rejected: {}",
                caller,
                address,
                function,
                result.error.as_deref().unwrap_or("unknown error")
            );
        } else {
            log::warn!("{} called unknown entry point {}.{}", caller, address, function);
        }

        Ok(result)
    }

    /// Get a contract by address
    pub fn get(&self, address: &Address) -> Option<&TokenContract> {
        self.contracts.get(address)
    }

    /// Get all contract addresses
    pub fn list(&self) -> Vec<Address> {
        self.contracts.keys().cloned().collect()
    }

    /// Get contract count
    pub fn count(&self) -> usize {
        self.contracts.len()
    }

    /// All committed events
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Committed events of one contract
    pub fn events_for<'a>(&'a self, address: &'a Address) -> impl Iterator<Item = &'a HostEvent> {
        self.events.iter().filter(move |e| &e.contract == address)
    }

    fn record_events(
        &mut self,
        contract: &Address,
        caller: &Address,
        block_number: u64,
        timestamp: u64,
        events: Vec<String>,
    ) {
        self.events.extend(events.into_iter().map(|data| HostEvent {
            contract: contract.clone(),
            caller: caller.clone(),
            block_number,
            timestamp,
            data,
        }));

        if self.events.len() > MAX_EVENT_HISTORY {
            let excess = self.events.len() - MAX_EVENT_HISTORY;
            self.events.drain(..excess);
        }
    }
}
