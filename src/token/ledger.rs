//! Fungible token ledger
//!
//! Balances and allowances live in the contract's key-value store:
//! - `BALANCE_<account>` -> balance
//! - `ALLOW_<owner><spender>` -> allowance (see [`AllowanceKeyScheme`])
//!
//! Absent entries read as zero. Every mutating operation validates all
//! of its preconditions before the first write, so a rejected operation
//! leaves storage untouched.

use crate::host::{CallerIdentity, EventSink, KeyValueStore};
use crate::token::config::{AllowanceKeyScheme, LedgerPolicy, MintPolicy, TokenConfig};
use crate::token::events::TokenEvent;
use crate::types::{Address, AddressError, Amount, AmountError, CodecError, Currency};
use thiserror::Error;

pub const BALANCE_KEY_PREFIX: &str = "BALANCE_";
pub const ALLOWANCE_KEY_PREFIX: &str = "ALLOW_";
pub const NAME_KEY: &str = "NAME";
pub const SYMBOL_KEY: &str = "SYMBOL";
pub const DECIMALS_KEY: &str = "DECIMALS";
pub const TOTAL_SUPPLY_KEY: &str = "TOTAL_SUPPLY";
pub const OWNER_KEY: &str = "OWNER";

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },
    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: u64, need: u64 },
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Arithmetic underflow")]
    Underflow,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Token already initialized")]
    AlreadyInitialized,
    #[error("Unknown entry point: {0}")]
    UnknownEntryPoint(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl From<AmountError> for TokenError {
    fn from(err: AmountError) -> Self {
        match err {
            AmountError::Overflow { .. } => TokenError::Overflow,
            AmountError::Underflow { .. } => TokenError::Underflow,
            other => TokenError::InvalidAmount(other.to_string()),
        }
    }
}

impl From<CodecError> for TokenError {
    fn from(err: CodecError) -> Self {
        TokenError::InvalidArguments(err.to_string())
    }
}

/// The token ledger over a host store and event sink
pub struct TokenLedger<S: KeyValueStore, E: EventSink> {
    store: S,
    events: E,
    policy: LedgerPolicy,
}

impl<S: KeyValueStore, E: EventSink> TokenLedger<S, E> {
    /// Create a ledger view over existing storage
    pub fn new(store: S, events: E, policy: LedgerPolicy) -> Self {
        Self {
            store,
            events,
            policy,
        }
    }

    /// Write token metadata and mint the initial supply to `owner`
    pub fn initialize(&mut self, config: &TokenConfig, owner: &Address) -> Result<(), TokenError> {
        config.validate()?;

        if self.store.contains(NAME_KEY) {
            return Err(TokenError::AlreadyInitialized);
        }

        let initial = Amount::new(config.initial_supply, config.currency());

        self.store.set(NAME_KEY, &config.name);
        self.store.set(SYMBOL_KEY, &config.symbol);
        self.store.set(DECIMALS_KEY, &config.decimals.to_string());
        self.store.set(TOTAL_SUPPLY_KEY, "0");
        self.store.set(OWNER_KEY, owner.as_str());

        if !initial.is_zero() {
            self.mint_unchecked(owner, &initial)?;
        }

        log::debug!(
            "Initialized token {} ({}) owned by {}",
            config.name,
            config.symbol,
            owner
        );
        Ok(())
    }

    /// Release the underlying store and sink
    pub fn into_parts(self) -> (S, E) {
        (self.store, self.events)
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    // =========================================================================
    // View Functions
    // =========================================================================

    /// Get token name
    pub fn name(&self) -> String {
        self.store.get_or_default(NAME_KEY, "")
    }

    /// Get token symbol
    pub fn symbol(&self) -> String {
        self.store.get_or_default(SYMBOL_KEY, "")
    }

    /// Get decimal places
    pub fn decimals(&self) -> u8 {
        let raw = self.store.get_or_default(DECIMALS_KEY, "0");
        raw.parse().unwrap_or_else(|_| {
            log::error!("Corrupt {} entry: {:?}", DECIMALS_KEY, raw);
            0
        })
    }

    /// Currency every ledger amount is expressed in
    pub fn currency(&self) -> Currency {
        Currency::new(self.symbol(), self.decimals())
    }

    /// Get total supply
    pub fn total_supply(&self) -> Amount {
        self.read_or_zero(TOTAL_SUPPLY_KEY)
    }

    /// Get the deploying account, if initialized
    pub fn owner(&self) -> Option<Address> {
        self.store
            .get(OWNER_KEY)
            .and_then(|raw| Address::parse(&raw).ok())
    }

    /// Get balance of an account
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.read_or_zero(&balance_key(account))
    }

    /// Get how much `spender` may move out of `owner`'s balance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.read_or_zero(&self.allowance_key(owner, spender))
    }

    // =========================================================================
    // Mutating Functions
    // =========================================================================

    /// Set the caller's allowance for `spender` to `amount` (replaces, does not add)
    pub fn approve<C: CallerIdentity + ?Sized>(
        &mut self,
        ctx: &C,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.ensure_currency(&amount)?;
        let owner = ctx.caller();
        self.set_allowance(owner, spender, amount);
        Ok(())
    }

    /// Raise the caller's allowance for `spender` by `added`
    pub fn increase_allowance<C: CallerIdentity + ?Sized>(
        &mut self,
        ctx: &C,
        spender: &Address,
        added: Amount,
    ) -> Result<(), TokenError> {
        self.ensure_currency(&added)?;
        let owner = ctx.caller();
        let current = self.load_amount(&self.allowance_key(owner, spender))?;
        let updated = current.checked_add(&added)?;
        self.set_allowance(owner, spender, updated);
        Ok(())
    }

    /// Lower the caller's allowance for `spender` by `subtracted`
    pub fn decrease_allowance<C: CallerIdentity + ?Sized>(
        &mut self,
        ctx: &C,
        spender: &Address,
        subtracted: Amount,
    ) -> Result<(), TokenError> {
        self.ensure_currency(&subtracted)?;
        let owner = ctx.caller();
        let current = self.load_amount(&self.allowance_key(owner, spender))?;
        let updated = current.checked_sub(&subtracted)?;
        self.set_allowance(owner, spender, updated);
        Ok(())
    }

    /// Create `amount` new tokens credited to `to`
    pub fn mint<C: CallerIdentity + ?Sized>(
        &mut self,
        ctx: &C,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.ensure_currency(&amount)?;

        if self.policy.mint == MintPolicy::OwnerOnly {
            let caller = ctx.caller();
            if self.owner().as_ref() != Some(caller) {
                return Err(TokenError::Unauthorized(format!(
                    "{} is not allowed to mint",
                    caller
                )));
            }
        }

        self.mint_unchecked(to, &amount)
    }

    /// Move `amount` from the caller to `to`
    pub fn transfer<C: CallerIdentity + ?Sized>(
        &mut self,
        ctx: &C,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.ensure_currency(&amount)?;
        let from = ctx.caller();

        let writes = self.plan_move(from, to, &amount)?;
        self.commit(writes);

        self.emit_transfer(Some(from), to, amount);
        Ok(())
    }

    /// Move `amount` from `from` to `to` on behalf of the caller, consuming allowance
    pub fn transfer_from<C: CallerIdentity + ?Sized>(
        &mut self,
        ctx: &C,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.ensure_currency(&amount)?;
        let spender = ctx.caller();

        let allowance_key = self.allowance_key(from, spender);
        let allowance = self.load_amount(&allowance_key)?;
        if allowance.is_less_than(&amount) {
            return Err(TokenError::InsufficientAllowance {
                have: allowance.value(),
                need: amount.value(),
            });
        }
        let remaining = allowance.checked_sub(&amount)?;

        let mut writes = self.plan_move(from, to, &amount)?;
        writes.push((allowance_key, remaining));
        self.commit(writes);

        self.emit_transfer(Some(from), to, amount);
        Ok(())
    }

    // =========================================================================
    // Internal Functions
    // =========================================================================

    fn mint_unchecked(&mut self, to: &Address, amount: &Amount) -> Result<(), TokenError> {
        let new_supply = self.load_amount(TOTAL_SUPPLY_KEY)?.checked_add(amount)?;
        let new_balance = self.load_amount(&balance_key(to))?.checked_add(amount)?;

        self.commit(vec![
            (TOTAL_SUPPLY_KEY.to_string(), new_supply),
            (balance_key(to), new_balance),
        ]);

        self.emit_transfer(None, to, amount.clone());
        Ok(())
    }

    /// Compute the balance writes of a move without applying them
    fn plan_move(
        &self,
        from: &Address,
        to: &Address,
        amount: &Amount,
    ) -> Result<Vec<(String, Amount)>, TokenError> {
        let from_key = balance_key(from);
        let from_balance = self.load_amount(&from_key)?;
        if from_balance.is_less_than(amount) {
            return Err(TokenError::InsufficientBalance {
                have: from_balance.value(),
                need: amount.value(),
            });
        }

        // Self-transfer: nothing moves
        if from == to {
            return Ok(Vec::new());
        }

        let to_key = balance_key(to);
        let new_from = from_balance.checked_sub(amount)?;
        let new_to = self.load_amount(&to_key)?.checked_add(amount)?;

        Ok(vec![(from_key, new_from), (to_key, new_to)])
    }

    fn commit(&mut self, writes: Vec<(String, Amount)>) {
        for (key, amount) in writes {
            log::debug!("{} <- {}", key, amount);
            self.store.set(&key, &amount.value().to_string());
        }
    }

    fn set_allowance(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        let key = self.allowance_key(owner, spender);
        self.commit(vec![(key, amount.clone())]);
        TokenEvent::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        }
        .emit(&mut self.events);
    }

    fn emit_transfer(&mut self, from: Option<&Address>, to: &Address, amount: Amount) {
        TokenEvent::Transfer {
            from: from.cloned(),
            to: to.clone(),
            amount,
        }
        .emit(&mut self.events);
    }

    fn ensure_currency(&self, amount: &Amount) -> Result<(), TokenError> {
        Amount::zero(self.currency()).ensure_same_currency(amount)?;
        Ok(())
    }

    /// Read a stored amount; absent entries are zero
    fn load_amount(&self, key: &str) -> Result<Amount, TokenError> {
        let raw = self.store.get_or_default(key, "0");
        Amount::parse(&raw, self.currency())
            .map_err(|_| TokenError::InvalidAmount(format!("corrupt entry {}: {:?}", key, raw)))
    }

    fn read_or_zero(&self, key: &str) -> Amount {
        self.load_amount(key).unwrap_or_else(|err| {
            log::error!("{}", err);
            Amount::zero(self.currency())
        })
    }

    fn allowance_key(&self, owner: &Address, spender: &Address) -> String {
        allowance_key(self.policy.allowance_keys, owner, spender)
    }
}

/// Storage key of an account balance
pub fn balance_key(account: &Address) -> String {
    format!("{}{}", BALANCE_KEY_PREFIX, account)
}

/// Storage key of an allowance under the given layout
pub fn allowance_key(scheme: AllowanceKeyScheme, owner: &Address, spender: &Address) -> String {
    match scheme {
        AllowanceKeyScheme::Concatenated => {
            format!("{}{}{}", ALLOWANCE_KEY_PREFIX, owner, spender)
        }
        AllowanceKeyScheme::Delimited => {
            format!("{}{}:{}", ALLOWANCE_KEY_PREFIX, owner, spender)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EventLog, MemoryStore};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    type Ledger = TokenLedger<MemoryStore, EventLog>;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn config(policy: MintPolicy) -> TokenConfig {
        TokenConfig::new("Test Token", "TST", 2, policy)
    }

    fn create_ledger(policy: MintPolicy) -> Ledger {
        let config = config(policy);
        let mut ledger = TokenLedger::new(MemoryStore::new(), EventLog::new(), config.policy());
        ledger.initialize(&config, &addr("Acreator")).unwrap();
        ledger
    }

    fn tst(value: u64) -> Amount {
        Amount::new(value, Currency::new("TST", 2))
    }

    fn balances_sum(ledger: &Ledger, accounts: &[Address]) -> u64 {
        accounts.iter().map(|a| ledger.balance_of(a).value()).sum()
    }

    #[test]
    fn test_metadata() {
        let ledger = create_ledger(MintPolicy::Open);
        assert_eq!(ledger.name(), "Test Token");
        assert_eq!(ledger.symbol(), "TST");
        assert_eq!(ledger.decimals(), 2);
        assert_eq!(ledger.total_supply(), tst(0));
        assert_eq!(ledger.owner(), Some(addr("Acreator")));
    }

    #[test]
    fn test_uninitialized_defaults() {
        let ledger = TokenLedger::new(
            MemoryStore::new(),
            EventLog::new(),
            config(MintPolicy::Open).policy(),
        );
        assert_eq!(ledger.name(), "");
        assert_eq!(ledger.symbol(), "");
        assert_eq!(ledger.decimals(), 0);
        assert_eq!(ledger.total_supply().value(), 0);
        assert_eq!(ledger.owner(), None);
    }

    #[test]
    fn test_initialize_twice() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let result = ledger.initialize(&config(MintPolicy::Open), &addr("Abob"));
        assert_eq!(result, Err(TokenError::AlreadyInitialized));
    }

    #[test]
    fn test_initial_supply_goes_to_owner() {
        let config = config(MintPolicy::OwnerOnly).with_initial_supply(10000);
        let mut ledger = TokenLedger::new(MemoryStore::new(), EventLog::new(), config.policy());
        ledger.initialize(&config, &addr("Acreator")).unwrap();

        assert_eq!(ledger.total_supply(), tst(10000));
        assert_eq!(ledger.balance_of(&addr("Acreator")), tst(10000));
        assert_eq!(ledger.events().events(), &["TRANSFER:,Acreator,10000".to_string()]);
    }

    #[test]
    fn test_defaults_to_zero() {
        let ledger = create_ledger(MintPolicy::Open);
        assert_eq!(ledger.balance_of(&addr("Anobody")), tst(0));
        assert_eq!(ledger.allowance(&addr("Anobody"), &addr("Abob")), tst(0));
    }

    #[test]
    fn test_mint_and_transfer_scenario() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        let b = addr("Adave");

        ledger.mint(&a, &a, tst(10000)).unwrap();
        assert_eq!(ledger.total_supply(), tst(10000));
        assert_eq!(ledger.balance_of(&a), tst(10000));

        ledger.transfer(&a, &b, tst(5)).unwrap();
        assert_eq!(ledger.balance_of(&a), tst(9995));
        assert_eq!(ledger.balance_of(&b), tst(5));
        assert_eq!(ledger.total_supply(), tst(10000));

        assert_eq!(
            ledger.events().events(),
            &[
                "TRANSFER:,Abob,10000".to_string(),
                "TRANSFER:Abob,Adave,5".to_string()
            ]
        );
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        let b = addr("Adave");
        ledger.mint(&a, &a, tst(10)).unwrap();
        let events_before = ledger.events().len();

        let result = ledger.transfer(&a, &b, tst(11));
        assert_eq!(
            result,
            Err(TokenError::InsufficientBalance { have: 10, need: 11 })
        );
        assert_eq!(ledger.balance_of(&a), tst(10));
        assert_eq!(ledger.balance_of(&b), tst(0));
        assert_eq!(ledger.events().len(), events_before);
    }

    #[test]
    fn test_transfer_entire_balance() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        let b = addr("Adave");
        ledger.mint(&a, &a, tst(10)).unwrap();

        ledger.transfer(&a, &b, tst(10)).unwrap();
        assert_eq!(ledger.balance_of(&a), tst(0));
        assert_eq!(ledger.balance_of(&b), tst(10));
    }

    #[test]
    fn test_self_transfer_is_noop() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        ledger.mint(&a, &a, tst(10)).unwrap();

        ledger.transfer(&a, &a, tst(4)).unwrap();
        assert_eq!(ledger.balance_of(&a), tst(10));
        assert_eq!(ledger.total_supply(), tst(10));
        assert_eq!(
            ledger.events().events().last().unwrap(),
            "TRANSFER:Abob,Abob,4"
        );

        // The balance check still applies
        assert_eq!(
            ledger.transfer(&a, &a, tst(11)),
            Err(TokenError::InsufficientBalance { have: 10, need: 11 })
        );
    }

    #[test]
    fn test_self_transfer_at_max_balance() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        ledger.mint(&a, &a, tst(u64::MAX)).unwrap();

        ledger.transfer(&a, &a, tst(u64::MAX)).unwrap();
        assert_eq!(ledger.balance_of(&a), tst(u64::MAX));
    }

    #[test]
    fn test_approve_replaces() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let owner = addr("Aowner");
        let spender = addr("Aspender");

        ledger.approve(&owner, &spender, tst(5000)).unwrap();
        assert_eq!(ledger.allowance(&owner, &spender), tst(5000));

        ledger.approve(&owner, &spender, tst(3000)).unwrap();
        assert_eq!(ledger.allowance(&owner, &spender), tst(3000));

        ledger.approve(&owner, &spender, tst(0)).unwrap();
        assert_eq!(ledger.allowance(&owner, &spender), tst(0));

        assert_eq!(
            ledger.events().events().last().unwrap(),
            "APPROVAL:Aowner,Aspender,0"
        );
    }

    #[test]
    fn test_approve_currency_mismatch() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let owner = addr("Aowner");
        let spender = addr("Aspender");

        let result = ledger.approve(&owner, &spender, Amount::new(5, Currency::new("XYZ", 2)));
        assert!(matches!(result, Err(TokenError::InvalidAmount(_))));
        assert_eq!(ledger.allowance(&owner, &spender), tst(0));
        assert!(ledger.events().events().is_empty());
    }

    #[test]
    fn test_increase_then_decrease_restores() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let owner = addr("Aowner");
        let spender = addr("Aspender");
        ledger.approve(&owner, &spender, tst(70)).unwrap();

        ledger.increase_allowance(&owner, &spender, tst(30)).unwrap();
        assert_eq!(ledger.allowance(&owner, &spender), tst(100));
        assert_eq!(
            ledger.events().events().last().unwrap(),
            "APPROVAL:Aowner,Aspender,100"
        );

        ledger.decrease_allowance(&owner, &spender, tst(30)).unwrap();
        assert_eq!(ledger.allowance(&owner, &spender), tst(70));
    }

    #[test]
    fn test_increase_allowance_overflow() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let owner = addr("Aowner");
        let spender = addr("Aspender");
        ledger.approve(&owner, &spender, tst(u64::MAX)).unwrap();

        let result = ledger.increase_allowance(&owner, &spender, tst(1));
        assert_eq!(result, Err(TokenError::Overflow));
        assert_eq!(ledger.allowance(&owner, &spender), tst(u64::MAX));
    }

    #[test]
    fn test_decrease_allowance_below_zero() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let owner = addr("Aowner");
        let spender = addr("Aspender");
        ledger.approve(&owner, &spender, tst(3)).unwrap();

        let result = ledger.decrease_allowance(&owner, &spender, tst(4));
        assert_eq!(result, Err(TokenError::Underflow));
        assert_eq!(ledger.allowance(&owner, &spender), tst(3));
    }

    #[test]
    fn test_transfer_from_scenario() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        let b = addr("Adave");
        let c = addr("Aerin");
        ledger.mint(&a, &a, tst(100)).unwrap();

        ledger.approve(&a, &b, tst(5)).unwrap();
        ledger.transfer_from(&b, &a, &c, tst(5)).unwrap();

        assert_eq!(ledger.balance_of(&a), tst(95));
        assert_eq!(ledger.balance_of(&c), tst(5));
        assert_eq!(ledger.allowance(&a, &b), tst(0));
        assert_eq!(ledger.total_supply(), tst(100));
        assert_eq!(
            ledger.events().events().last().unwrap(),
            "TRANSFER:Abob,Aerin,5"
        );
    }

    #[test]
    fn test_transfer_from_insufficient_allowance() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        let b = addr("Adave");
        let c = addr("Aerin");
        ledger.mint(&a, &a, tst(100)).unwrap();
        ledger.approve(&a, &b, tst(3)).unwrap();

        let result = ledger.transfer_from(&b, &a, &c, tst(5));
        assert_eq!(
            result,
            Err(TokenError::InsufficientAllowance { have: 3, need: 5 })
        );
        assert_eq!(ledger.balance_of(&a), tst(100));
        assert_eq!(ledger.balance_of(&c), tst(0));
        assert_eq!(ledger.allowance(&a, &b), tst(3));
    }

    #[test]
    fn test_transfer_from_insufficient_balance_keeps_allowance() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        let b = addr("Adave");
        let c = addr("Aerin");
        ledger.mint(&a, &a, tst(2)).unwrap();
        ledger.approve(&a, &b, tst(10)).unwrap();

        let result = ledger.transfer_from(&b, &a, &c, tst(5));
        assert_eq!(
            result,
            Err(TokenError::InsufficientBalance { have: 2, need: 5 })
        );
        assert_eq!(ledger.allowance(&a, &b), tst(10));
        assert_eq!(ledger.balance_of(&a), tst(2));
    }

    #[test]
    fn test_transfer_from_to_owner_consumes_allowance() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        let b = addr("Adave");
        ledger.mint(&a, &a, tst(10)).unwrap();
        ledger.approve(&a, &b, tst(6)).unwrap();

        ledger.transfer_from(&b, &a, &a, tst(4)).unwrap();
        assert_eq!(ledger.balance_of(&a), tst(10));
        assert_eq!(ledger.allowance(&a, &b), tst(2));
    }

    #[test]
    fn test_mint_owner_only() {
        let mut ledger = create_ledger(MintPolicy::OwnerOnly);
        let creator = addr("Acreator");
        let bob = addr("Abob");

        let result = ledger.mint(&bob, &bob, tst(10));
        assert!(matches!(result, Err(TokenError::Unauthorized(_))));
        assert_eq!(ledger.total_supply(), tst(0));

        ledger.mint(&creator, &bob, tst(10)).unwrap();
        assert_eq!(ledger.balance_of(&bob), tst(10));
    }

    #[test]
    fn test_mint_overflow_has_no_effect() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let a = addr("Abob");
        let b = addr("Adave");
        ledger.mint(&a, &a, tst(u64::MAX - 1)).unwrap();

        let result = ledger.mint(&a, &b, tst(2));
        assert_eq!(result, Err(TokenError::Overflow));
        assert_eq!(ledger.total_supply(), tst(u64::MAX - 1));
        assert_eq!(ledger.balance_of(&b), tst(0));
    }

    #[test]
    fn test_corrupt_entry_rejects_mutation() {
        let mut store = MemoryStore::new();
        let config = config(MintPolicy::Open);
        {
            let mut ledger = TokenLedger::new(&mut store, EventLog::new(), config.policy());
            ledger.initialize(&config, &addr("Acreator")).unwrap();
        }
        store.set("BALANCE_Abob", "lots");

        let mut ledger = TokenLedger::new(&mut store, EventLog::new(), config.policy());
        let bob = addr("Abob");
        assert_eq!(ledger.balance_of(&bob), tst(0));
        assert!(matches!(
            ledger.transfer(&bob, &addr("Adave"), tst(1)),
            Err(TokenError::InvalidAmount(_))
        ));
        assert_eq!(ledger.balance_of(&addr("Adave")), tst(0));
    }

    #[test]
    fn test_allowance_key_layouts() {
        let owner = addr("A11A22");
        let spender = addr("A33A44");
        assert_eq!(
            allowance_key(AllowanceKeyScheme::Concatenated, &owner, &spender),
            "ALLOW_A11A22A33A44"
        );
        assert_eq!(
            allowance_key(AllowanceKeyScheme::Delimited, &owner, &spender),
            "ALLOW_A11A22:A33A44"
        );
    }

    #[test]
    fn test_concatenated_keys_can_collide() {
        let mut ledger = create_ledger(MintPolicy::Open);
        let (o1, s1) = (addr("A11A22"), addr("A33A44"));
        let (o2, s2) = (addr("A11A22A33"), addr("A44"));

        ledger.approve(&o1, &s1, tst(7)).unwrap();
        assert_eq!(ledger.allowance(&o2, &s2), tst(7));
    }

    #[test]
    fn test_delimited_keys_keep_pairs_apart() {
        let config = config(MintPolicy::Open).with_allowance_keys(AllowanceKeyScheme::Delimited);
        let mut ledger = TokenLedger::new(MemoryStore::new(), EventLog::new(), config.policy());
        ledger.initialize(&config, &addr("Acreator")).unwrap();

        let (o1, s1) = (addr("A11A22"), addr("A33A44"));
        let (o2, s2) = (addr("A11A22A33"), addr("A44"));

        ledger.approve(&o1, &s1, tst(7)).unwrap();
        assert_eq!(ledger.allowance(&o1, &s1), tst(7));
        assert_eq!(ledger.allowance(&o2, &s2), tst(0));
    }

    #[test]
    fn test_supply_conservation_randomized() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut ledger = create_ledger(MintPolicy::Open);
        let accounts: Vec<Address> = ["Abob", "Adave", "Aerin", "Afrank", "Agina"]
            .iter()
            .map(|s| addr(s))
            .collect();

        for _ in 0..500 {
            let i = rng.gen_range(0..accounts.len());
            let j = rng.gen_range(0..accounts.len());
            let k = rng.gen_range(0..accounts.len());
            let value = rng.gen_range(0..200);

            let _ = match rng.gen_range(0..4) {
                0 => ledger.mint(&accounts[i], &accounts[j], tst(value)),
                1 => ledger.transfer(&accounts[i], &accounts[j], tst(value)),
                2 => ledger.approve(&accounts[i], &accounts[j], tst(value)),
                _ => ledger.transfer_from(&accounts[k], &accounts[i], &accounts[j], tst(value)),
            };

            assert_eq!(
                balances_sum(&ledger, &accounts),
                ledger.total_supply().value()
            );
        }
    }
}
