//! CLI commands for the token ledger
//!
//! Implements all command handlers for the CLI interface. Mutations are
//! sent through the serialized entry points, exactly as an external
//! caller would submit them, and the host is persisted after each one.

use crate::contract::{CallResult, ContractHost, TokenContract};
use crate::crypto::account_address;
use crate::storage::{load_from_file, save_to_file, HostSnapshot, Storage, StorageConfig};
use crate::token::{
    is_read_only, AccountArgs, AllowanceArgs, Bundle, MintArgs, SetAllowanceArgs, TokenConfig,
    TransferArgs, TransferFromArgs,
};
use crate::types::{codec, Address, Amount};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub host: ContractHost,
    pub storage: Storage,
    pub block_height: u64,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };
        let storage = Storage::new(storage_config)?;

        let (host, block_height) = if storage.exists() {
            let snapshot = storage.load()?;
            log::debug!(
                "Loaded host state saved at {} (height {})",
                snapshot.saved_at,
                snapshot.block_height
            );
            (snapshot.host, snapshot.block_height)
        } else {
            log::debug!("No saved state in {:?}, starting empty", data_dir);
            (ContractHost::new(), 0)
        };

        Ok(Self {
            host,
            storage,
            block_height,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        let snapshot = HostSnapshot::new(self.host.clone(), self.block_height);
        self.storage.save(&snapshot)?;
        Ok(())
    }

    fn contract(&self, token: &Address) -> CliResult<&TokenContract> {
        self.host
            .get(token)
            .ok_or_else(|| format!("Contract not found: {}", token).into())
    }

    fn amount(&self, token: &Address, value: u64) -> CliResult<Amount> {
        Ok(Amount::new(value, self.contract(token)?.config.currency()))
    }

    /// Submit a call; writes advance the height and are persisted
    fn submit(
        &mut self,
        token: &Address,
        caller: &Address,
        function: &str,
        args: &str,
    ) -> CliResult<CallResult> {
        let read_only = is_read_only(function);
        let block_number = if read_only {
            self.block_height
        } else {
            self.block_height + 1
        };

        let result = self
            .host
            .call(token, caller, function, args, now(), block_number)?;

        if result.success && !read_only {
            self.block_height = block_number;
            self.save()?;
        }

        Ok(result)
    }
}

fn now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

fn parse_address(value: &str) -> CliResult<Address> {
    Ok(Address::parse(value)?)
}

fn print_outcome(result: &CallResult) {
    if result.success {
        println!("✅ Call succeeded");
        if let Some(value) = &result.return_value {
            println!("   Return value: {}", value);
        }
        println!("   Storage changes: {}", result.storage_changes);
        for event in &result.events {
            println!("   📣 {}", event);
        }
    } else {
        println!(
            "❌ Call rejected: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
        println!("   No state was changed.");
    }
}

fn decode_amount(result: &CallResult) -> CliResult<Option<Amount>> {
    match (&result.return_value, result.success) {
        (Some(bundle), true) => Ok(Some(codec::decode(bundle)?)),
        _ => Ok(None),
    }
}

// =============================================================================
// Deployment and inspection
// =============================================================================

/// Deploy a new token contract
pub fn cmd_deploy(state: &mut AppState, deployer: &str, config: TokenConfig) -> CliResult<()> {
    let deployer = parse_address(deployer)?;

    println!("📜 Deploying token {} ({})...", config.name, config.symbol);

    let block_number = state.block_height + 1;
    let address = state.host.deploy(config, &deployer, now(), block_number)?;
    state.block_height = block_number;
    state.save()?;

    let contract = state.contract(&address)?;
    let view = contract.view();

    println!("✅ Token deployed!");
    println!("   📍 Address: {}", address);
    println!("   👤 Owner: {}", deployer);
    println!("   🔢 Decimals: {}", view.decimals());
    println!("   💰 Total supply: {}", view.total_supply());
    println!("   🔐 Mint policy: {:?}", contract.config.mint_policy);

    Ok(())
}

/// Derive an account address from a seed
pub fn cmd_account(seed: &str) -> CliResult<()> {
    let address = account_address(seed);
    println!("🔑 Account address for seed {:?}", seed);
    println!("   📍 {}", address);
    Ok(())
}

/// List all deployed tokens
pub fn cmd_list(state: &AppState) -> CliResult<()> {
    let tokens = state.host.list();

    if tokens.is_empty() {
        println!("📭 No tokens deployed yet. Deploy one with: token-ledger deploy");
        return Ok(());
    }

    println!("📋 Deployed tokens ({}):", tokens.len());
    for address in &tokens {
        let contract = state.contract(address)?;
        println!(
            "   {} - {} ({})",
            address, contract.config.name, contract.config.symbol
        );
    }

    Ok(())
}

/// List accounts holding a balance entry
pub fn cmd_holders(state: &AppState, token: &str) -> CliResult<()> {
    let token = parse_address(token)?;
    let holders = state.contract(&token)?.holders();

    if holders.is_empty() {
        println!("📭 No balances recorded for {}", token);
        return Ok(());
    }

    println!("👥 Holders of {} ({}):", token, holders.len());
    for (account, balance) in &holders {
        println!("   {} - {}", account, balance);
    }

    Ok(())
}

/// Display token information
pub fn cmd_info(state: &AppState, token: &str) -> CliResult<()> {
    let token = parse_address(token)?;
    let contract = state.contract(&token)?;
    let view = contract.view();

    println!("🪙 Token: {}", token);
    println!("   ├─ Name: {}", view.name());
    println!("   ├─ Symbol: {}", view.symbol());
    println!("   ├─ Decimals: {}", view.decimals());
    println!("   ├─ Total supply: {}", view.total_supply());
    match view.owner() {
        Some(owner) => println!("   ├─ Owner: {}", owner),
        None => println!("   ├─ Owner: -"),
    }
    println!("   ├─ Mint policy: {:?}", contract.config.mint_policy);
    println!("   ├─ Allowance keys: {:?}", contract.config.allowance_keys);
    println!("   ├─ Deployed at block: {}", contract.deployed_at);
    println!("   └─ Storage entries: {}", contract.storage.len());

    Ok(())
}

/// Show an account balance
pub fn cmd_balance(state: &mut AppState, token: &str, account: &str) -> CliResult<()> {
    let token = parse_address(token)?;
    let account = parse_address(account)?;

    let args = AccountArgs::new(&account).to_bundle()?;
    let result = state.submit(&token, &account, "balanceOf", &args)?;

    match decode_amount(&result)? {
        Some(balance) => {
            println!("💰 Balance for {}", account);
            println!("   {} {}", balance, balance.currency().name());
        }
        None => print_outcome(&result),
    }

    Ok(())
}

/// Show the allowance granted by `owner` to `spender`
pub fn cmd_allowance(
    state: &mut AppState,
    token: &str,
    owner: &str,
    spender: &str,
) -> CliResult<()> {
    let token = parse_address(token)?;
    let owner = parse_address(owner)?;
    let spender = parse_address(spender)?;

    let args = AllowanceArgs::new(&owner, &spender).to_bundle()?;
    let result = state.submit(&token, &owner, "allowance", &args)?;

    match decode_amount(&result)? {
        Some(allowance) => {
            println!("🤝 Allowance {} -> {}", owner, spender);
            println!("   {} {}", allowance, allowance.currency().name());
        }
        None => print_outcome(&result),
    }

    Ok(())
}

// =============================================================================
// Mutations
// =============================================================================

/// Mint new tokens
pub fn cmd_mint(
    state: &mut AppState,
    token: &str,
    caller: &str,
    to: &str,
    amount: u64,
) -> CliResult<()> {
    let token = parse_address(token)?;
    let caller = parse_address(caller)?;
    let to = parse_address(to)?;

    println!("🏭 Minting {} to {}", amount, to);
    let args = MintArgs::new(&to, state.amount(&token, amount)?).to_bundle()?;
    let result = state.submit(&token, &caller, "mint", &args)?;
    print_outcome(&result);

    Ok(())
}

/// Transfer tokens from the caller
pub fn cmd_transfer(
    state: &mut AppState,
    token: &str,
    caller: &str,
    to: &str,
    amount: u64,
) -> CliResult<()> {
    let token = parse_address(token)?;
    let caller = parse_address(caller)?;
    let to = parse_address(to)?;

    println!("📤 Transferring {} from {} to {}", amount, caller, to);
    let args = TransferArgs::new(&to, state.amount(&token, amount)?).to_bundle()?;
    let result = state.submit(&token, &caller, "transfer", &args)?;
    print_outcome(&result);

    Ok(())
}

/// Set, raise or lower the allowance of `spender` over the caller's funds
///
/// `function` is one of `approve`, `increaseAllowance` or `decreaseAllowance`.
pub fn cmd_set_allowance(
    state: &mut AppState,
    token: &str,
    caller: &str,
    function: &str,
    spender: &str,
    amount: u64,
) -> CliResult<()> {
    let token = parse_address(token)?;
    let caller = parse_address(caller)?;
    let spender = parse_address(spender)?;

    println!("🤝 {} {} for {}", function, amount, spender);
    let args = SetAllowanceArgs::new(&spender, state.amount(&token, amount)?).to_bundle()?;
    let result = state.submit(&token, &caller, function, &args)?;
    print_outcome(&result);

    Ok(())
}

/// Transfer tokens on behalf of `from`
pub fn cmd_transfer_from(
    state: &mut AppState,
    token: &str,
    caller: &str,
    from: &str,
    to: &str,
    amount: u64,
) -> CliResult<()> {
    let token = parse_address(token)?;
    let caller = parse_address(caller)?;
    let from = parse_address(from)?;
    let to = parse_address(to)?;

    println!("📤 {} moving {} from {} to {}", caller, amount, from, to);
    let args = TransferFromArgs::new(&from, &to, state.amount(&token, amount)?).to_bundle()?;
    let result = state.submit(&token, &caller, "transferFrom", &args)?;
    print_outcome(&result);

    Ok(())
}

/// Call any entry point with a raw argument bundle
pub fn cmd_call(
    state: &mut AppState,
    token: &str,
    caller: &str,
    function: &str,
    args: &str,
) -> CliResult<()> {
    let token = parse_address(token)?;
    let caller = parse_address(caller)?;

    println!("📞 Calling {}.{}...", token, function);
    let result = state.submit(&token, &caller, function, args)?;
    print_outcome(&result);

    Ok(())
}

// =============================================================================
// Utilities
// =============================================================================

/// Show storage statistics
pub fn cmd_stats(state: &AppState) -> CliResult<()> {
    let stats = state.storage.stats()?;

    println!("💾 Storage");
    println!("   ├─ Data directory: {:?}", stats.data_dir);
    println!("   ├─ State file size: {} bytes", stats.file_size);
    println!("   ├─ Backups: {}", stats.backup_count);
    println!("   ├─ Block height: {}", state.block_height);
    println!("   ├─ Tokens: {}", state.host.count());
    println!("   └─ Events: {}", state.host.events().len());

    Ok(())
}

/// Replace the current state with a backup (0 is the most recent)
pub fn cmd_restore(state: &mut AppState, backup: usize) -> CliResult<()> {
    let available = state.storage.list_backups();
    if !available.contains(&backup) {
        println!("❌ Backup {} not found (available: {:?})", backup, available);
        return Ok(());
    }

    let snapshot = state.storage.restore_backup(backup)?;
    state.host = snapshot.host;
    state.block_height = snapshot.block_height;
    state.save()?;

    println!("♻️  Restored backup {} saved at {}", backup, snapshot.saved_at);
    println!("   Height: {}", state.block_height);

    Ok(())
}

/// Delete the saved state; backups are kept
pub fn cmd_reset(state: &mut AppState) -> CliResult<()> {
    state.storage.delete()?;
    state.host = ContractHost::new();
    state.block_height = 0;

    println!("🗑️  Ledger state deleted from {:?}", state.data_dir);
    println!("   Backups are kept; use `restore` to bring one back.");

    Ok(())
}

/// Export the host state to a file
pub fn cmd_export(state: &AppState, path: &Path) -> CliResult<()> {
    let snapshot = HostSnapshot::new(state.host.clone(), state.block_height);
    save_to_file(&snapshot, path)?;
    println!("📦 Ledger state exported to {:?}", path);
    Ok(())
}

/// Import the host state from a file
pub fn cmd_import(state: &mut AppState, path: &Path) -> CliResult<()> {
    let snapshot = load_from_file(path)?;
    state.host = snapshot.host;
    state.block_height = snapshot.block_height;
    state.save()?;

    println!("📥 Ledger state imported from {:?}", path);
    println!("   Tokens: {}", state.host.count());
    println!("   Height: {}", state.block_height);

    Ok(())
}

/// Encode a JSON value as an argument bundle
pub fn cmd_encode(json: &str) -> CliResult<()> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    println!("{}", codec::encode(&value)?);
    Ok(())
}

/// List committed events, newest last
pub fn cmd_events(state: &AppState, token: Option<&str>, count: usize) -> CliResult<()> {
    let events: Vec<_> = match token {
        Some(token) => {
            let token = parse_address(token)?;
            state.host.events_for(&token).cloned().collect()
        }
        None => state.host.events().to_vec(),
    };

    if events.is_empty() {
        println!("📭 No events recorded.");
        return Ok(());
    }

    let start = events.len().saturating_sub(count);
    println!("📣 Events ({} of {}):", events.len() - start, events.len());
    for event in &events[start..] {
        println!(
            "   #{} | {} | {} | {}",
            event.block_number, event.contract, event.caller, event.data
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MintPolicy;

    fn state_in(dir: &std::path::Path) -> AppState {
        AppState::new(dir.to_path_buf()).unwrap()
    }

    fn deploy(state: &mut AppState, deployer: &Address) -> Address {
        let config = TokenConfig::new("Cli Token", "CLI", 0, MintPolicy::OwnerOnly);
        cmd_deploy(state, deployer.as_str(), config).unwrap();
        state.host.list()[0].clone()
    }

    fn balance(state: &AppState, token: &Address, account: &Address) -> u64 {
        state
            .host
            .get(token)
            .unwrap()
            .view()
            .balance_of(account)
            .value()
    }

    #[test]
    fn test_mutations_are_persisted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let deployer = account_address("deployer");
        let bob = account_address("bob");

        let token = {
            let mut state = state_in(temp_dir.path());
            let token = deploy(&mut state, &deployer);
            cmd_mint(&mut state, token.as_str(), deployer.as_str(), deployer.as_str(), 100)
                .unwrap();
            cmd_transfer(&mut state, token.as_str(), deployer.as_str(), bob.as_str(), 30)
                .unwrap();
            assert_eq!(state.block_height, 3);
            token
        };

        let state = state_in(temp_dir.path());
        assert_eq!(state.block_height, 3);
        assert_eq!(balance(&state, &token, &deployer), 70);
        assert_eq!(balance(&state, &token, &bob), 30);
        assert_eq!(state.host.events_for(&token).count(), 2);
    }

    #[test]
    fn test_rejected_call_keeps_height() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut state = state_in(temp_dir.path());
        let deployer = account_address("deployer");
        let bob = account_address("bob");
        let token = deploy(&mut state, &deployer);

        cmd_transfer(&mut state, token.as_str(), bob.as_str(), deployer.as_str(), 1).unwrap();
        assert_eq!(state.block_height, 1);

        // Views never advance the height
        cmd_balance(&mut state, token.as_str(), bob.as_str()).unwrap();
        assert_eq!(state.block_height, 1);
    }

    #[test]
    fn test_delegated_transfer() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut state = state_in(temp_dir.path());
        let deployer = account_address("deployer");
        let spender = account_address("spender");
        let bob = account_address("bob");
        let token = deploy(&mut state, &deployer);
        let (t, d, s) = (token.as_str(), deployer.as_str(), spender.as_str());

        cmd_mint(&mut state, t, d, d, 50).unwrap();
        cmd_set_allowance(&mut state, t, d, "approve", s, 20).unwrap();
        cmd_set_allowance(&mut state, t, d, "increaseAllowance", s, 5).unwrap();
        cmd_transfer_from(&mut state, t, s, d, bob.as_str(), 25).unwrap();

        let view = state.host.get(&token).unwrap().view();
        assert_eq!(view.balance_of(&bob).value(), 25);
        assert_eq!(view.allowance(&deployer, &spender).value(), 0);
    }

    #[test]
    fn test_restore_backup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut state = state_in(temp_dir.path());
        let deployer = account_address("deployer");
        let bob = account_address("bob");
        let token = deploy(&mut state, &deployer);
        let t = token.as_str();

        cmd_mint(&mut state, t, deployer.as_str(), deployer.as_str(), 10).unwrap();
        cmd_transfer(&mut state, t, deployer.as_str(), bob.as_str(), 4).unwrap();
        assert_eq!(balance(&state, &token, &bob), 4);

        // Backup 0 is the state before the transfer
        cmd_restore(&mut state, 0).unwrap();
        assert_eq!(state.block_height, 2);
        assert_eq!(balance(&state, &token, &bob), 0);
        assert_eq!(balance(&state, &token, &deployer), 10);

        let reloaded = state_in(temp_dir.path());
        assert_eq!(reloaded.block_height, 2);

        // Unknown backups leave the state alone
        cmd_restore(&mut state, 42).unwrap();
        assert_eq!(state.block_height, 2);
        cmd_stats(&state).unwrap();
    }

    #[test]
    fn test_reset_and_import() {
        let temp_dir = tempfile::tempdir().unwrap();
        let export_dir = tempfile::tempdir().unwrap();
        let export_path = export_dir.path().join("export.json");
        let deployer = account_address("deployer");

        let mut state = state_in(temp_dir.path());
        let token = deploy(&mut state, &deployer);
        cmd_export(&state, &export_path).unwrap();

        cmd_reset(&mut state).unwrap();
        assert!(!state.storage.exists());
        assert_eq!(state.host.count(), 0);
        assert!(cmd_holders(&state, token.as_str()).is_err());

        cmd_import(&mut state, &export_path).unwrap();
        assert_eq!(state.block_height, 1);
        assert!(state.host.get(&token).is_some());
        assert_eq!(state_in(temp_dir.path()).host.count(), 1);
    }

    #[test]
    fn test_invalid_address_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut state = state_in(temp_dir.path());
        assert!(cmd_info(&state, "not-an-address").is_err());
        assert!(cmd_balance(&mut state, "Abob", "Xbad").is_err());
    }

    #[test]
    fn test_encode_rejects_bad_json() {
        assert!(cmd_encode(r#"{"account":"Abob"}"#).is_ok());
        assert!(cmd_encode("{not json").is_err());
    }
}
