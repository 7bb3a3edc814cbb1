//! Token Ledger CLI Application
//!
//! A command-line interface for deploying and calling token contracts.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use token_ledger::cli::{self, AppState};
use token_ledger::token::{AllowanceKeyScheme, MintPolicy, TokenConfig};

#[derive(Parser)]
#[command(name = "token-ledger")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A fungible-token ledger in a deterministic contract host", long_about = None)]
struct Cli {
    /// Data directory for ledger state
    #[arg(short, long, global = true, default_value = ".token_ledger")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Anyone may mint
    Open,
    /// Only the deployer may mint
    OwnerOnly,
}

impl From<PolicyArg> for MintPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Open => MintPolicy::Open,
            PolicyArg::OwnerOnly => MintPolicy::OwnerOnly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KeySchemeArg {
    /// owner and spender joined directly
    Concatenated,
    /// owner and spender joined with ':'
    Delimited,
}

impl From<KeySchemeArg> for AllowanceKeyScheme {
    fn from(arg: KeySchemeArg) -> Self {
        match arg {
            KeySchemeArg::Concatenated => AllowanceKeyScheme::Concatenated,
            KeySchemeArg::Delimited => AllowanceKeyScheme::Delimited,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a new token contract
    Deploy {
        /// Deployer (and owner) address
        #[arg(long)]
        deployer: String,

        /// Token configuration file (JSON); overrides the flags below
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Token name
        #[arg(short, long, default_value = "Massa ERC20 Token")]
        name: String,

        /// Token symbol
        #[arg(short, long, default_value = "MET")]
        symbol: String,

        /// Number of decimals
        #[arg(long, default_value = "9")]
        decimals: u8,

        /// Supply minted to the deployer at deployment
        #[arg(long, default_value = "0")]
        initial_supply: u64,

        /// Who may mint
        #[arg(long, value_enum, default_value = "owner-only")]
        mint_policy: PolicyArg,

        /// Allowance storage key layout
        #[arg(long, value_enum, default_value = "concatenated")]
        allowance_keys: KeySchemeArg,
    },

    /// Derive an account address from a seed
    Account {
        /// Seed string
        seed: String,
    },

    /// List deployed tokens
    List,

    /// Show token information
    Info {
        /// Token contract address
        #[arg(short, long)]
        token: String,
    },

    /// List accounts holding a balance
    Holders {
        #[arg(short, long)]
        token: String,
    },

    /// Show an account balance
    Balance {
        #[arg(short, long)]
        token: String,

        /// Account address
        #[arg(short, long)]
        account: String,
    },

    /// Show an allowance
    Allowance {
        #[arg(short, long)]
        token: String,

        /// Owner of the funds
        #[arg(long)]
        owner: String,

        /// Spender allowed to move them
        #[arg(long)]
        spender: String,
    },

    /// Mint new tokens
    Mint {
        #[arg(short, long)]
        token: String,

        /// Calling address
        #[arg(long)]
        caller: String,

        /// Recipient
        #[arg(long)]
        to: String,

        #[arg(short, long)]
        amount: u64,
    },

    /// Transfer tokens from the caller
    Transfer {
        #[arg(short, long)]
        token: String,

        /// Calling address (the sender)
        #[arg(long)]
        caller: String,

        /// Recipient
        #[arg(long)]
        to: String,

        #[arg(short, long)]
        amount: u64,
    },

    /// Set the allowance of a spender (replaces the previous value)
    Approve {
        #[arg(short, long)]
        token: String,

        /// Calling address (the owner)
        #[arg(long)]
        caller: String,

        #[arg(long)]
        spender: String,

        #[arg(short, long)]
        amount: u64,
    },

    /// Raise the allowance of a spender
    IncreaseAllowance {
        #[arg(short, long)]
        token: String,

        #[arg(long)]
        caller: String,

        #[arg(long)]
        spender: String,

        #[arg(short, long)]
        amount: u64,
    },

    /// Lower the allowance of a spender
    DecreaseAllowance {
        #[arg(short, long)]
        token: String,

        #[arg(long)]
        caller: String,

        #[arg(long)]
        spender: String,

        #[arg(short, long)]
        amount: u64,
    },

    /// Transfer tokens on behalf of an owner
    TransferFrom {
        #[arg(short, long)]
        token: String,

        /// Calling address (the spender)
        #[arg(long)]
        caller: String,

        /// Owner of the funds
        #[arg(long)]
        from: String,

        /// Recipient
        #[arg(long)]
        to: String,

        #[arg(short, long)]
        amount: u64,
    },

    /// Call an entry point with a raw argument bundle
    Call {
        #[arg(short, long)]
        token: String,

        #[arg(long)]
        caller: String,

        /// Entry point name (e.g. balanceOf)
        #[arg(short, long)]
        function: String,

        /// Serialized argument bundle
        #[arg(long, default_value = "")]
        args: String,
    },

    /// Encode a JSON value as an argument bundle
    Encode {
        /// JSON value
        json: String,
    },

    /// Show committed events
    Events {
        /// Only events of this token
        #[arg(short, long)]
        token: Option<String>,

        /// Number of events to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Show storage statistics
    Stats,

    /// Restore the state from a backup
    Restore {
        /// Backup index (0 is the most recent)
        #[arg(short, long, default_value = "0")]
        backup: usize,
    },

    /// Delete the saved state (backups are kept)
    Reset,

    /// Export the ledger state to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import the ledger state from a file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Stateless commands
    match &cli.command {
        Commands::Account { seed } => return cli::cmd_account(seed),
        Commands::Encode { json } => return cli::cmd_encode(json),
        _ => {}
    }

    let mut state = AppState::new(cli.data_dir.clone())?;

    match cli.command {
        Commands::Account { .. } | Commands::Encode { .. } => unreachable!(),

        Commands::Deploy {
            deployer,
            config,
            name,
            symbol,
            decimals,
            initial_supply,
            mint_policy,
            allowance_keys,
        } => {
            let config = match config {
                Some(path) => TokenConfig::from_file(&path)?,
                None => TokenConfig::new(name, symbol, decimals, mint_policy.into())
                    .with_initial_supply(initial_supply)
                    .with_allowance_keys(allowance_keys.into()),
            };
            cli::cmd_deploy(&mut state, &deployer, config)?;
        }

        Commands::List => cli::cmd_list(&state)?,

        Commands::Info { token } => cli::cmd_info(&state, &token)?,

        Commands::Holders { token } => cli::cmd_holders(&state, &token)?,

        Commands::Balance { token, account } => {
            cli::cmd_balance(&mut state, &token, &account)?;
        }

        Commands::Allowance {
            token,
            owner,
            spender,
        } => {
            cli::cmd_allowance(&mut state, &token, &owner, &spender)?;
        }

        Commands::Mint {
            token,
            caller,
            to,
            amount,
        } => {
            cli::cmd_mint(&mut state, &token, &caller, &to, amount)?;
        }

        Commands::Transfer {
            token,
            caller,
            to,
            amount,
        } => {
            cli::cmd_transfer(&mut state, &token, &caller, &to, amount)?;
        }

        Commands::Approve {
            token,
            caller,
            spender,
            amount,
        } => {
            cli::cmd_set_allowance(&mut state, &token, &caller, "approve", &spender, amount)?;
        }

        Commands::IncreaseAllowance {
            token,
            caller,
            spender,
            amount,
        } => {
            cli::cmd_set_allowance(
                &mut state,
                &token,
                &caller,
                "increaseAllowance",
                &spender,
                amount,
            )?;
        }

        Commands::DecreaseAllowance {
            token,
            caller,
            spender,
            amount,
        } => {
            cli::cmd_set_allowance(
                &mut state,
                &token,
                &caller,
                "decreaseAllowance",
                &spender,
                amount,
            )?;
        }

        Commands::TransferFrom {
            token,
            caller,
            from,
            to,
            amount,
        } => {
            cli::cmd_transfer_from(&mut state, &token, &caller, &from, &to, amount)?;
        }

        Commands::Call {
            token,
            caller,
            function,
            args,
        } => {
            cli::cmd_call(&mut state, &token, &caller, &function, &args)?;
        }

        Commands::Events { token, count } => {
            cli::cmd_events(&state, token.as_deref(), count)?;
        }

        Commands::Stats => cli::cmd_stats(&state)?,

        Commands::Restore { backup } => cli::cmd_restore(&mut state, backup)?,

        Commands::Reset => cli::cmd_reset(&mut state)?,

        Commands::Export { output } => cli::cmd_export(&state, &output)?,

        Commands::Import { input } => cli::cmd_import(&mut state, &input)?,
    }

    Ok(())
}
