//! Serialized entry points
//!
//! Thin adapters that decode an argument bundle, call the typed ledger
//! operation and encode its result. No ledger logic lives here.

use crate::host::{CallerIdentity, EventSink, KeyValueStore};
use crate::token::args::{
    AccountArgs, AllowanceArgs, Bundle, MintArgs, SetAllowanceArgs, TransferArgs,
    TransferFromArgs,
};
use crate::token::ledger::{TokenError, TokenLedger};
use crate::types::{codec, Amount};

/// Return value of every successful mutating entry point
pub const SUCCESS: &str = "true";

/// Entry points that never write
pub const READ_ENTRY_POINTS: &[&str] = &[
    "name",
    "symbol",
    "decimals",
    "totalSupply",
    "owner",
    "balanceOf",
    "allowance",
];

/// Entry points that may write
pub const WRITE_ENTRY_POINTS: &[&str] = &[
    "approve",
    "increaseAllowance",
    "decreaseAllowance",
    "mint",
    "transfer",
    "transferFrom",
];

/// Check if `function` is a known entry point
pub fn is_entry_point(function: &str) -> bool {
    READ_ENTRY_POINTS.contains(&function) || WRITE_ENTRY_POINTS.contains(&function)
}

/// Check if `function` only reads state
pub fn is_read_only(function: &str) -> bool {
    READ_ENTRY_POINTS.contains(&function)
}

/// Run the named entry point with a serialized argument bundle
pub fn dispatch<S, E, C>(
    ledger: &mut TokenLedger<S, E>,
    ctx: &C,
    function: &str,
    args: &str,
) -> Result<String, TokenError>
where
    S: KeyValueStore,
    E: EventSink,
    C: CallerIdentity + ?Sized,
{
    match function {
        "name" => Ok(ledger.name()),
        "symbol" => Ok(ledger.symbol()),
        "decimals" => Ok(ledger.decimals().to_string()),
        "totalSupply" => encode_amount(&ledger.total_supply()),
        "owner" => Ok(ledger.owner().map(String::from).unwrap_or_default()),
        "balanceOf" => {
            let args = AccountArgs::from_bundle(args)?;
            encode_amount(&ledger.balance_of(&args.account()?))
        }
        "allowance" => {
            let args = AllowanceArgs::from_bundle(args)?;
            encode_amount(&ledger.allowance(&args.owner()?, &args.spender()?))
        }
        "approve" => {
            let args = SetAllowanceArgs::from_bundle(args)?;
            ledger.approve(ctx, &args.spender()?, args.amount()?)?;
            Ok(SUCCESS.to_string())
        }
        "increaseAllowance" => {
            let args = SetAllowanceArgs::from_bundle(args)?;
            ledger.increase_allowance(ctx, &args.spender()?, args.amount()?)?;
            Ok(SUCCESS.to_string())
        }
        "decreaseAllowance" => {
            let args = SetAllowanceArgs::from_bundle(args)?;
            ledger.decrease_allowance(ctx, &args.spender()?, args.amount()?)?;
            Ok(SUCCESS.to_string())
        }
        "mint" => {
            let args = MintArgs::from_bundle(args)?;
            ledger.mint(ctx, &args.to()?, args.amount()?)?;
            Ok(SUCCESS.to_string())
        }
        "transfer" => {
            let args = TransferArgs::from_bundle(args)?;
            ledger.transfer(ctx, &args.to()?, args.amount()?)?;
            Ok(SUCCESS.to_string())
        }
        "transferFrom" => {
            let args = TransferFromArgs::from_bundle(args)?;
            ledger.transfer_from(ctx, &args.from_account()?, &args.to()?, args.amount()?)?;
            Ok(SUCCESS.to_string())
        }
        other => Err(TokenError::UnknownEntryPoint(other.to_string())),
    }
}

fn encode_amount(amount: &Amount) -> Result<String, TokenError> {
    Ok(codec::encode(amount)?)
}
