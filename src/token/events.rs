//! Token events
//!
//! Typed form of the events the ledger emits; [`TokenEvent::emit`]
//! renders them into an [`EventSink`].

use crate::host::EventSink;
use crate::types::{Address, Amount};

/// Event name for balance movements (including mints)
pub const TRANSFER_EVENT_NAME: &str = "TRANSFER";

/// Event name for allowance changes
pub const APPROVAL_EVENT_NAME: &str = "APPROVAL";

/// A state change notice
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenEvent {
    /// Tokens moved; `from` is `None` for mints
    Transfer {
        from: Option<Address>,
        to: Address,
        amount: Amount,
    },
    /// Allowance set to `amount`
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
}

impl TokenEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TokenEvent::Transfer { .. } => TRANSFER_EVENT_NAME,
            TokenEvent::Approval { .. } => APPROVAL_EVENT_NAME,
        }
    }

    pub fn fields(&self) -> Vec<String> {
        match self {
            TokenEvent::Transfer { from, to, amount } => vec![
                from.as_ref().map(|a| a.to_string()).unwrap_or_default(),
                to.to_string(),
                amount.value().to_string(),
            ],
            TokenEvent::Approval {
                owner,
                spender,
                amount,
            } => vec![
                owner.to_string(),
                spender.to_string(),
                amount.value().to_string(),
            ],
        }
    }

    /// Render into a sink
    pub fn emit<E: EventSink + ?Sized>(&self, sink: &mut E) {
        sink.emit(self.name(), &self.fields());
    }
}
