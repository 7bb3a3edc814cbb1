//! Host interfaces consumed by contracts
//!
//! These are the narrow seams between a contract and its execution
//! environment:
//! - [`KeyValueStore`]: string-keyed persistent storage
//! - [`CallerIdentity`]: who invoked the current operation
//! - [`EventSink`]: append-only event log

pub mod context;
pub mod events;
pub mod storage;

pub use context::{CallContext, CallerIdentity};
pub use events::{format_event, EventLog, EventSink};
pub use storage::{KeyValueStore, MemoryStore, WriteBuffer};
