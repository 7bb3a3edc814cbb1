//! Storage module for host state persistence

pub mod persistence;

pub use persistence::{
    load_from_file, save_to_file, HostSnapshot, Storage, StorageConfig, StorageError,
    StorageStats, SNAPSHOT_VERSION,
};
