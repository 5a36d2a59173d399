//! Player record persistence.
//!
//! Stores use optimistic versioning: a save succeeds only if the record's
//! `version` matches what is stored, and the stored version is then bumped.
//! A stale writer gets [`StoreError::Conflict`] instead of silently
//! overwriting a newer record.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::io;
use thiserror::Error;

use crate::player::PlayerRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("player '{0}' not found")]
    NotFound(String),

    #[error("player '{0}' already exists")]
    AlreadyExists(String),

    #[error("version conflict for '{username}': expected {expected}, found {found}")]
    Conflict {
        username: String,
        expected: u64,
        found: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Document store for player records keyed by username.
pub trait PlayerStore: Send + Sync {
    fn load(&self, username: &str) -> Result<PlayerRecord, StoreError>;

    /// Inserts a new record. Fails with `AlreadyExists` if the key is taken.
    fn create(&self, record: &PlayerRecord) -> Result<(), StoreError>;

    /// Replaces the stored record if versions match. Returns the new version.
    fn save(&self, record: &PlayerRecord) -> Result<u64, StoreError>;
}

/// Storage keys are case-insensitive.
pub(crate) fn normalize_key(username: &str) -> String {
    username.trim().to_lowercase()
}
