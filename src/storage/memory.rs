use std::collections::HashMap;
use std::sync::RwLock;

use super::{normalize_key, PlayerStore, StoreError};
use crate::player::PlayerRecord;

/// Process-local store, used for tests and `storage = "memory"`.
#[derive(Default)]
pub struct MemoryStore {
    players: RwLock<HashMap<String, PlayerRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlayerStore for MemoryStore {
    fn load(&self, username: &str) -> Result<PlayerRecord, StoreError> {
        let players = self.players.read().unwrap_or_else(|e| e.into_inner());
        players
            .get(&normalize_key(username))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    fn create(&self, record: &PlayerRecord) -> Result<(), StoreError> {
        let mut players = self.players.write().unwrap_or_else(|e| e.into_inner());
        let key = normalize_key(&record.username);
        if players.contains_key(&key) {
            return Err(StoreError::AlreadyExists(record.username.clone()));
        }
        players.insert(key, record.clone());
        Ok(())
    }

    fn save(&self, record: &PlayerRecord) -> Result<u64, StoreError> {
        let mut players = self.players.write().unwrap_or_else(|e| e.into_inner());
        let stored = players
            .get_mut(&normalize_key(&record.username))
            .ok_or_else(|| StoreError::NotFound(record.username.clone()))?;

        if stored.version != record.version {
            return Err(StoreError::Conflict {
                username: record.username.clone(),
                expected: record.version,
                found: stored.version,
            });
        }

        let mut next = record.clone();
        next.version += 1;
        *stored = next;
        Ok(stored.version)
    }
}
