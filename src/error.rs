//! Error taxonomy shared by the game core, storage and request layers.

use thiserror::Error;

use crate::storage::StoreError;

/// Errors returned by game operations.
///
/// Every variant maps to a stable, caller-visible message. None of them are
/// retried internally.
#[derive(Debug, Error)]
pub enum GameError {
    /// No such player, battle or quest.
    #[error("{0}")]
    NotFound(String),

    /// The operation is valid but the player's state does not allow it.
    #[error("{0}")]
    PreconditionFailed(String),

    #[error("Not enough gold: costs {cost}, you have {gold}")]
    InsufficientFunds { cost: u64, gold: u64 },

    /// Malformed request input.
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl GameError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionFailed(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type GameResult<T> = Result<T, GameError>;
