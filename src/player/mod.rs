//! Player record and activity logging.

pub mod activity;
pub mod record;

pub use activity::*;
pub use record::*;

/// A fresh level 1 player for unit tests.
#[cfg(test)]
pub(crate) fn test_player() -> PlayerRecord {
    PlayerRecord::new("tester".to_string(), Credential::default(), chrono::Utc::now())
}
