//! Game rules that do not depend on storage or transport.

pub mod constants;
pub mod progression;

pub use progression::{level_progress, LevelProgress, LevelUpResult};
