//! Quest seeding, progress tracking and completion.
//!
//! Progress is a derived view over the activity history; only the terminal
//! `completed` flag is stored.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
