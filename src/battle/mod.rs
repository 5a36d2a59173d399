//! Turn-based battles where reported workouts deal the damage.
//!
//! A player has at most one active battle. `start_battle` refuses to open a
//! second one; `attack` and `flee` drive the active battle to a terminal state.

#![allow(unused_imports)]

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
