//! Static quest and enemy catalog.
//!
//! The catalog is compiled in and never mutated; players receive copies.

mod data;

pub use data::*;

use rand::Rng;

/// Returns every quest definition.
pub fn all_quests() -> &'static [QuestDef] {
    &QUESTS
}

/// Returns every enemy definition.
pub fn all_enemies() -> &'static [EnemyDef] {
    &ENEMIES
}

/// Picks an enemy uniformly at random.
pub fn random_enemy(rng: &mut impl Rng) -> &'static EnemyDef {
    &ENEMIES[rng.gen_range(0..ENEMIES.len())]
}
