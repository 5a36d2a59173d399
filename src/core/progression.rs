//! Experience awards, level derivation and level-up stat growth.
//!
//! Level is always `floor(xp / 100) + 1`. Growth is applied once per
//! level-up event: an award that jumps several levels still grows stats a
//! single time.

use serde::Serialize;
use tracing::info;

use super::constants::*;
use crate::player::PlayerRecord;

/// Stat a training session develops when it triggers a level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatFocus {
    Strength,
    Stamina,
    Agility,
}

impl StatFocus {
    /// Classifies a workout by name (case-insensitive).
    ///
    /// "squat"/"push" build strength, "plank"/"crunch" build stamina,
    /// anything else builds agility.
    pub fn from_workout_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("squat") || name.contains("push") {
            StatFocus::Strength
        } else if name.contains("plank") || name.contains("crunch") {
            StatFocus::Stamina
        } else {
            StatFocus::Agility
        }
    }
}

/// Which growth table a level-up uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// +2 to the focused stat, then health restored to the new maximum.
    Training(StatFocus),
    /// +2 strength, +2 stamina, +1 agility, +20 health.
    Battle,
}

/// Outcome of [`apply_xp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpResult {
    pub leveled_up: bool,
    pub new_level: u32,
}

/// Level reached with `xp` total experience.
pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// Experience earned by a workout.
///
/// `floor(reps * weight * sets / 10) + 10`, plus +5 for "squat", +8 for
/// "push" and +3 for "plank" in the name. Bonuses stack.
pub fn award_workout_xp(name: &str, reps: u32, weight: f64, sets: u32) -> u64 {
    let volume = reps as f64 * weight * sets as f64;
    let base = (volume / WORKOUT_VOLUME_DIVISOR).floor().max(0.0) as u64;

    let name = name.to_lowercase();
    let mut bonus = 0;
    if name.contains("squat") {
        bonus += SQUAT_XP_BONUS;
    }
    if name.contains("push") {
        bonus += PUSH_XP_BONUS;
    }
    if name.contains("plank") {
        bonus += PLANK_XP_BONUS;
    }

    base.saturating_add(WORKOUT_BASE_XP).saturating_add(bonus)
}

/// Adds experience and applies at most one growth step if a level boundary
/// was crossed.
pub fn apply_xp(player: &mut PlayerRecord, amount: u64, growth: Growth) -> LevelUpResult {
    player.xp = player.xp.saturating_add(amount);
    let new_level = level_for_xp(player.xp);

    if new_level <= player.level {
        return LevelUpResult {
            leveled_up: false,
            new_level: player.level,
        };
    }

    let previous = player.level;
    player.level = new_level;
    apply_growth(player, growth);

    info!(
        player = %player.username,
        from = previous,
        to = new_level,
        health = player.stats.health,
        "level_up"
    );

    LevelUpResult {
        leveled_up: true,
        new_level,
    }
}

fn apply_growth(player: &mut PlayerRecord, growth: Growth) {
    let max = player.max_health();
    let stats = &mut player.stats;
    match growth {
        Growth::Training(focus) => {
            let stat = match focus {
                StatFocus::Strength => &mut stats.strength,
                StatFocus::Stamina => &mut stats.stamina,
                StatFocus::Agility => &mut stats.agility,
            };
            *stat = stat.saturating_add(WORKOUT_STAT_GROWTH);
            stats.health = max;
        }
        Growth::Battle => {
            stats.strength = stats.strength.saturating_add(BATTLE_STRENGTH_GROWTH);
            stats.stamina = stats.stamina.saturating_add(BATTLE_STAMINA_GROWTH);
            stats.agility = stats.agility.saturating_add(BATTLE_AGILITY_GROWTH);
            stats.health = stats.health.saturating_add(BATTLE_HEALTH_GROWTH).min(max);
        }
    }
}

/// Where the player stands within the current level.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub xp: u64,
    pub xp_into_level: u64,
    pub xp_for_next_level: u64,
    pub progress: f64,
}

pub fn level_progress(player: &PlayerRecord) -> LevelProgress {
    let xp_into_level = player.xp % XP_PER_LEVEL;
    LevelProgress {
        level: player.level,
        xp: player.xp,
        xp_into_level,
        xp_for_next_level: XP_PER_LEVEL,
        progress: xp_into_level as f64 / XP_PER_LEVEL as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::test_player;

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(250), 3);
    }

    #[test]
    fn test_level_monotonic() {
        let mut last = level_for_xp(0);
        for xp in (0..5_000).step_by(7) {
            let level = level_for_xp(xp);
            assert!(level >= last);
            assert_eq!(level as u64, xp / 100 + 1);
            last = level;
        }
    }

    #[test]
    fn test_squat_xp() {
        assert_eq!(award_workout_xp("squat", 10, 5.0, 1), 20);
    }

    #[test]
    fn test_xp_bonus_case_insensitive() {
        assert_eq!(award_workout_xp("PUSH-UPS", 10, 1.0, 1), 1 + 10 + 8);
        assert_eq!(award_workout_xp("Plank", 1, 1.0, 1), 10 + 3);
    }

    #[test]
    fn test_xp_bonuses_stack() {
        // "squat push plank" matches all three
        assert_eq!(award_workout_xp("squat push plank", 0, 0.0, 1), 10 + 5 + 8 + 3);
    }

    #[test]
    fn test_xp_sets_multiply_volume() {
        assert_eq!(award_workout_xp("run", 10, 5.0, 3), 15 + 10);
        assert_eq!(award_workout_xp("run", 3, 3.0, 1), 10); // floor(0.9)
    }

    #[test]
    fn test_stat_focus() {
        assert_eq!(StatFocus::from_workout_name("Back Squat"), StatFocus::Strength);
        assert_eq!(StatFocus::from_workout_name("pushups"), StatFocus::Strength);
        assert_eq!(StatFocus::from_workout_name("side plank"), StatFocus::Stamina);
        assert_eq!(StatFocus::from_workout_name("Crunches"), StatFocus::Stamina);
        assert_eq!(StatFocus::from_workout_name("jog"), StatFocus::Agility);
    }

    #[test]
    fn test_apply_xp_without_level_up() {
        let mut player = test_player();
        let result = apply_xp(&mut player, 40, Growth::Battle);
        assert!(!result.leveled_up);
        assert_eq!(result.new_level, 1);
        assert_eq!(player.xp, 40);
        assert_eq!(player.stats.strength, STARTING_STRENGTH);
    }

    #[test]
    fn test_training_level_up_grows_focus_and_restores_health() {
        let mut player = test_player();
        player.stats.health = 30;
        let result = apply_xp(&mut player, 100, Growth::Training(StatFocus::Stamina));
        assert!(result.leveled_up);
        assert_eq!(player.level, 2);
        assert_eq!(player.stats.stamina, STARTING_STAMINA + 2);
        assert_eq!(player.stats.strength, STARTING_STRENGTH);
        assert_eq!(player.stats.health, 120);
    }

    #[test]
    fn test_multi_level_jump_grows_once() {
        let mut player = test_player();
        let result = apply_xp(&mut player, 350, Growth::Training(StatFocus::Strength));
        assert!(result.leveled_up);
        assert_eq!(result.new_level, 4);
        assert_eq!(player.stats.strength, STARTING_STRENGTH + 2);
    }

    #[test]
    fn test_no_retroactive_growth() {
        let mut player = test_player();
        apply_xp(&mut player, 100, Growth::Battle);
        let strength = player.stats.strength;
        apply_xp(&mut player, 50, Growth::Battle);
        assert_eq!(player.level, 2);
        assert_eq!(player.stats.strength, strength);
    }

    #[test]
    fn test_battle_growth_table() {
        let mut player = test_player();
        player.stats.health = 50;
        apply_xp(&mut player, 120, Growth::Battle);
        assert_eq!(player.stats.strength, STARTING_STRENGTH + 2);
        assert_eq!(player.stats.stamina, STARTING_STAMINA + 2);
        assert_eq!(player.stats.agility, STARTING_AGILITY + 1);
        assert_eq!(player.stats.health, 70);
    }

    #[test]
    fn test_battle_growth_health_capped() {
        let mut player = test_player();
        apply_xp(&mut player, 100, Growth::Battle);
        assert_eq!(player.stats.health, player.max_health());
        assert_eq!(player.max_health(), 120);
    }

    #[test]
    fn test_enormous_workout_xp_saturates() {
        assert_eq!(award_workout_xp("run", 1, 1e300, 1), u64::MAX);
        assert_eq!(award_workout_xp("squat push", u32::MAX, f64::MAX, u32::MAX), u64::MAX);
    }

    #[test]
    fn test_max_health_saturates_at_extreme_levels() {
        let mut player = test_player();
        player.level = u32::MAX;
        assert_eq!(player.max_health(), u32::MAX);
    }

    #[test]
    fn test_level_up_to_extreme_level_restores_saturated_health() {
        let mut player = test_player();
        let xp = award_workout_xp("run", 30, 1e10, 1);
        let result = apply_xp(&mut player, xp, Growth::Training(StatFocus::Agility));
        assert!(result.leveled_up);
        assert_eq!(player.stats.health, u32::MAX);
        assert_eq!(player.stats.agility, STARTING_AGILITY + 2);
    }

    #[test]
    fn test_battle_growth_at_saturated_health() {
        let mut player = test_player();
        player.stats.health = u32::MAX - 5;
        apply_xp(&mut player, u64::MAX, Growth::Battle);
        assert_eq!(player.level, u32::MAX);
        assert_eq!(player.stats.health, u32::MAX);
    }

    #[test]
    fn test_level_progress() {
        let mut player = test_player();
        player.xp = 245;
        player.level = level_for_xp(245);
        let progress = level_progress(&player);
        assert_eq!(progress.level, 3);
        assert_eq!(progress.xp_into_level, 45);
        assert_eq!(progress.xp_for_next_level, 100);
        assert!((progress.progress - 0.45).abs() < f64::EPSILON);
    }
}
