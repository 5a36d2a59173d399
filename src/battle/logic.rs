use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::types::{BattleInstance, BattleState, BattleView};
use crate::catalog::{random_enemy, Reward};
use crate::core::constants::*;
use crate::core::progression::{apply_xp, Growth, LevelUpResult};
use crate::economy;
use crate::error::{GameError, GameResult};
use crate::player::{PlayerRecord, WorkoutReport};

/// Damage a reported workout deals: `floor(reps * weight / 10) + strength`.
/// A missing or zero weight counts as 1.
pub fn attack_damage(reps: u32, weight: Option<f64>, strength: u32) -> u32 {
    let weight = match weight {
        Some(w) if w > 0.0 => w,
        _ => 1.0,
    };
    let volume = (reps as f64 * weight / ATTACK_DAMAGE_DIVISOR).floor();
    (volume.min(u32::MAX as f64) as u32).saturating_add(strength)
}

/// Begins a new battle against a random catalog enemy.
pub fn start_battle(
    player: &mut PlayerRecord,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> GameResult<BattleInstance> {
    if player.stats.health <= MIN_HEALTH_TO_BATTLE {
        return Err(GameError::precondition(
            "Health too low to battle. Recover health first!",
        ));
    }
    if player.battles.active().is_some() {
        return Err(GameError::precondition(
            "A battle is already in progress. Finish or flee it first.",
        ));
    }

    let enemy = random_enemy(rng);
    let battle = BattleInstance::new(enemy, player.stats.health, now);
    player.battles.begin(battle.clone());

    info!(player = %player.username, enemy = enemy.name, hp = enemy.hp, "battle_started");
    Ok(battle)
}

/// Result of a single attack round.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackOutcome {
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub battle: BattleView,
    pub result: BattleState,
    /// Granted only on the round that wins the battle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<Reward>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_up: Option<LevelUpResult>,
}

/// Resolves one round: the player's workout hits the enemy, the enemy hits
/// back, then victory is checked before defeat.
pub fn attack(player: &mut PlayerRecord, workout: &WorkoutReport) -> GameResult<AttackOutcome> {
    if let Some(weight) = workout.weight {
        if !weight.is_finite() || weight < 0.0 {
            return Err(GameError::validation("weight must be a non-negative number"));
        }
    }

    let damage_dealt = attack_damage(workout.reps, workout.weight, player.stats.strength);
    let battle = player
        .battles
        .active_mut()
        .ok_or_else(|| GameError::not_found("No active battle"))?;

    battle.enemy_hp = battle.enemy_hp.saturating_sub(damage_dealt);

    let damage_taken = battle.enemy_damage;
    player.stats.health = player.stats.health.saturating_sub(damage_taken);
    battle.user_hp = player.stats.health;

    if battle.enemy_hp == 0 {
        battle.state = BattleState::Victorious;
    } else if battle.user_hp == 0 {
        battle.state = BattleState::Defeated;
    }

    let result = battle.state;
    let reward = battle.enemy_reward;
    let enemy_name = battle.enemy_name.clone();
    let view = battle.view();

    debug!(
        player = %player.username,
        enemy = %enemy_name,
        damage_dealt,
        damage_taken,
        enemy_hp = view.enemy_hp,
        user_hp = view.user_hp,
        "battle_round"
    );

    let (reward, level_up) = if result == BattleState::Victorious {
        economy::credit(player, reward.gold);
        let level = apply_xp(player, reward.xp, Growth::Battle);
        info!(
            player = %player.username,
            enemy = %enemy_name,
            xp = reward.xp,
            gold = reward.gold,
            "battle_won"
        );
        (Some(reward), Some(level))
    } else {
        if result == BattleState::Defeated {
            info!(player = %player.username, enemy = %enemy_name, "battle_lost");
        }
        (None, None)
    };

    player.battles.archive_finished();

    Ok(AttackOutcome {
        damage_dealt,
        damage_taken,
        battle: view,
        result,
        reward,
        level_up,
    })
}

/// Result of fleeing a battle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleeOutcome {
    pub health_lost: u32,
    pub new_health: u32,
    pub battle: BattleView,
}

/// Abandons the most recent battle at a fixed health cost.
pub fn flee(player: &mut PlayerRecord) -> GameResult<FleeOutcome> {
    let latest = player
        .battles
        .most_recent()
        .ok_or_else(|| GameError::not_found("No battle to flee from"))?;
    if latest.state.is_terminal() {
        return Err(GameError::precondition("That battle is already over"));
    }

    let health = player.stats.health.saturating_sub(FLEE_HEALTH_COST);
    player.stats.health = health;

    let battle = player
        .battles
        .active_mut()
        .ok_or_else(|| GameError::not_found("No battle to flee from"))?;
    battle.state = BattleState::Fled;
    battle.user_hp = health;
    let view = battle.view();

    player.battles.archive_finished();
    info!(player = %player.username, enemy = %view.enemy_name, health, "battle_fled");

    Ok(FleeOutcome {
        health_lost: FLEE_HEALTH_COST,
        new_health: health,
        battle: view,
    })
}
