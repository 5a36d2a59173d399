//! Gold balance: reward credits and shop purchases.

use serde::Serialize;
use tracing::info;

use crate::core::constants::HEALTH_POTION_COST;
use crate::error::{GameError, GameResult};
use crate::player::PlayerRecord;

/// Receipt for a health purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPurchase {
    pub cost: u64,
    pub new_health: u32,
    pub new_gold: u64,
}

/// Adds gold to the player's balance.
pub fn credit(player: &mut PlayerRecord, gold: u64) {
    player.gold = player.gold.saturating_add(gold);
}

/// Buys `amount` health at 10 gold each.
///
/// The purchase may not push health above the player's maximum.
pub fn buy_health(player: &mut PlayerRecord, amount: u32) -> GameResult<HealthPurchase> {
    if amount == 0 {
        return Err(GameError::validation("amount must be at least 1"));
    }

    let cost = amount as u64 * HEALTH_POTION_COST;
    if player.gold < cost {
        return Err(GameError::InsufficientFunds {
            cost,
            gold: player.gold,
        });
    }

    let max = player.max_health();
    let room = max.saturating_sub(player.stats.health);
    if amount > room {
        return Err(GameError::precondition(format!(
            "Health would exceed maximum of {} (room for {})",
            max, room
        )));
    }

    player.gold -= cost;
    player.stats.health += amount;

    info!(player = %player.username, amount, cost, gold = player.gold, "health_purchased");

    Ok(HealthPurchase {
        cost,
        new_health: player.stats.health,
        new_gold: player.gold,
    })
}
