use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{EnemyDef, Reward};
use crate::core::constants::{DEFAULT_ENEMY_DAMAGE, MAX_BATTLE_HISTORY};

/// Lifecycle of a battle. Every state but `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleState {
    Active,
    Victorious,
    Defeated,
    Fled,
}

impl BattleState {
    pub fn is_terminal(self) -> bool {
        self != BattleState::Active
    }

    pub fn label(self) -> &'static str {
        match self {
            BattleState::Active => "active",
            BattleState::Victorious => "victory",
            BattleState::Defeated => "defeat",
            BattleState::Fled => "fled",
        }
    }
}

fn default_enemy_damage() -> u32 {
    DEFAULT_ENEMY_DAMAGE
}

/// One combat encounter. Immutable once terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleInstance {
    pub enemy_name: String,
    pub enemy_description: String,
    #[serde(rename = "enemyHP")]
    pub enemy_hp: u32,
    #[serde(rename = "enemyMaxHP")]
    pub enemy_max_hp: u32,
    #[serde(default = "default_enemy_damage")]
    pub enemy_damage: u32,
    #[serde(default)]
    pub enemy_reward: Reward,
    #[serde(rename = "userHP")]
    pub user_hp: u32,
    #[serde(rename = "userMaxHP")]
    pub user_max_hp: u32,
    pub state: BattleState,
    pub created_at: DateTime<Utc>,
}

impl BattleInstance {
    pub fn new(enemy: &EnemyDef, player_health: u32, now: DateTime<Utc>) -> Self {
        Self {
            enemy_name: enemy.name.to_string(),
            enemy_description: enemy.description.to_string(),
            enemy_hp: enemy.hp,
            enemy_max_hp: enemy.hp,
            enemy_damage: enemy.damage,
            enemy_reward: enemy.reward_or_default(),
            user_hp: player_health,
            user_max_hp: player_health,
            state: BattleState::Active,
            created_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == BattleState::Active
    }

    pub fn view(&self) -> BattleView {
        BattleView {
            enemy_name: self.enemy_name.clone(),
            enemy_description: self.enemy_description.clone(),
            enemy_hp: self.enemy_hp,
            enemy_max_hp: self.enemy_max_hp,
            enemy_damage: self.enemy_damage,
            user_hp: self.user_hp,
            user_max_hp: self.user_max_hp,
            state: self.state,
            completed: self.state.is_terminal(),
            victory: self.state == BattleState::Victorious,
            fled: self.state == BattleState::Fled,
            created_at: self.created_at,
        }
    }
}

/// Wire shape of a battle, with the terminal flags spelled out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleView {
    #[serde(rename = "enemyName")]
    pub enemy_name: String,
    #[serde(rename = "enemyDescription")]
    pub enemy_description: String,
    #[serde(rename = "enemyHP")]
    pub enemy_hp: u32,
    #[serde(rename = "enemyMaxHP")]
    pub enemy_max_hp: u32,
    #[serde(rename = "enemyDamage")]
    pub enemy_damage: u32,
    #[serde(rename = "userHP")]
    pub user_hp: u32,
    #[serde(rename = "userMaxHP")]
    pub user_max_hp: u32,
    pub state: BattleState,
    pub completed: bool,
    pub victory: bool,
    pub fled: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A player's battles: an explicit current slot plus bounded history.
///
/// `current` only ever holds an `Active` battle; a battle is moved into
/// `history` as soon as it reaches a terminal state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleLog {
    #[serde(default)]
    current: Option<BattleInstance>,
    #[serde(default)]
    history: Vec<BattleInstance>,
}

impl BattleLog {
    pub fn active(&self) -> Option<&BattleInstance> {
        self.current.as_ref().filter(|b| b.is_active())
    }

    pub fn active_mut(&mut self) -> Option<&mut BattleInstance> {
        self.current.as_mut().filter(|b| b.is_active())
    }

    /// The most recently created battle, terminal or not.
    pub fn most_recent(&self) -> Option<&BattleInstance> {
        self.current.as_ref().or_else(|| self.history.last())
    }

    pub fn history(&self) -> &[BattleInstance] {
        &self.history
    }

    /// All battles, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &BattleInstance> {
        self.history.iter().chain(self.current.iter())
    }

    /// Installs a new active battle. The caller guarantees none is active.
    pub(crate) fn begin(&mut self, battle: BattleInstance) {
        self.archive_finished();
        self.current = Some(battle);
    }

    /// Moves a terminal current battle into history.
    pub(crate) fn archive_finished(&mut self) {
        if self.current.as_ref().is_some_and(|b| !b.is_active()) {
            if let Some(done) = self.current.take() {
                self.history.push(done);
            }
        }
        if self.history.len() > MAX_BATTLE_HISTORY {
            let excess = self.history.len() - MAX_BATTLE_HISTORY;
            self.history.drain(..excess);
        }
    }
}
