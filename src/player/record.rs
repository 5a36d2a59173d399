use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::battle::BattleLog;
use crate::core::constants::*;
use crate::quests::{self, QuestInstance};

/// Core player stats. Health stays within `[0, max_health]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u32,
    pub stamina: u32,
    pub agility: u32,
    pub health: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            strength: STARTING_STRENGTH,
            stamina: STARTING_STAMINA,
            agility: STARTING_AGILITY,
            health: BASE_MAX_HEALTH,
        }
    }
}

/// Cups of water logged for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterEntry {
    pub date: NaiveDate,
    pub cups: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub name: String,
    pub reps: u32,
    pub weight: f64,
    #[serde(default = "default_sets")]
    pub sets: u32,
    pub xp: u64,
    pub timestamp: DateTime<Utc>,
}

fn default_sets() -> u32 {
    1
}

/// Salted password digest. Never leaves the storage layer in a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub salt: String,
    pub hash: String,
}

/// The persisted aggregate of one player's game state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub username: String,
    pub credential: Credential,
    /// Bumped by the store on every successful save.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub stats: Stats,
    pub level: u32,
    pub xp: u64,
    pub gold: u64,
    #[serde(default)]
    pub water_intake: Vec<WaterEntry>,
    #[serde(default)]
    pub workouts: Vec<WorkoutEntry>,
    #[serde(default)]
    pub active_quests: Vec<QuestInstance>,
    #[serde(default)]
    pub completed_quests: Vec<QuestInstance>,
    #[serde(default)]
    pub battles: BattleLog,
    pub created_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Creates a level 1 player with starting stats and the catalog quests.
    pub fn new(username: String, credential: Credential, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            username,
            credential,
            version: 0,
            stats: Stats::default(),
            level: 1,
            xp: 0,
            gold: 0,
            water_intake: Vec::new(),
            workouts: Vec::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            battles: BattleLog::default(),
            created_at: now,
        };
        quests::seed_if_empty(&mut record);
        record
    }

    /// Health ceiling: 100 at level 1, +20 per level gained.
    pub fn max_health(&self) -> u32 {
        MAX_HEALTH_PER_LEVEL
            .saturating_mul(self.level.saturating_sub(1))
            .saturating_add(BASE_MAX_HEALTH)
    }

    /// Cups logged on `date`, 0 when nothing was logged.
    pub fn water_on(&self, date: NaiveDate) -> u32 {
        self.water_intake
            .iter()
            .find(|entry| entry.date == date)
            .map(|entry| entry.cups)
            .unwrap_or(0)
    }

    /// Total reps of every workout whose name contains `needle`
    /// (case-insensitive), across the whole history.
    pub fn total_reps_matching(&self, needle: &str) -> u64 {
        let needle = needle.to_lowercase();
        self.workouts
            .iter()
            .filter(|w| w.name.to_lowercase().contains(&needle))
            .map(|w| w.reps as u64)
            .sum()
    }
}
