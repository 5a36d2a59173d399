//! Quest and enemy definitions.

use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_ENEMY_GOLD_REWARD, DEFAULT_ENEMY_XP_REWARD};

/// XP and gold granted on completion of a quest or a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u64,
    pub gold: u64,
}

impl Default for Reward {
    fn default() -> Self {
        Self {
            xp: DEFAULT_ENEMY_XP_REWARD,
            gold: DEFAULT_ENEMY_GOLD_REWARD,
        }
    }
}

/// What a quest measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    /// Total squat reps across the whole workout history.
    Workout,
    /// Cups of water logged today.
    Hydration,
    /// No computable progress.
    Boss,
}

/// Template from which per-player quest instances are copied.
#[derive(Debug, Clone)]
pub struct QuestDef {
    pub title: &'static str,
    pub description: &'static str,
    pub kind: QuestKind,
    pub requirement: u32,
    pub reward: Reward,
}

/// An enemy that can be drawn when a battle starts.
#[derive(Debug, Clone)]
pub struct EnemyDef {
    pub name: &'static str,
    pub description: &'static str,
    pub hp: u32,
    pub damage: u32,
    /// Falls back to [`Reward::default`] when absent.
    pub reward: Option<Reward>,
}

impl EnemyDef {
    pub fn reward_or_default(&self) -> Reward {
        self.reward.unwrap_or_default()
    }
}

pub static QUESTS: [QuestDef; 3] = [
    QuestDef {
        title: "Squat Master",
        description: "Complete 50 squats",
        kind: QuestKind::Workout,
        requirement: 50,
        reward: Reward { xp: 100, gold: 50 },
    },
    QuestDef {
        title: "Hydration Hero",
        description: "Drink 8 cups of water today",
        kind: QuestKind::Hydration,
        requirement: 8,
        reward: Reward { xp: 50, gold: 20 },
    },
    QuestDef {
        title: "Boss Slayer",
        description: "Defeat the weekly boss",
        kind: QuestKind::Boss,
        requirement: 1,
        reward: Reward { xp: 200, gold: 100 },
    },
];

pub static ENEMIES: [EnemyDef; 4] = [
    EnemyDef {
        name: "Lazy Goblin",
        description: "A sluggish goblin that would rather nap than fight",
        hp: 50,
        damage: 5,
        reward: Some(Reward { xp: 50, gold: 25 }),
    },
    EnemyDef {
        name: "Couch Potato Troll",
        description: "It has not left the sofa in years and it is angry about it",
        hp: 80,
        damage: 8,
        reward: Some(Reward { xp: 75, gold: 40 }),
    },
    EnemyDef {
        name: "Junk Food Golem",
        description: "Built entirely from fries and regret",
        hp: 100,
        damage: 10,
        reward: Some(Reward { xp: 100, gold: 50 }),
    },
    EnemyDef {
        name: "Procrastination Dragon",
        description: "Always promises to fight you tomorrow",
        hp: 150,
        damage: 15,
        reward: Some(Reward { xp: 150, gold: 80 }),
    },
];
