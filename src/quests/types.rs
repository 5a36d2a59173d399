use serde::{Deserialize, Serialize};

use crate::catalog::{QuestDef, QuestKind, Reward};

/// A per-player copy of a catalog quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestInstance {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: QuestKind,
    pub requirement: u32,
    pub reward: Reward,
    #[serde(default)]
    pub completed: bool,
}

impl From<&QuestDef> for QuestInstance {
    fn from(def: &QuestDef) -> Self {
        Self {
            title: def.title.to_string(),
            description: def.description.to_string(),
            kind: def.kind,
            requirement: def.requirement,
            reward: def.reward,
            completed: false,
        }
    }
}

/// A quest together with its derived progress.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestProgress {
    #[serde(flatten)]
    pub quest: QuestInstance,
    /// Amount achieved toward `requirement`.
    #[serde(rename = "current")]
    pub completed_amount: u64,
    /// `min(completed_amount / requirement, 1)`.
    pub progress: f64,
}

impl QuestProgress {
    pub fn is_done(&self) -> bool {
        self.progress >= 1.0
    }
}
