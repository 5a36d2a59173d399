use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::types::{QuestInstance, QuestProgress};
use crate::catalog::{all_quests, QuestKind, Reward};
use crate::core::progression::{apply_xp, Growth, LevelUpResult, StatFocus};
use crate::economy;
use crate::error::{GameError, GameResult};
use crate::player::PlayerRecord;

/// Fills an empty active quest list with fresh catalog copies.
/// Returns true when seeding happened.
pub fn seed_if_empty(player: &mut PlayerRecord) -> bool {
    if !player.active_quests.is_empty() {
        return false;
    }
    player
        .active_quests
        .extend(all_quests().iter().map(QuestInstance::from));
    true
}

/// Amount achieved toward a quest of the given kind.
fn achieved(player: &PlayerRecord, kind: QuestKind, today: NaiveDate) -> u64 {
    match kind {
        QuestKind::Workout => player.total_reps_matching("squat"),
        QuestKind::Hydration => player.water_on(today) as u64,
        QuestKind::Boss => 0,
    }
}

fn progress_of(player: &PlayerRecord, quest: &QuestInstance, today: NaiveDate) -> QuestProgress {
    let completed_amount = achieved(player, quest.kind, today);
    let progress = (completed_amount as f64 / quest.requirement.max(1) as f64).min(1.0);
    QuestProgress {
        quest: quest.clone(),
        completed_amount,
        progress,
    }
}

/// Progress of every active quest.
pub fn compute_progress(player: &PlayerRecord, today: NaiveDate) -> Vec<QuestProgress> {
    player
        .active_quests
        .iter()
        .map(|quest| progress_of(player, quest, today))
        .collect()
}

/// Result of claiming a finished quest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestClaim {
    pub title: String,
    pub reward: Reward,
    #[serde(flatten)]
    pub level: LevelUpResult,
}

/// Marks a finished quest completed, moves it to the completed list and
/// grants its reward.
pub fn complete_quest(
    player: &mut PlayerRecord,
    title: &str,
    today: NaiveDate,
) -> GameResult<QuestClaim> {
    let index = player
        .active_quests
        .iter()
        .position(|q| q.title.eq_ignore_ascii_case(title.trim()))
        .ok_or_else(|| GameError::not_found(format!("No active quest named '{}'", title)))?;

    let quest = &player.active_quests[index];
    if quest.completed {
        return Err(GameError::precondition("Quest already completed"));
    }
    if !progress_of(player, quest, today).is_done() {
        return Err(GameError::precondition("Quest requirement not met yet"));
    }

    let mut quest = player.active_quests.remove(index);
    quest.completed = true;
    let reward = quest.reward;
    let title = quest.title.clone();
    player.completed_quests.push(quest);

    economy::credit(player, reward.gold);
    let level = apply_xp(player, reward.xp, Growth::Training(StatFocus::Agility));

    info!(
        player = %player.username,
        quest = %title,
        xp = reward.xp,
        gold = reward.gold,
        "quest_completed"
    );

    Ok(QuestClaim {
        title,
        reward,
        level,
    })
}

/// Drops all active quests and reseeds them from the catalog.
pub fn reset_quests(player: &mut PlayerRecord) {
    player.active_quests.clear();
    seed_if_empty(player);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{log_water, log_workout, test_player, WorkoutReport};
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn squats(player: &mut PlayerRecord, reps: u32) {
        let report = WorkoutReport {
            name: "Squats".to_string(),
            reps,
            weight: Some(0.0),
            sets: None,
        };
        log_workout(player, &report, Utc::now()).unwrap();
    }

    #[test]
    fn test_new_player_is_seeded() {
        let player = test_player();
        assert_eq!(player.active_quests.len(), all_quests().len());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let mut player = test_player();
        assert!(!seed_if_empty(&mut player));
        assert!(!seed_if_empty(&mut player));
        assert_eq!(player.active_quests.len(), 3);
    }

    #[test]
    fn test_seed_creates_independent_copies() {
        let mut player = test_player();
        player.active_quests[0].completed = true;
        let mut other = test_player();
        other.active_quests.clear();
        seed_if_empty(&mut other);
        assert!(!other.active_quests[0].completed);
    }

    #[test]
    fn test_workout_progress_counts_all_squats() {
        let mut player = test_player();
        squats(&mut player, 20);
        squats(&mut player, 10);
        let progress = compute_progress(&player, today());
        let workout = progress.iter().find(|p| p.quest.kind == QuestKind::Workout).unwrap();
        assert_eq!(workout.completed_amount, 30);
        assert!((workout.progress - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_progress_capped_at_one() {
        let mut player = test_player();
        squats(&mut player, 200);
        let progress = compute_progress(&player, today());
        let workout = progress.iter().find(|p| p.quest.kind == QuestKind::Workout).unwrap();
        assert_eq!(workout.progress, 1.0);
    }

    #[test]
    fn test_hydration_counts_today_only() {
        let mut player = test_player();
        log_water(&mut player, 5, today().pred_opt().unwrap()).unwrap();
        log_water(&mut player, 4, today()).unwrap();
        let progress = compute_progress(&player, today());
        let hydration = progress.iter().find(|p| p.quest.kind == QuestKind::Hydration).unwrap();
        assert_eq!(hydration.completed_amount, 4);
        assert!((hydration.progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_boss_has_no_progress() {
        let mut player = test_player();
        squats(&mut player, 100);
        let progress = compute_progress(&player, today());
        let boss = progress.iter().find(|p| p.quest.kind == QuestKind::Boss).unwrap();
        assert_eq!(boss.progress, 0.0);
    }

    #[test]
    fn test_complete_quest_grants_reward_once() {
        let mut player = test_player();
        log_water(&mut player, 8, today()).unwrap();

        let claim = complete_quest(&mut player, "hydration hero", today()).unwrap();
        assert_eq!(claim.reward, Reward { xp: 50, gold: 20 });
        assert_eq!(player.gold, 20);
        assert_eq!(player.xp, 50);
        assert_eq!(player.active_quests.len(), 2);
        assert_eq!(player.completed_quests.len(), 1);
        assert!(player.completed_quests[0].completed);

        let again = complete_quest(&mut player, "Hydration Hero", today());
        assert!(matches!(again, Err(GameError::NotFound(_))));
        assert_eq!(player.gold, 20);
    }

    #[test]
    fn test_complete_unfinished_quest_fails() {
        let mut player = test_player();
        let result = complete_quest(&mut player, "Squat Master", today());
        assert!(matches!(result, Err(GameError::PreconditionFailed(_))));
        assert_eq!(player.active_quests.len(), 3);
    }

    #[test]
    fn test_reset_quests() {
        let mut player = test_player();
        player.active_quests.truncate(1);
        reset_quests(&mut player);
        assert_eq!(player.active_quests.len(), 3);
    }
}
