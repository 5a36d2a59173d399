//! Integration test: training, quests and level progression
//!
//! Drives a player through workouts, water logging and quest claims via the
//! service layer and checks the stats that come out the other side.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use fitquest::auth::TokenSigner;
use fitquest::error::GameError;
use fitquest::player::{Activity, WorkoutReport};
use fitquest::service::GameService;
use fitquest::storage::MemoryStore;

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn service() -> GameService {
    GameService::new(Arc::new(MemoryStore::new()), TokenSigner::new("progression"))
        .with_seed(7)
        .with_clock(noon)
}

fn workout(name: &str, reps: u32, weight: f64) -> WorkoutReport {
    WorkoutReport {
        name: name.to_string(),
        reps,
        weight: Some(weight),
        sets: None,
    }
}

// =============================================================================
// Workouts
// =============================================================================

#[test]
fn test_heavy_workout_levels_up_focus_stat() {
    let svc = service();
    svc.register("alice", "password1").unwrap();

    // floor(100 * 10 / 10) + 10 base + 8 push bonus
    let logged = svc.log_workout("alice", &workout("Push-ups", 100, 10.0)).unwrap();
    assert_eq!(logged.xp_gained, 118);
    assert!(logged.level.leveled_up);
    assert_eq!(logged.level.new_level, 2);

    let profile = svc.profile("alice").unwrap();
    assert_eq!(profile.stats.strength, 7);
    assert_eq!(profile.stats.stamina, 5);
    assert_eq!(profile.stats.agility, 5);
    assert_eq!(profile.max_health, 120);
    assert_eq!(profile.stats.health, 120);

    let progress = svc.level_progress("alice").unwrap();
    assert_eq!(progress.level, 2);
    assert_eq!(progress.xp_into_level, 18);
    assert!((progress.progress - 0.18).abs() < 1e-9);
}

#[test]
fn test_small_workouts_accumulate_without_level_up() {
    let svc = service();
    svc.register("alice", "password1").unwrap();

    for _ in 0..9 {
        let logged = svc.log_workout("alice", &workout("Jumping jacks", 20, 0.0)).unwrap();
        assert!(!logged.level.leveled_up);
    }
    let profile = svc.profile("alice").unwrap();
    assert_eq!(profile.xp, 90);
    assert_eq!(profile.level, 1);
    assert_eq!(profile.workouts_logged, 9);

    let logged = svc.log_workout("alice", &workout("Jumping jacks", 20, 0.0)).unwrap();
    assert!(logged.level.leveled_up);
    assert_eq!(svc.profile("alice").unwrap().stats.agility, 7);
}

#[test]
fn test_enormous_weight_is_accepted_and_saturates() {
    let svc = service();
    svc.register("hero", "password1").unwrap();

    let logged = svc.log_workout("hero", &workout("run", 30, 1e10)).unwrap();
    assert!(logged.level.leveled_up);
    assert_eq!(logged.xp_gained, 30_000_000_010);

    let profile = svc.profile("hero").unwrap();
    assert_eq!(profile.level, 300_000_001);
    assert_eq!(profile.max_health, u32::MAX);
    assert_eq!(profile.stats.health, u32::MAX);

    let logged = svc.log_workout("hero", &workout("run", 1, 1e300)).unwrap();
    assert_eq!(logged.total_xp, u64::MAX);
}

#[test]
fn test_workout_without_weight_is_rejected() {
    let svc = service();
    svc.register("alice", "password1").unwrap();
    let report = WorkoutReport {
        name: "squat".to_string(),
        reps: 10,
        weight: None,
        sets: None,
    };
    assert!(matches!(
        svc.log_workout("alice", &report),
        Err(GameError::Validation(_))
    ));
    assert_eq!(svc.profile("alice").unwrap().workouts_logged, 0);
}

// =============================================================================
// Quests
// =============================================================================

#[test]
fn test_squat_quest_claim() {
    let svc = service();
    svc.register("bob", "password1").unwrap();

    svc.log_workout("bob", &workout("Squats", 30, 0.0)).unwrap();
    assert!(matches!(
        svc.complete_quest("bob", "Squat Master"),
        Err(GameError::PreconditionFailed(_))
    ));

    svc.log_workout("bob", &workout("Goblet squat", 20, 0.0)).unwrap();
    let progress = svc.quest_progress("bob").unwrap();
    let squat = progress
        .iter()
        .find(|q| q.quest.title == "Squat Master")
        .unwrap();
    assert_eq!(squat.completed_amount, 50);
    assert!((squat.progress - 1.0).abs() < f64::EPSILON);

    // 2 * 15 workout xp + 100 reward xp crosses into level 2
    let claim = svc.complete_quest("bob", "squat master").unwrap();
    assert_eq!(claim.reward.xp, 100);
    assert_eq!(claim.reward.gold, 50);
    assert!(claim.level.leveled_up);

    let profile = svc.profile("bob").unwrap();
    assert_eq!(profile.gold, 50);
    assert_eq!(profile.xp, 130);
    assert_eq!(profile.stats.agility, 7);
    assert_eq!(profile.quests_completed, 1);

    // Claimed quests leave the active list
    assert!(matches!(
        svc.complete_quest("bob", "Squat Master"),
        Err(GameError::NotFound(_))
    ));
    assert_eq!(svc.quests("bob").unwrap().len(), 2);
}

#[test]
fn test_hydration_quest_uses_todays_water() {
    let svc = service();
    svc.register("carol", "password1").unwrap();

    svc.log_water("carol", 5).unwrap();
    assert!(svc.complete_quest("carol", "Hydration Hero").is_err());

    let water = svc.log_water("carol", 3).unwrap();
    assert_eq!(water.cups, 8);
    assert_eq!(water.date, noon().date_naive());

    let claim = svc.complete_quest("carol", "Hydration Hero").unwrap();
    assert_eq!(claim.reward.gold, 20);
    assert!(!claim.level.leveled_up);
    assert_eq!(svc.profile("carol").unwrap().gold, 20);
}

#[test]
fn test_boss_quest_is_never_claimable() {
    let svc = service();
    svc.register("dave", "password1").unwrap();
    assert!(matches!(
        svc.complete_quest("dave", "Boss Slayer"),
        Err(GameError::PreconditionFailed(_))
    ));
}

#[test]
fn test_reset_restores_full_quest_list() {
    let svc = service();
    svc.register("erin", "password1").unwrap();
    svc.log_water("erin", 8).unwrap();
    svc.complete_quest("erin", "Hydration Hero").unwrap();
    assert_eq!(svc.quests("erin").unwrap().len(), 2);

    let quests = svc.reset_quests("erin").unwrap();
    assert_eq!(quests.len(), 3);
    assert!(quests.iter().all(|q| !q.completed));
}

// =============================================================================
// Activity feed
// =============================================================================

#[test]
fn test_recent_activities_are_capped() {
    let svc = service();
    svc.register("frank", "password1").unwrap();
    for _ in 0..12 {
        svc.log_workout("frank", &workout("Lunges", 10, 0.0)).unwrap();
    }
    svc.log_water("frank", 2).unwrap();

    let feed = svc.recent_activities("frank").unwrap();
    assert_eq!(feed.len(), 10);
    assert!(feed
        .iter()
        .any(|a| matches!(a, Activity::Workout { name, .. } if name == "Lunges")));
}
