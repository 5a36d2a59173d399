//! Water and workout logging plus the recent activity feed.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{PlayerRecord, WaterEntry, WorkoutEntry};
use crate::core::progression::{apply_xp, award_workout_xp, Growth, LevelUpResult, StatFocus};
use crate::error::{GameError, GameResult};

/// A workout as reported by the player.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutReport {
    pub name: String,
    pub reps: u32,
    /// Required when logging, optional (defaults to 1) when attacking.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub sets: Option<u32>,
}

/// Result of logging a workout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogged {
    pub xp_gained: u64,
    pub total_xp: u64,
    #[serde(flatten)]
    pub level: LevelUpResult,
}

/// Adds cups to `today`'s entry. Returns today's total.
pub fn log_water(player: &mut PlayerRecord, cups: u32, today: NaiveDate) -> GameResult<u32> {
    if cups == 0 {
        return Err(GameError::validation("cups must be at least 1"));
    }

    let intake = &mut player.water_intake;
    let total = match intake.iter_mut().find(|entry| entry.date == today) {
        Some(entry) => {
            entry.cups = entry.cups.saturating_add(cups);
            entry.cups
        }
        None => {
            let at = intake.partition_point(|entry| entry.date < today);
            intake.insert(at, WaterEntry { date: today, cups });
            cups
        }
    };
    Ok(total)
}

pub fn today_water(player: &PlayerRecord, today: NaiveDate) -> u32 {
    player.water_on(today)
}

/// Records a workout, awards its XP and applies any level-up.
pub fn log_workout(
    player: &mut PlayerRecord,
    report: &WorkoutReport,
    now: DateTime<Utc>,
) -> GameResult<WorkoutLogged> {
    let name = report.name.trim();
    if name.is_empty() {
        return Err(GameError::validation("Workout name is required"));
    }
    if report.reps == 0 {
        return Err(GameError::validation("reps must be at least 1"));
    }
    let weight = report
        .weight
        .ok_or_else(|| GameError::validation("weight is required"))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(GameError::validation("weight must be a non-negative number"));
    }
    let sets = report.sets.unwrap_or(1);
    if sets == 0 {
        return Err(GameError::validation("sets must be at least 1"));
    }

    let xp = award_workout_xp(name, report.reps, weight, sets);
    player.workouts.push(WorkoutEntry {
        name: name.to_string(),
        reps: report.reps,
        weight,
        sets,
        xp,
        timestamp: now,
    });

    let level = apply_xp(player, xp, Growth::Training(StatFocus::from_workout_name(name)));

    Ok(WorkoutLogged {
        xp_gained: xp,
        total_xp: player.xp,
        level,
    })
}

/// One line of the recent activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Activity {
    #[serde(rename_all = "camelCase")]
    Workout {
        name: String,
        reps: u32,
        weight: f64,
        xp: u64,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Water {
        cups: u32,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Battle {
        enemy_name: String,
        outcome: String,
        timestamp: DateTime<Utc>,
    },
}

impl Activity {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Activity::Workout { timestamp, .. }
            | Activity::Water { timestamp, .. }
            | Activity::Battle { timestamp, .. } => *timestamp,
        }
    }
}

/// Workouts, water days and battles merged newest first.
pub fn recent_activities(player: &PlayerRecord, limit: usize) -> Vec<Activity> {
    let workouts = player.workouts.iter().map(|w| Activity::Workout {
        name: w.name.clone(),
        reps: w.reps,
        weight: w.weight,
        xp: w.xp,
        timestamp: w.timestamp,
    });
    let water = player.water_intake.iter().map(|entry| Activity::Water {
        cups: entry.cups,
        timestamp: entry.date.and_time(NaiveTime::MIN).and_utc(),
    });
    let battles = player.battles.iter().map(|b| Activity::Battle {
        enemy_name: b.enemy_name.clone(),
        outcome: b.state.label().to_string(),
        timestamp: b.created_at,
    });

    let mut feed: Vec<Activity> = workouts.chain(water).chain(battles).collect();
    feed.sort_by_key(|activity| std::cmp::Reverse(activity.timestamp()));
    feed.truncate(limit);
    feed
}
