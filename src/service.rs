//! Request-level game operations.
//!
//! Every mutating call runs under the player's lock: load the record, apply
//! one core operation to a working copy, save it with a version check. A
//! failed operation saves nothing, so the stored record only ever reflects
//! complete transitions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::auth::{hash_password, verify_password, TokenSigner, TokenVerifier};
use crate::battle::{self, AttackOutcome, BattleView, FleeOutcome};
use crate::core::constants::RECENT_ACTIVITY_LIMIT;
use crate::core::progression::{level_progress, LevelProgress};
use crate::economy::{self, HealthPurchase};
use crate::error::{GameError, GameResult};
use crate::player::{self, Activity, PlayerRecord, Stats, WorkoutLogged, WorkoutReport};
use crate::quests::{self, QuestClaim, QuestInstance, QuestProgress};
use crate::storage::{normalize_key, PlayerStore, StoreError};

const MIN_PASSWORD_LEN: usize = 6;

/// Token handed out by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

/// Public view of a player. Never includes the credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub level: u32,
    pub xp: u64,
    pub gold: u64,
    pub stats: Stats,
    pub max_health: u32,
    pub active_battle: Option<BattleView>,
    pub workouts_logged: usize,
    pub quests_completed: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&PlayerRecord> for Profile {
    fn from(player: &PlayerRecord) -> Self {
        Self {
            username: player.username.clone(),
            level: player.level,
            xp: player.xp,
            gold: player.gold,
            stats: player.stats,
            max_health: player.max_health(),
            active_battle: player.battles.active().map(|b| b.view()),
            workouts_logged: player.workouts.len(),
            quests_completed: player.completed_quests.len(),
            created_at: player.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterToday {
    pub date: NaiveDate,
    pub cups: u32,
}

pub struct GameService {
    store: Arc<dyn PlayerStore>,
    tokens: TokenSigner,
    /// Per-player update locks. Idle entries are pruned.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    rng: Mutex<StdRng>,
    clock: fn() -> DateTime<Utc>,
}

impl GameService {
    pub fn new(store: Arc<dyn PlayerStore>, tokens: TokenSigner) -> Self {
        Self {
            store,
            tokens,
            locks: Mutex::new(HashMap::new()),
            rng: Mutex::new(StdRng::from_entropy()),
            clock: Utc::now,
        }
    }

    /// Fixes the enemy-selection sequence.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn with_clock(self, clock: fn() -> DateTime<Utc>) -> Self {
        Self { clock, ..self }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn lock_for(&self, username: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(normalize_key(username)).or_default().clone()
    }

    fn load(&self, username: &str) -> GameResult<PlayerRecord> {
        self.store.load(username).map_err(|e| match e {
            StoreError::NotFound(_) => GameError::not_found("Player not found"),
            other => GameError::Storage(other),
        })
    }

    fn read<T>(&self, username: &str, f: impl FnOnce(&PlayerRecord) -> T) -> GameResult<T> {
        let player = self.load(username)?;
        Ok(f(&player))
    }

    /// Runs `f` against a working copy and persists it only if `f` succeeds.
    fn update<T>(
        &self,
        username: &str,
        f: impl FnOnce(&mut PlayerRecord) -> GameResult<T>,
    ) -> GameResult<T> {
        let lock = self.lock_for(username);
        let result = {
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            self.load(username).and_then(|mut working| {
                let out = f(&mut working)?;
                self.store.save(&working)?;
                Ok(out)
            })
        };
        self.release(username, lock);
        result
    }

    /// Drops the player's lock entry once no other caller holds or awaits it.
    fn release(&self, username: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map, one here.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&normalize_key(username));
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    // === Accounts ===

    pub fn register(&self, username: &str, password: &str) -> GameResult<Session> {
        let username = username.trim();
        validate_username(username)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(GameError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let record = PlayerRecord::new(username.to_string(), hash_password(password), self.now());
        self.store.create(&record)?;
        info!(player = %username, "player_registered");

        Ok(self.session_for(username))
    }

    pub fn login(&self, username: &str, password: &str) -> GameResult<Session> {
        let player = match self.store.load(username.trim()) {
            Ok(player) => player,
            Err(StoreError::NotFound(_)) => return Err(GameError::Unauthorized),
            Err(e) => return Err(e.into()),
        };
        if !verify_password(&player.credential, password) {
            return Err(GameError::Unauthorized);
        }
        Ok(self.session_for(&player.username))
    }

    fn session_for(&self, username: &str) -> Session {
        Session {
            token: self.tokens.issue(&normalize_key(username)),
            username: username.to_string(),
        }
    }

    /// Resolves a bearer token to the player it was issued for.
    pub fn authenticate(&self, token: &str) -> GameResult<String> {
        self.tokens.verify(token)
    }

    // === Profile & progression ===

    pub fn profile(&self, username: &str) -> GameResult<Profile> {
        self.read(username, |p| Profile::from(p))
    }

    pub fn level_progress(&self, username: &str) -> GameResult<LevelProgress> {
        self.read(username, level_progress)
    }

    pub fn recent_activities(&self, username: &str) -> GameResult<Vec<Activity>> {
        self.read(username, |p| player::recent_activities(p, RECENT_ACTIVITY_LIMIT))
    }

    // === Activity ===

    pub fn log_water(&self, username: &str, cups: u32) -> GameResult<WaterToday> {
        let today = self.today();
        self.update(username, |p| {
            let cups = player::log_water(p, cups, today)?;
            Ok(WaterToday { date: today, cups })
        })
    }

    pub fn today_water(&self, username: &str) -> GameResult<WaterToday> {
        let today = self.today();
        self.read(username, |p| WaterToday {
            date: today,
            cups: player::today_water(p, today),
        })
    }

    pub fn log_workout(&self, username: &str, report: &WorkoutReport) -> GameResult<WorkoutLogged> {
        let now = self.now();
        self.update(username, |p| player::log_workout(p, report, now))
    }

    // === Quests ===

    /// Active quests, seeding them first if the list is empty.
    pub fn quests(&self, username: &str) -> GameResult<Vec<QuestInstance>> {
        let player = self.load(username)?;
        if !player.active_quests.is_empty() {
            return Ok(player.active_quests);
        }
        self.update(username, |p| {
            quests::seed_if_empty(p);
            Ok(p.active_quests.clone())
        })
    }

    pub fn quest_progress(&self, username: &str) -> GameResult<Vec<QuestProgress>> {
        let today = self.today();
        self.read(username, |p| quests::compute_progress(p, today))
    }

    pub fn complete_quest(&self, username: &str, title: &str) -> GameResult<QuestClaim> {
        let today = self.today();
        self.update(username, |p| quests::complete_quest(p, title, today))
    }

    pub fn reset_quests(&self, username: &str) -> GameResult<Vec<QuestInstance>> {
        self.update(username, |p| {
            quests::reset_quests(p);
            Ok(p.active_quests.clone())
        })
    }

    // === Battle ===

    pub fn start_battle(&self, username: &str) -> GameResult<BattleView> {
        let now = self.now();
        self.update(username, |p| {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            battle::start_battle(p, &mut *rng, now).map(|b| b.view())
        })
    }

    pub fn attack(&self, username: &str, workout: &WorkoutReport) -> GameResult<AttackOutcome> {
        self.update(username, |p| battle::attack(p, workout))
    }

    pub fn flee(&self, username: &str) -> GameResult<FleeOutcome> {
        self.update(username, battle::flee)
    }

    // === Shop ===

    pub fn buy_health(&self, username: &str, amount: u32) -> GameResult<HealthPurchase> {
        self.update(username, |p| economy::buy_health(p, amount))
    }
}

fn validate_username(username: &str) -> GameResult<()> {
    let len_ok = (3..=32).contains(&username.chars().count());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(GameError::validation(
            "Username must be 3-32 characters of letters, digits, '_' or '-'",
        ))
    }
}
