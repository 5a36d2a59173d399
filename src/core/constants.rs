// XP and leveling
pub const XP_PER_LEVEL: u64 = 100;
pub const WORKOUT_BASE_XP: u64 = 10;
pub const WORKOUT_VOLUME_DIVISOR: f64 = 10.0;

// Workout name bonuses (case-insensitive substring, independently applied)
pub const SQUAT_XP_BONUS: u64 = 5;
pub const PUSH_XP_BONUS: u64 = 8;
pub const PLANK_XP_BONUS: u64 = 3;

// Starting stats
pub const STARTING_STRENGTH: u32 = 5;
pub const STARTING_STAMINA: u32 = 5;
pub const STARTING_AGILITY: u32 = 5;
pub const BASE_MAX_HEALTH: u32 = 100;
pub const MAX_HEALTH_PER_LEVEL: u32 = 20;

// Workout-triggered level-up growth
pub const WORKOUT_STAT_GROWTH: u32 = 2;

// Battle-triggered level-up growth
pub const BATTLE_STRENGTH_GROWTH: u32 = 2;
pub const BATTLE_STAMINA_GROWTH: u32 = 2;
pub const BATTLE_AGILITY_GROWTH: u32 = 1;
pub const BATTLE_HEALTH_GROWTH: u32 = 20;

// Battle
pub const MIN_HEALTH_TO_BATTLE: u32 = 10;
pub const DEFAULT_ENEMY_DAMAGE: u32 = 10;
pub const DEFAULT_ENEMY_XP_REWARD: u64 = 50;
pub const DEFAULT_ENEMY_GOLD_REWARD: u64 = 25;
pub const FLEE_HEALTH_COST: u32 = 5;
pub const ATTACK_DAMAGE_DIVISOR: f64 = 10.0;
pub const MAX_BATTLE_HISTORY: usize = 50;

// Shop
pub const HEALTH_POTION_COST: u64 = 10;

// Activity feed
pub const RECENT_ACTIVITY_LIMIT: usize = 10;
