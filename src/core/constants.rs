// Mining rates and cooldowns
pub const BASE_MINING_RATE: f64 = 0.05;
pub const BASE_MIN_CLAIM_TIME_SECONDS: u64 = 30 * 60;
pub const CLAIM_TIME_FLOOR_SECONDS: u64 = 300;
pub const CLAIM_TIME_REDUCTION_SECONDS: u64 = 300;
pub const MAX_MINING_TIME_SECONDS: u64 = 8 * 60 * 60;

// Boost multipliers (applied per level above 1)
pub const MINING_RATE_MULTIPLIER: f64 = 1.5;
pub const MINING_SPEED_MULTIPLIER: f64 = 1.2;

// Highest level any boost can reach; purchases stop here
pub const MAX_BOOST_LEVEL: u32 = 1000;

// Boost cost curves: base_cost * growth_factor^(level - 1)
pub const MINING_SPEED_BASE_COST: f64 = 100.0;
pub const MINING_SPEED_COST_GROWTH: f64 = 1.5;
pub const CLAIM_TIME_BASE_COST: f64 = 150.0;
pub const CLAIM_TIME_COST_GROWTH: f64 = 1.6;
pub const MINING_RATE_BASE_COST: f64 = 200.0;
pub const MINING_RATE_COST_GROWTH: f64 = 1.8;

// One-shot and social rewards
pub const WELCOME_BONUS: f64 = 1000.0;
pub const REFERRAL_BONUS: f64 = 500.0;

// XP and leveling
pub const XP_PER_DRX: f64 = 0.1;
pub const XP_LEVEL_STEP: u64 = 100;
/// Largest XP total a stored record may carry (2^53 - 1, the largest
/// integer a JSON number holds exactly)
pub const MAX_RECORD_XP: u64 = (1 << 53) - 1;

// Currency display precision (decimal places)
pub const CURRENCY_PRECISION: u32 = 2;
pub const MAX_CURRENCY_PRECISION: u32 = 8;

// Persistence
pub const SAVE_DEBOUNCE_MS: u64 = 500;
pub const SAVE_MAX_RETRIES: u32 = 3;
pub const SAVE_RETRY_JITTER_MS: u64 = 250;
pub const SAVE_VERSION_MAGIC: u64 = 0x4452_585F_4D49_4E31; // "DRX_MIN1"
