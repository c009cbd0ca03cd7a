use super::config::GameConfig;
use super::constants::{MAX_BOOST_LEVEL, MAX_RECORD_XP};
use super::progression::calculate_level;
use crate::boost::{self, BoostType};
use serde::{Deserialize, Serialize};

/// Per-boost upgrade levels, each between 1 and `MAX_BOOST_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoostLevels {
    pub mining_speed_level: u32,
    pub claim_time_level: u32,
    pub mining_rate_level: u32,
}

impl Default for BoostLevels {
    fn default() -> Self {
        Self {
            mining_speed_level: 1,
            claim_time_level: 1,
            mining_rate_level: 1,
        }
    }
}

impl BoostLevels {
    pub fn level(&self, boost: BoostType) -> u32 {
        match boost {
            BoostType::MiningSpeed => self.mining_speed_level,
            BoostType::ClaimTime => self.claim_time_level,
            BoostType::MiningRate => self.mining_rate_level,
        }
    }

    /// Returns a copy with one boost raised by a single level.
    pub fn incremented(self, boost: BoostType) -> Self {
        let mut next = self;
        let slot = match boost {
            BoostType::MiningSpeed => &mut next.mining_speed_level,
            BoostType::ClaimTime => &mut next.claim_time_level,
            BoostType::MiningRate => &mut next.mining_rate_level,
        };
        *slot = slot.saturating_add(1);
        next
    }
}

/// Player preferences. `vibration` gates feedback signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sound: bool,
    pub vibration: bool,
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
            notifications: true,
        }
    }
}

/// Problems found in a stored record that make it unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("record has an empty user id")]
    MissingId,
    #[error("{field} is not a finite non-negative amount: {value}")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("boost {0} level is out of range")]
    InvalidBoostLevel(&'static str),
    #[error("xp {0} exceeds the storable maximum")]
    InvalidXp(u64),
    #[error("mining flag and start time disagree (is_mining={is_mining}, start={start})")]
    InconsistentMining { is_mining: bool, start: i64 },
}

/// The player's complete persisted state.
///
/// Treated as an immutable value: every gameplay operation returns a new
/// record instead of editing one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub id: String,
    pub auth_key: String,
    pub first_name: String,
    pub last_name: String,

    pub balance: f64,
    /// Lifetime accrual, never decreases
    pub total_earned: f64,

    pub xp: u64,
    /// Derived from `xp`; refreshed whenever XP changes
    pub level: u32,

    pub is_mining: bool,
    /// Epoch milliseconds, 0 when idle
    pub mining_start_time: i64,
    pub last_claim_time: i64,
    /// Offline catch-up preview; never credited directly
    pub pending_rewards: f64,

    /// DRX per second, cached from boost levels
    pub mining_rate: f64,
    /// Cooldown in seconds, cached from boost levels
    pub min_claim_time: u64,

    pub boosts: BoostLevels,
    pub settings: Settings,

    pub bonus_claimed: bool,
    pub data_initialized: bool,

    pub referred_by: String,
    pub referral_count: u32,

    pub joined_at: i64,
    pub last_active: i64,
    pub is_returning_user: bool,
}

impl Default for UserRecord {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            id: String::new(),
            auth_key: String::new(),
            first_name: "User".to_string(),
            last_name: String::new(),
            balance: 0.0,
            total_earned: 0.0,
            xp: 0,
            level: 1,
            is_mining: false,
            mining_start_time: 0,
            last_claim_time: 0,
            pending_rewards: 0.0,
            mining_rate: config.base_mining_rate,
            min_claim_time: config.base_min_claim_time,
            boosts: BoostLevels::default(),
            settings: Settings::default(),
            bonus_claimed: false,
            data_initialized: false,
            referred_by: String::new(),
            referral_count: 0,
            joined_at: 0,
            last_active: 0,
            is_returning_user: false,
        }
    }
}

impl UserRecord {
    /// Creates a fresh record for a first-time player.
    pub fn new(
        id: impl Into<String>,
        auth_key: impl Into<String>,
        now_ms: i64,
        config: &GameConfig,
    ) -> Self {
        Self {
            id: id.into(),
            auth_key: auth_key.into(),
            joined_at: now_ms,
            last_active: now_ms,
            ..Self::default()
        }
        .with_derived(config)
    }

    /// Recomputes every cached field from its authoritative source:
    /// rates from boost levels and `level` from `xp`.
    pub fn with_derived(mut self, config: &GameConfig) -> Self {
        self.mining_rate = boost::mining_rate_for(&self.boosts, config);
        self.min_claim_time = boost::min_claim_time_for(self.boosts.claim_time_level, config);
        self.level = calculate_level(self.xp, config).level;
        self
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.id.is_empty() {
            return Err(RecordError::MissingId);
        }
        for (field, value) in [
            ("balance", self.balance),
            ("totalEarned", self.total_earned),
            ("pendingRewards", self.pending_rewards),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RecordError::InvalidAmount { field, value });
            }
        }
        for boost in BoostType::ALL {
            if !(1..=MAX_BOOST_LEVEL).contains(&self.boosts.level(boost)) {
                return Err(RecordError::InvalidBoostLevel(boost.name()));
            }
        }
        if self.xp > MAX_RECORD_XP {
            return Err(RecordError::InvalidXp(self.xp));
        }
        if self.is_mining != (self.mining_start_time > 0) {
            return Err(RecordError::InconsistentMining {
                is_mining: self.is_mining,
                start: self.mining_start_time,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let config = GameConfig::default();
        let user = UserRecord::new("42", "key", 1_000, &config);

        assert_eq!(user.id, "42");
        assert_eq!(user.balance, 0.0);
        assert_eq!(user.level, 1);
        assert!(!user.is_mining);
        assert_eq!(user.mining_start_time, 0);
        assert_eq!(user.mining_rate, config.base_mining_rate);
        assert_eq!(user.min_claim_time, config.base_min_claim_time);
        assert_eq!(user.boosts, BoostLevels::default());
        assert_eq!(user.joined_at, 1_000);
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_stored_fields_merge_over_defaults() {
        let json = r#"{"id":"7","balance":12.5,"boosts":{"claimTimeLevel":3}}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();

        assert_eq!(user.id, "7");
        assert_eq!(user.balance, 12.5);
        assert_eq!(user.boosts.claim_time_level, 3);
        assert_eq!(user.boosts.mining_speed_level, 1);
        assert!(user.settings.vibration);
        assert_eq!(user.first_name, "User");
    }

    #[test]
    fn test_serialized_shape_is_camel_case() {
        let user = UserRecord::new("1", "k", 0, &GameConfig::default());
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("miningStartTime").is_some());
        assert!(value.get("totalEarned").is_some());
        assert!(value["boosts"].get("miningRateLevel").is_some());
    }

    #[test]
    fn test_with_derived_repairs_stale_cache() {
        let config = GameConfig::default();
        let mut user = UserRecord::new("1", "k", 0, &config);
        user.boosts.claim_time_level = 4;
        user.xp = 250;
        user.min_claim_time = 99_999;
        user.level = 40;

        let user = user.with_derived(&config);
        assert_eq!(user.min_claim_time, 1800 - 3 * 300);
        assert_eq!(user.level, 2);
    }

    #[test]
    fn test_validate_rejects_negative_balance() {
        let mut user = UserRecord::new("1", "k", 0, &GameConfig::default());
        user.balance = -1.0;
        assert!(matches!(
            user.validate(),
            Err(RecordError::InvalidAmount { field: "balance", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inconsistent_mining() {
        let mut user = UserRecord::new("1", "k", 0, &GameConfig::default());
        user.is_mining = true;
        assert!(matches!(
            user.validate(),
            Err(RecordError::InconsistentMining { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_boost_level() {
        let mut user = UserRecord::new("1", "k", 0, &GameConfig::default());
        user.boosts.mining_rate_level = 0;
        assert_eq!(
            user.validate(),
            Err(RecordError::InvalidBoostLevel("Mining Rate"))
        );
    }

    #[test]
    fn test_validate_rejects_boost_above_ceiling() {
        let mut user = UserRecord::new("1", "k", 0, &GameConfig::default());
        user.boosts.claim_time_level = MAX_BOOST_LEVEL;
        assert!(user.validate().is_ok());
        user.boosts.claim_time_level = MAX_BOOST_LEVEL + 1;
        assert_eq!(
            user.validate(),
            Err(RecordError::InvalidBoostLevel("Claim Time"))
        );
    }

    #[test]
    fn test_validate_rejects_unstorable_xp() {
        let mut user = UserRecord::new("1", "k", 0, &GameConfig::default());
        user.xp = MAX_RECORD_XP;
        assert!(user.validate().is_ok());
        user.xp = u64::MAX;
        assert_eq!(user.validate(), Err(RecordError::InvalidXp(u64::MAX)));
    }

    #[test]
    fn test_incremented_saturates() {
        let levels = BoostLevels {
            mining_speed_level: u32::MAX,
            ..BoostLevels::default()
        };
        let next = levels.incremented(BoostType::MiningSpeed);
        assert_eq!(next.mining_speed_level, u32::MAX);
    }

    #[test]
    fn test_incremented_touches_only_target() {
        let levels = BoostLevels::default().incremented(BoostType::ClaimTime);
        assert_eq!(levels.claim_time_level, 2);
        assert_eq!(levels.mining_speed_level, 1);
        assert_eq!(levels.mining_rate_level, 1);
    }
}
