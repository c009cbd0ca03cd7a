//! Tunable game configuration.
//!
//! Every formula in the engines reads its constants from a [`GameConfig`].
//! Defaults come from [`super::constants`]; a TOML file may override any
//! subset of fields.

use super::constants::*;
use crate::boost::BoostType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("validation: {0}")]
    Validation(String),
}

/// Geometric cost curve for one boost type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostCurve {
    pub base_cost: f64,
    pub growth_factor: f64,
}

impl CostCurve {
    pub const fn new(base_cost: f64, growth_factor: f64) -> Self {
        Self {
            base_cost,
            growth_factor,
        }
    }
}

/// Cost curves for all three boosts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostCosts {
    pub mining_speed: CostCurve,
    pub claim_time: CostCurve,
    pub mining_rate: CostCurve,
}

impl Default for BoostCosts {
    fn default() -> Self {
        Self {
            mining_speed: CostCurve::new(MINING_SPEED_BASE_COST, MINING_SPEED_COST_GROWTH),
            claim_time: CostCurve::new(CLAIM_TIME_BASE_COST, CLAIM_TIME_COST_GROWTH),
            mining_rate: CostCurve::new(MINING_RATE_BASE_COST, MINING_RATE_COST_GROWTH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// DRX per second at boost level 1
    pub base_mining_rate: f64,

    /// Cooldown in seconds at claim-time level 1
    pub base_min_claim_time: u64,

    /// Seconds removed from the cooldown per claim-time level above 1
    pub claim_time_reduction: u64,

    pub mining_rate_multiplier: f64,
    pub mining_speed_multiplier: f64,

    pub boost_costs: BoostCosts,

    pub welcome_bonus: f64,

    /// Credited to the referrer when a referred user joins
    pub referral_bonus: f64,

    /// Accrual cap for a single mining run, in seconds
    pub max_mining_time: u64,

    /// Decimal places kept for currency amounts
    pub currency_precision: u32,

    pub xp_per_drx: f64,

    /// XP to advance from level L to L+1 is `xp_level_step * L`
    pub xp_level_step: u64,

    /// Quiet period before a coalesced save is written
    pub save_debounce_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_mining_rate: BASE_MINING_RATE,
            base_min_claim_time: BASE_MIN_CLAIM_TIME_SECONDS,
            claim_time_reduction: CLAIM_TIME_REDUCTION_SECONDS,
            mining_rate_multiplier: MINING_RATE_MULTIPLIER,
            mining_speed_multiplier: MINING_SPEED_MULTIPLIER,
            boost_costs: BoostCosts::default(),
            welcome_bonus: WELCOME_BONUS,
            referral_bonus: REFERRAL_BONUS,
            max_mining_time: MAX_MINING_TIME_SECONDS,
            currency_precision: CURRENCY_PRECISION,
            xp_per_drx: XP_PER_DRX,
            xp_level_step: XP_LEVEL_STEP,
            save_debounce_ms: SAVE_DEBOUNCE_MS,
        }
    }
}

impl GameConfig {
    /// Loads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn cost_curve(&self, boost: BoostType) -> CostCurve {
        match boost {
            BoostType::MiningSpeed => self.boost_costs.mining_speed,
            BoostType::ClaimTime => self.boost_costs.claim_time,
            BoostType::MiningRate => self.boost_costs.mining_rate,
        }
    }

    /// Rejects configurations that would break cost monotonicity or the
    /// non-negative balance invariant.
    ///
    /// Every cost from level 1 to `MAX_BOOST_LEVEL` must be finite and at
    /// least one currency unit above the previous one, so the rounded curve
    /// is strictly increasing over every reachable level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_precision > MAX_CURRENCY_PRECISION {
            return Err(ConfigError::Validation(format!(
                "currency precision must be at most {}, got {}",
                MAX_CURRENCY_PRECISION, self.currency_precision
            )));
        }
        let unit = 10f64.powi(-(self.currency_precision as i32));
        let top_exponent = (MAX_BOOST_LEVEL - 1) as i32;

        for boost in BoostType::ALL {
            let curve = self.cost_curve(boost);
            if !(curve.base_cost.is_finite() && curve.base_cost >= 1.0) {
                return Err(ConfigError::Validation(format!(
                    "{} base cost must be at least 1, got {}",
                    boost.name(),
                    curve.base_cost
                )));
            }
            if !(curve.growth_factor.is_finite() && curve.growth_factor > 1.0) {
                return Err(ConfigError::Validation(format!(
                    "{} growth factor must be greater than 1, got {}",
                    boost.name(),
                    curve.growth_factor
                )));
            }
            if curve.base_cost * (curve.growth_factor - 1.0) < unit {
                return Err(ConfigError::Validation(format!(
                    "{} cost must grow by at least {} per level",
                    boost.name(),
                    unit
                )));
            }
            let top_cost = curve.base_cost * curve.growth_factor.powi(top_exponent);
            if !self.round_currency(top_cost).is_finite() {
                return Err(ConfigError::Validation(format!(
                    "{} cost overflows before level {}",
                    boost.name(),
                    MAX_BOOST_LEVEL
                )));
            }
        }
        if !(self.base_mining_rate.is_finite() && self.base_mining_rate > 0.0) {
            return Err(ConfigError::Validation(
                "base mining rate must be positive".to_string(),
            ));
        }
        if self.mining_rate_multiplier < 1.0 || self.mining_speed_multiplier < 1.0 {
            return Err(ConfigError::Validation(
                "boost multipliers must be at least 1".to_string(),
            ));
        }
        let top_rate = self.base_mining_rate
            * self.mining_rate_multiplier.powi(top_exponent)
            * self.mining_speed_multiplier.powi(top_exponent);
        let top_reward = self.round_currency(top_rate * self.max_mining_time as f64);
        if !top_reward.is_finite() {
            return Err(ConfigError::Validation(format!(
                "mining rewards overflow before boost level {}",
                MAX_BOOST_LEVEL
            )));
        }
        if self.welcome_bonus < 0.0 || self.referral_bonus < 0.0 || self.xp_per_drx < 0.0 {
            return Err(ConfigError::Validation(
                "bonuses and xp rate must not be negative".to_string(),
            ));
        }
        if self.xp_level_step == 0 {
            return Err(ConfigError::Validation(
                "xp level step must be positive".to_string(),
            ));
        }
        if self.max_mining_time == 0 {
            return Err(ConfigError::Validation(
                "max mining time must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Rounds a currency amount to the configured precision.
    pub fn round_currency(&self, amount: f64) -> f64 {
        let scale = 10f64.powi(self.currency_precision as i32);
        (amount * scale).round() / scale
    }
}
