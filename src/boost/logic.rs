//! Boost cost curves, effect previews and purchase application.

use super::types::BoostType;
use crate::core::config::GameConfig;
use crate::core::constants::{CLAIM_TIME_FLOOR_SECONDS, MAX_BOOST_LEVEL};
use crate::core::error::GameError;
use crate::core::format::{format_number_precise, format_time};
use crate::core::user::{BoostLevels, UserRecord};

/// Price of buying the next level of `boost` from `current_level`.
///
/// `base_cost * growth_factor^(current_level - 1)`, rounded to currency
/// precision. Depends only on the boost type and level. A validated config
/// keeps this finite and strictly increasing up to `MAX_BOOST_LEVEL`; levels
/// past the ceiling are never sold.
pub fn get_boost_cost(boost: BoostType, current_level: u32, config: &GameConfig) -> f64 {
    let curve = config.cost_curve(boost);
    let exponent = i32::try_from(current_level.saturating_sub(1)).unwrap_or(i32::MAX);
    config.round_currency(curve.base_cost * curve.growth_factor.powi(exponent))
}

/// Mining speed multiplier at a given speed level.
pub fn mining_speed_multiplier(speed_level: u32, config: &GameConfig) -> f64 {
    config
        .mining_speed_multiplier
        .powi(speed_level.saturating_sub(1) as i32)
}

/// DRX per second for a full set of boost levels.
pub fn mining_rate_for(levels: &BoostLevels, config: &GameConfig) -> f64 {
    let rate_mult = config
        .mining_rate_multiplier
        .powi(levels.mining_rate_level.saturating_sub(1) as i32);
    config.base_mining_rate * rate_mult * mining_speed_multiplier(levels.mining_speed_level, config)
}

/// Claim cooldown in seconds at a given claim-time level, never below the floor.
pub fn min_claim_time_for(claim_time_level: u32, config: &GameConfig) -> u64 {
    let steps = claim_time_level.saturating_sub(1) as u64;
    config
        .base_min_claim_time
        .saturating_sub(config.claim_time_reduction.saturating_mul(steps))
        .max(CLAIM_TIME_FLOOR_SECONDS)
}

fn format_boost_value(boost: BoostType, levels: &BoostLevels, config: &GameConfig) -> String {
    match boost {
        BoostType::MiningSpeed => format!(
            "{:.1}x",
            mining_speed_multiplier(levels.mining_speed_level, config)
        ),
        BoostType::ClaimTime => format_time(min_claim_time_for(levels.claim_time_level, config)),
        BoostType::MiningRate => format!(
            "{}/s",
            format_number_precise(mining_rate_for(levels, config))
        ),
    }
}

/// Formatted effect of the player's current level of `boost`.
pub fn get_current_boost_value(boost: BoostType, user: &UserRecord, config: &GameConfig) -> String {
    format_boost_value(boost, &user.boosts, config)
}

/// Formatted effect `boost` would have one level above `current_level`,
/// keeping the player's other boost levels. `"MAX"` at the level ceiling.
pub fn get_next_boost_value(
    boost: BoostType,
    current_level: u32,
    user: &UserRecord,
    config: &GameConfig,
) -> String {
    if current_level >= MAX_BOOST_LEVEL {
        return "MAX".to_string();
    }
    let mut levels = user.boosts;
    match boost {
        BoostType::MiningSpeed => levels.mining_speed_level = current_level,
        BoostType::ClaimTime => levels.claim_time_level = current_level,
        BoostType::MiningRate => levels.mining_rate_level = current_level,
    }
    format_boost_value(boost, &levels.incremented(boost), config)
}

/// Whether the player can pay for the next level of `boost`.
pub fn can_afford(boost: BoostType, user: &UserRecord, config: &GameConfig) -> bool {
    let level = user.boosts.level(boost);
    level < MAX_BOOST_LEVEL && user.balance >= get_boost_cost(boost, level, config)
}

/// Buys one level of `boost`.
///
/// Returns the updated record with the cost deducted and both cached rates
/// recomputed from all three levels. The input record is never modified.
pub fn apply_boost_purchase(
    user: &UserRecord,
    boost: BoostType,
    config: &GameConfig,
) -> Result<UserRecord, GameError> {
    let level = user.boosts.level(boost);
    if level >= MAX_BOOST_LEVEL {
        return Err(GameError::MaxLevel);
    }
    let cost = get_boost_cost(boost, level, config);
    if user.balance < cost {
        return Err(GameError::InsufficientBalance {
            cost,
            balance: user.balance,
        });
    }

    let boosts = user.boosts.incremented(boost);
    Ok(UserRecord {
        balance: config.round_currency(user.balance - cost).max(0.0),
        boosts,
        mining_rate: mining_rate_for(&boosts, config),
        min_claim_time: min_claim_time_for(boosts.claim_time_level, config),
        ..user.clone()
    })
}
