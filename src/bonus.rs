//! One-shot and social rewards.

use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::core::user::UserRecord;

/// Credits the welcome bonus once per player.
pub fn claim_welcome_bonus(
    user: &UserRecord,
    config: &GameConfig,
) -> Result<UserRecord, GameError> {
    if user.bonus_claimed {
        return Err(GameError::AlreadyClaimed);
    }
    Ok(UserRecord {
        balance: config.round_currency(user.balance + config.welcome_bonus),
        total_earned: config.round_currency(user.total_earned + config.welcome_bonus),
        bonus_claimed: true,
        data_initialized: true,
        ..user.clone()
    })
}

/// Referrer's record after one more player joined through their link.
pub fn credit_referral(referrer: &UserRecord, config: &GameConfig) -> UserRecord {
    UserRecord {
        referral_count: referrer.referral_count.saturating_add(1),
        balance: config.round_currency(referrer.balance + config.referral_bonus),
        total_earned: config.round_currency(referrer.total_earned + config.referral_bonus),
        ..referrer.clone()
    }
}
