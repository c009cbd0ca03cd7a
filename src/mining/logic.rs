//! Mining state machine and reward calculation.

use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::core::progression::calculate_level;
use crate::core::user::UserRecord;
use serde::{Deserialize, Serialize};

/// Reward category. The current ruleset only pays the primary currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardKind {
    Drx,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningReward {
    pub earned: f64,
    pub kind: RewardKind,
    pub xp: u64,
}

/// Derived mining state. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningState {
    Idle,
    /// Accruing; claimable after `remaining_seconds`
    Mining { remaining_seconds: u64 },
    ClaimReady,
}

/// Whole seconds since the run started. Zero when idle or when the clock
/// reads earlier than the start time.
pub fn elapsed_seconds(user: &UserRecord, now_ms: i64) -> u64 {
    if !user.is_mining || user.mining_start_time <= 0 {
        return 0;
    }
    (now_ms.saturating_sub(user.mining_start_time).max(0) / 1000) as u64
}

pub fn mining_state(user: &UserRecord, now_ms: i64) -> MiningState {
    if !user.is_mining {
        return MiningState::Idle;
    }
    let elapsed = elapsed_seconds(user, now_ms);
    if elapsed >= user.min_claim_time {
        MiningState::ClaimReady
    } else {
        MiningState::Mining {
            remaining_seconds: user.min_claim_time - elapsed,
        }
    }
}

pub fn can_claim_mining(user: &UserRecord, now_ms: i64) -> bool {
    mining_state(user, now_ms) == MiningState::ClaimReady
}

/// Seconds of accrual for the current run, capped at `max_mining_time`.
pub fn get_mining_duration(user: &UserRecord, now_ms: i64, config: &GameConfig) -> u64 {
    elapsed_seconds(user, now_ms).min(config.max_mining_time)
}

/// Reward for `duration_seconds` of mining at `mining_rate`.
///
/// Pure and deterministic: the same inputs always produce the same reward,
/// which lets live claims and offline previews agree exactly.
pub fn calculate_mining_rewards(
    mining_rate: f64,
    duration_seconds: u64,
    config: &GameConfig,
) -> MiningReward {
    let earned = config.round_currency(duration_seconds as f64 * mining_rate).max(0.0);
    MiningReward {
        earned,
        kind: RewardKind::Drx,
        xp: (earned * config.xp_per_drx).floor() as u64,
    }
}

/// Live estimate of what a claim would pay right now.
pub fn pending_estimate(user: &UserRecord, now_ms: i64, config: &GameConfig) -> f64 {
    let duration = get_mining_duration(user, now_ms, config);
    calculate_mining_rewards(user.mining_rate, duration, config).earned
}

/// Idle -> Mining.
pub fn start_mining(user: &UserRecord, now_ms: i64) -> Result<UserRecord, GameError> {
    if user.is_mining {
        return Err(GameError::AlreadyMining);
    }
    Ok(UserRecord {
        is_mining: true,
        mining_start_time: now_ms.max(1),
        pending_rewards: 0.0,
        last_active: now_ms,
        ..user.clone()
    })
}

/// ClaimReady -> Idle, crediting the capped reward.
pub fn claim_mining(
    user: &UserRecord,
    now_ms: i64,
    config: &GameConfig,
) -> Result<(UserRecord, MiningReward), GameError> {
    if !can_claim_mining(user, now_ms) {
        return Err(GameError::ClaimNotReady);
    }

    let duration = get_mining_duration(user, now_ms, config);
    let reward = calculate_mining_rewards(user.mining_rate, duration, config);
    let xp = user.xp.saturating_add(reward.xp);

    let updated = UserRecord {
        balance: config.round_currency(user.balance + reward.earned),
        total_earned: config.round_currency(user.total_earned + reward.earned),
        xp,
        level: calculate_level(xp, config).level,
        is_mining: false,
        mining_start_time: 0,
        pending_rewards: 0.0,
        last_claim_time: now_ms,
        last_active: now_ms,
        ..user.clone()
    };
    Ok((updated, reward))
}
