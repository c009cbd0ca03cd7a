//! Offline catch-up.
//!
//! When a session loads while a mining run is in progress, the reward accrued
//! while the player was away is previewed into `pending_rewards`. Nothing is
//! credited and the mining state is unchanged; only a claim pays out.

use super::logic::{calculate_mining_rewards, elapsed_seconds};
use crate::core::config::GameConfig;
use crate::core::user::UserRecord;

/// Report of offline mining results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OfflineReport {
    pub elapsed_seconds: u64,
    /// Elapsed time after the accrual cap
    pub credited_seconds: u64,
    pub pending_rewards: f64,
    pub capped: bool,
}

/// Computes the offline preview for a record at load time.
pub fn calculate_offline_rewards(
    user: &UserRecord,
    now_ms: i64,
    config: &GameConfig,
) -> OfflineReport {
    let elapsed = elapsed_seconds(user, now_ms);
    if elapsed == 0 {
        return OfflineReport::default();
    }

    let credited = elapsed.min(config.max_mining_time);
    let reward = calculate_mining_rewards(user.mining_rate, credited, config);

    OfflineReport {
        elapsed_seconds: elapsed,
        credited_seconds: credited,
        pending_rewards: reward.earned,
        capped: elapsed > config.max_mining_time,
    }
}

/// Returns the record with `pending_rewards` set from the offline preview.
pub fn apply_offline_catch_up(
    user: &UserRecord,
    now_ms: i64,
    config: &GameConfig,
) -> (UserRecord, OfflineReport) {
    let report = calculate_offline_rewards(user, now_ms, config);
    if report.credited_seconds == 0 {
        return (user.clone(), report);
    }
    let updated = UserRecord {
        pending_rewards: report.pending_rewards,
        ..user.clone()
    };
    (updated, report)
}
