//! Level and rank progression.
//!
//! Levels come from cumulative XP on a linear-step curve: advancing from
//! level L to L+1 costs `xp_level_step * L`. Ranks are cosmetic tiers keyed
//! on lifetime earnings.

use super::config::GameConfig;

/// Level breakdown shown in the header bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: u32,
    /// XP earned inside the current level
    pub current_xp: u64,
    /// XP span of the current level
    pub xp_for_next: u64,
}

impl LevelInfo {
    pub fn progress_percent(&self) -> f64 {
        if self.xp_for_next == 0 {
            return 0.0;
        }
        self.current_xp as f64 / self.xp_for_next as f64 * 100.0
    }
}

/// XP required to advance from `level` to `level + 1`.
pub fn xp_for_next_level(level: u32, config: &GameConfig) -> u64 {
    config.xp_level_step.saturating_mul(level as u64)
}

/// Exact cumulative XP for `level`. Fits in a u128 for every u32 level and
/// u64 step.
fn cumulative_xp_exact(level: u32, step: u64) -> u128 {
    let l = level as u128;
    step as u128 * (l * l.saturating_sub(1) / 2)
}

/// Total XP required to reach `level` from zero, saturating at `u64::MAX`.
pub fn cumulative_xp_for_level(level: u32, config: &GameConfig) -> u64 {
    u64::try_from(cumulative_xp_exact(level, config.xp_level_step)).unwrap_or(u64::MAX)
}

/// Level breakdown for a cumulative XP total. Levels stop at `u32::MAX`.
pub fn calculate_level(xp: u64, config: &GameConfig) -> LevelInfo {
    let step = config.xp_level_step;
    let target = xp as u128;

    // Largest level whose cumulative XP does not exceed `xp`
    let (mut lo, mut hi) = (1u32, u32::MAX);
    while lo < hi {
        let mid = lo + (hi - lo) / 2 + 1;
        if cumulative_xp_exact(mid, step) <= target {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let floor = cumulative_xp_exact(lo, step) as u64;
    LevelInfo {
        level: lo,
        current_xp: xp - floor,
        xp_for_next: xp_for_next_level(lo, config),
    }
}

/// Cosmetic tiers ordered by lifetime-earnings threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Legend,
}

impl Rank {
    /// All ranks in ascending threshold order
    pub const ALL: [Rank; 6] = [
        Rank::Bronze,
        Rank::Silver,
        Rank::Gold,
        Rank::Platinum,
        Rank::Diamond,
        Rank::Legend,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rank::Bronze => "Bronze",
            Rank::Silver => "Silver",
            Rank::Gold => "Gold",
            Rank::Platinum => "Platinum",
            Rank::Diamond => "Diamond",
            Rank::Legend => "Legend",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Rank::Bronze => "🥉",
            Rank::Silver => "🥈",
            Rank::Gold => "🥇",
            Rank::Platinum => "💎",
            Rank::Diamond => "💠",
            Rank::Legend => "👑",
        }
    }

    /// Minimum lifetime DRX earned to hold this rank
    pub fn threshold(&self) -> f64 {
        match self {
            Rank::Bronze => 0.0,
            Rank::Silver => 10_000.0,
            Rank::Gold => 50_000.0,
            Rank::Platinum => 250_000.0,
            Rank::Diamond => 1_000_000.0,
            Rank::Legend => 5_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankInfo {
    pub rank: Rank,
    pub icon: &'static str,
}

pub fn calculate_rank(total_earned: f64) -> RankInfo {
    let rank = Rank::ALL
        .iter()
        .rev()
        .find(|r| r.threshold() <= total_earned)
        .copied()
        .unwrap_or(Rank::Bronze);
    RankInfo {
        rank,
        icon: rank.icon(),
    }
}

/// Threshold of the next rank up, or `None` at Legend.
pub fn next_rank_threshold(total_earned: f64) -> Option<f64> {
    Rank::ALL
        .iter()
        .map(Rank::threshold)
        .find(|t| *t > total_earned)
}
