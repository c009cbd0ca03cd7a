//! Boost identifiers and display metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three purchasable mining upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoostType {
    MiningSpeed,
    ClaimTime,
    MiningRate,
}

impl BoostType {
    /// All boosts in display order
    pub const ALL: [BoostType; 3] = [
        BoostType::MiningSpeed,
        BoostType::ClaimTime,
        BoostType::MiningRate,
    ];

    /// Display name for UI
    pub fn name(&self) -> &'static str {
        match self {
            BoostType::MiningSpeed => "Mining Speed",
            BoostType::ClaimTime => "Claim Time",
            BoostType::MiningRate => "Mining Rate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BoostType::MiningSpeed => "Increase mining efficiency",
            BoostType::ClaimTime => "Reduce minimum claim time",
            BoostType::MiningRate => "Increase DRX per second",
        }
    }

    /// Identifier used in persisted records and outcome messages
    pub fn key(&self) -> &'static str {
        match self {
            BoostType::MiningSpeed => "miningSpeed",
            BoostType::ClaimTime => "claimTime",
            BoostType::MiningRate => "miningRate",
        }
    }
}

impl fmt::Display for BoostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown boost type: {0}")]
pub struct UnknownBoost(pub String);

impl FromStr for BoostType {
    type Err = UnknownBoost;

    /// Accepts record keys (`miningSpeed`) and short CLI names (`speed`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miningSpeed" | "speed" => Ok(BoostType::MiningSpeed),
            "claimTime" | "claim" => Ok(BoostType::ClaimTime),
            "miningRate" | "rate" => Ok(BoostType::MiningRate),
            other => Err(UnknownBoost(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_and_aliases() {
        assert_eq!("miningSpeed".parse(), Ok(BoostType::MiningSpeed));
        assert_eq!("claim".parse(), Ok(BoostType::ClaimTime));
        assert_eq!("rate".parse(), Ok(BoostType::MiningRate));
        assert_eq!(
            "turbo".parse::<BoostType>(),
            Err(UnknownBoost("turbo".to_string()))
        );
    }

    #[test]
    fn test_key_roundtrips_through_parse() {
        for boost in BoostType::ALL {
            assert_eq!(boost.key().parse(), Ok(boost));
        }
    }
}
