//! Gameplay rule rejections.
//!
//! These are expected outcomes of player intents, returned as values. The
//! `Display` text is the message shown to the player.

use super::format::format_number;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Already mining!")]
    AlreadyMining,

    #[error("Mining time not reached!")]
    ClaimNotReady,

    #[error("Need {} DRX", format_number(*.cost))]
    InsufficientBalance { cost: f64, balance: f64 },

    #[error("Already claimed")]
    AlreadyClaimed,

    #[error("Max level reached!")]
    MaxLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_facing_messages() {
        assert_eq!(GameError::AlreadyMining.to_string(), "Already mining!");
        assert_eq!(
            GameError::ClaimNotReady.to_string(),
            "Mining time not reached!"
        );
        assert_eq!(
            GameError::InsufficientBalance {
                cost: 1_500.0,
                balance: 20.0
            }
            .to_string(),
            "Need 1.5K DRX"
        );
        assert_eq!(GameError::AlreadyClaimed.to_string(), "Already claimed");
        assert_eq!(GameError::MaxLevel.to_string(), "Max level reached!");
    }
}
