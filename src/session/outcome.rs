use crate::core::error::GameError;
use crate::mining::MiningReward;

/// Result of one player intent. Rule rejections are outcomes, not errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    /// Present on successful mining claims
    pub reward: Option<MiningReward>,
    /// Present when the intent was rejected
    pub rejection: Option<GameError>,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            reward: None,
            rejection: None,
        }
    }

    pub fn rejected(error: GameError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            reward: None,
            rejection: Some(error),
        }
    }

    pub fn with_reward(mut self, reward: MiningReward) -> Self {
        self.reward = Some(reward);
        self
    }
}
