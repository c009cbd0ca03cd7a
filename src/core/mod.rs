//! Shared building blocks: configuration, the user record, formatting,
//! progression and rule errors.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod progression;
pub mod user;

pub use config::{ConfigError, GameConfig};
pub use error::GameError;
pub use progression::{calculate_level, calculate_rank, LevelInfo, Rank, RankInfo};
pub use user::{BoostLevels, RecordError, Settings, UserRecord};
