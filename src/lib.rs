//! DRX Miner - idle-mining reward and progression engine.
//!
//! The engines (`boost`, `mining`, `core::progression`, `bonus`) are pure
//! functions over [`UserRecord`] values. [`session::GameSession`] drives them
//! against a single player's record and handles persistence and feedback.

pub mod bonus;
pub mod boost;
pub mod build_info;
pub mod core;
pub mod mining;
pub mod session;
pub mod store;

pub use crate::core::{GameConfig, GameError, UserRecord};
pub use boost::BoostType;
pub use session::{GameSession, Outcome, SessionInit};
