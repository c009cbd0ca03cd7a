//! Boost upgrades: pricing, previews and purchases.
//!
//! Boost levels are the authoritative input for a player's mining rate and
//! claim cooldown; the cached values on the record are recomputed from all
//! three levels on every purchase.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
