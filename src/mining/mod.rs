//! Time-based mining: eligibility, rewards and offline catch-up.
//!
//! Mining has no running task. A run is just a start timestamp on the
//! record; the current state and the accrued reward are derived from the
//! clock whenever they are needed.

pub mod logic;
pub mod offline;

pub use logic::*;
pub use offline::*;
