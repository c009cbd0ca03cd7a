//! Game session controller and its runtime collaborators.
//!
//! A [`GameSession`] owns one player's record for the lifetime of a session,
//! serializes intents against it, and hands each new record to a
//! [`CoalescingWriter`] for eventual persistence.

pub mod clock;
pub mod controller;
pub mod feedback;
pub mod outcome;
pub mod writer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Collaborators, GameSession, Referral, SessionError, SessionInit};
pub use feedback::{Feedback, LogFeedback, NoFeedback, RecordingFeedback, Signal};
pub use outcome::Outcome;
pub use writer::CoalescingWriter;
