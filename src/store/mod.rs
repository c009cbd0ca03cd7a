//! Persistence and identity collaborators.
//!
//! The engines never touch storage. A session reads the player's record
//! through [`Authenticator`] once at load time and hands every later write
//! to a [`UserStore`] via the coalescing writer.

pub mod memory;
pub mod save;

pub use memory::MemoryStore;
pub use save::SaveStore;

use crate::core::user::UserRecord;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("encode: {0}")]
    Encode(#[from] bincode::Error),
    #[error("invalid save version: expected 0x{expected:016X}, got 0x{found:016X}")]
    Version { expected: u64, found: u64 },
    #[error("checksum verification failed")]
    Checksum,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for user records. Writes are at-least-once; the session
/// never waits on them for gameplay.
///
/// Referral credits go through a per-user inbox instead of the referrer's
/// record, so a referrer with a session open never loses one to its own
/// next full-record write.
pub trait UserStore: Send + Sync {
    fn load_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;
    fn save_user(&self, id: &str, user: &UserRecord) -> Result<(), StoreError>;

    /// Notes that `referred_id` joined through `referrer_id`'s link.
    fn add_referral(&self, referrer_id: &str, referred_id: &str) -> Result<(), StoreError>;

    /// Removes and returns the referrals not yet credited to `id`.
    fn take_referrals(&self, id: &str) -> Result<Vec<String>, StoreError>;
}

/// Result of validating a `(user_id, auth_key)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResult {
    pub valid: bool,
    /// No record exists yet for this id
    pub is_new_user: bool,
    pub record: Option<UserRecord>,
}

impl AuthResult {
    pub fn new_user() -> Self {
        Self {
            valid: false,
            is_new_user: true,
            record: None,
        }
    }

    pub fn rejected() -> Self {
        Self {
            valid: false,
            is_new_user: false,
            record: None,
        }
    }

    pub fn accepted(record: UserRecord) -> Self {
        Self {
            valid: true,
            is_new_user: false,
            record: Some(record),
        }
    }
}

pub trait Authenticator: Send + Sync {
    fn validate(&self, user_id: &str, auth_key: &str) -> Result<AuthResult, StoreError>;
}

/// Key-match authentication against a store: unknown ids are new users,
/// known ids must present the stored auth key.
pub fn validate_with_store(
    store: &dyn UserStore,
    user_id: &str,
    auth_key: &str,
) -> Result<AuthResult, StoreError> {
    match store.load_user(user_id)? {
        None => Ok(AuthResult::new_user()),
        Some(record) if record.auth_key == auth_key => Ok(AuthResult::accepted(record)),
        Some(_) => Ok(AuthResult::rejected()),
    }
}
