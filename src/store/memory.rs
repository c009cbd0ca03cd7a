//! In-process store for tests and simulations.

use super::{validate_with_store, AuthResult, Authenticator, StoreError, UserStore};
use crate::core::user::UserRecord;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, UserRecord>>,
    referrals: Mutex<HashMap<String, Vec<String>>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with records keyed by their ids.
    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.lock();
            for record in records {
                map.insert(record.id.clone(), record);
            }
        }
        store
    }

    /// Makes every following save fail until turned off again.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: &str) -> Option<UserRecord> {
        self.records.lock().get(id).cloned()
    }

    /// Referrals waiting to be credited to `id`
    pub fn pending_referrals(&self, id: &str) -> Vec<String> {
        self.referrals.lock().get(id).cloned().unwrap_or_default()
    }
}

impl UserStore for MemoryStore {
    fn load_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.get(id))
    }

    fn save_user(&self, id: &str, user: &UserRecord) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected save failure".to_string()));
        }
        self.records.lock().insert(id.to_string(), user.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn add_referral(&self, referrer_id: &str, referred_id: &str) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected save failure".to_string()));
        }
        self.referrals
            .lock()
            .entry(referrer_id.to_string())
            .or_default()
            .push(referred_id.to_string());
        Ok(())
    }

    fn take_referrals(&self, id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.referrals.lock().remove(id).unwrap_or_default())
    }
}

impl Authenticator for MemoryStore {
    fn validate(&self, user_id: &str, auth_key: &str) -> Result<AuthResult, StoreError> {
        validate_with_store(self, user_id, auth_key)
    }
}
