//! The game session controller.
//!
//! Every intent runs under the session lock: it reads the current record,
//! computes a replacement with the pure engines, swaps it in and queues it
//! for persistence before the lock is released. Feedback fires afterwards.

use super::clock::Clock;
use super::feedback::{Feedback, Signal};
use super::outcome::Outcome;
use super::writer::CoalescingWriter;
use crate::boost::{self, BoostType};
use crate::bonus::{claim_welcome_bonus, credit_referral};
use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::core::format::format_number;
use crate::core::user::{RecordError, Settings, UserRecord};
use crate::mining::{self, MiningState, OfflineReport};
use crate::store::{AuthResult, Authenticator, StoreError, UserStore};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Failures that prevent a session from starting at all.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("authentication failed for user {user_id}")]
    Unauthorized { user_id: String },
    #[error("stored record for user {user_id} is malformed: {source}")]
    MalformedRecord {
        user_id: String,
        #[source]
        source: RecordError,
    },
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

/// Player who shared the link a new user arrived through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referral {
    pub referrer_id: String,
    pub referrer_key: String,
}

/// Identity and profile supplied by the host at session start.
#[derive(Debug, Clone, Default)]
pub struct SessionInit {
    pub user_id: String,
    pub auth_key: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub referral: Option<Referral>,
}

impl SessionInit {
    pub fn new(user_id: impl Into<String>, auth_key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            auth_key: auth_key.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn UserStore>,
    pub auth: Arc<dyn Authenticator>,
    pub feedback: Arc<dyn Feedback>,
    pub clock: Arc<dyn Clock>,
}

/// How a successful mutation is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Persist {
    Debounced,
    Immediate,
}

pub struct GameSession {
    config: GameConfig,
    user: Mutex<UserRecord>,
    store: Arc<dyn UserStore>,
    writer: CoalescingWriter,
    feedback: Arc<dyn Feedback>,
    clock: Arc<dyn Clock>,
    offline: OfflineReport,
}

impl GameSession {
    /// Authenticates the player and loads or creates their record.
    ///
    /// Returning players get cached rates and level recomputed from their
    /// boost levels and XP, plus an offline catch-up preview if a mining
    /// run is in progress.
    pub fn open(
        init: SessionInit,
        config: GameConfig,
        deps: Collaborators,
    ) -> Result<Self, SessionError> {
        let now = deps.clock.now_ms();
        let auth = deps.auth.validate(&init.user_id, &init.auth_key)?;

        let (user, offline, credited) = match auth {
            AuthResult {
                valid: true,
                record: Some(stored),
                ..
            } => {
                let user = UserRecord {
                    id: init.user_id.clone(),
                    is_returning_user: true,
                    last_active: now,
                    ..stored
                };
                user.validate()
                    .map_err(|source| SessionError::MalformedRecord {
                        user_id: init.user_id.clone(),
                        source,
                    })?;
                let user = user.with_derived(&config);
                let credited = collect_referrals(deps.store.as_ref(), &user, &config);
                let user = credited.clone().unwrap_or(user);
                let (user, offline) = mining::apply_offline_catch_up(&user, now, &config);
                info!(
                    user_id = %user.id,
                    balance = user.balance,
                    pending = offline.pending_rewards,
                    "loaded returning user"
                );
                (user, offline, credited.is_some())
            }
            AuthResult {
                is_new_user: true, ..
            }
            | AuthResult {
                valid: true,
                record: None,
                ..
            } => {
                let user = create_user(&init, &config, &deps, now);
                info!(user_id = %user.id, referred_by = %user.referred_by, "created new user");
                (user, OfflineReport::default(), false)
            }
            _ => {
                warn!(user_id = %init.user_id, "rejected session: invalid auth key");
                return Err(SessionError::Unauthorized {
                    user_id: init.user_id,
                });
            }
        };

        let writer = CoalescingWriter::spawn(
            deps.store.clone(),
            Duration::from_millis(config.save_debounce_ms),
        );

        if credited {
            writer.write_now(user.clone());
        }

        Ok(Self {
            config,
            user: Mutex::new(user),
            store: deps.store,
            writer,
            feedback: deps.feedback,
            clock: deps.clock,
            offline,
        })
    }

    /// Snapshot of the current record.
    pub fn user(&self) -> UserRecord {
        self.user.lock().clone()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Offline catch-up computed when the session opened.
    pub fn offline_report(&self) -> &OfflineReport {
        &self.offline
    }

    pub fn mining_state(&self) -> MiningState {
        mining::mining_state(&self.user.lock(), self.clock.now_ms())
    }

    /// Live preview of what a claim would pay now.
    pub fn pending_estimate(&self) -> f64 {
        mining::pending_estimate(&self.user.lock(), self.clock.now_ms(), &self.config)
    }

    pub fn start_mining(&self) -> Outcome {
        self.apply("start_mining", Persist::Debounced, |user, now, _| {
            let next = mining::start_mining(user, now)?;
            Ok((next, Outcome::ok("Mining started!")))
        })
    }

    pub fn claim_mining_rewards(&self) -> Outcome {
        self.apply("claim_mining_rewards", Persist::Debounced, |user, now, config| {
            let (next, reward) = mining::claim_mining(user, now, config)?;
            let message = format!("Claimed {} DRX!", format_number(reward.earned));
            Ok((next, Outcome::ok(message).with_reward(reward)))
        })
    }

    pub fn upgrade_boost(&self, boost: BoostType) -> Outcome {
        self.apply("upgrade_boost", Persist::Immediate, |user, now, config| {
            let next = UserRecord {
                last_active: now,
                ..boost::apply_boost_purchase(user, boost, config)?
            };
            Ok((next, Outcome::ok(format!("{} upgraded!", boost.key()))))
        })
    }

    pub fn claim_welcome_bonus(&self) -> Outcome {
        self.apply("claim_welcome_bonus", Persist::Immediate, |user, _, config| {
            let next = claim_welcome_bonus(user, config)?;
            let message = format!("Claimed {} DRX!", config.welcome_bonus);
            Ok((next, Outcome::ok(message)))
        })
    }

    pub fn update_settings(&self, settings: Settings) -> Outcome {
        self.apply("update_settings", Persist::Debounced, |user, _, _| {
            let next = UserRecord {
                settings,
                ..user.clone()
            };
            Ok((next, Outcome::ok("Settings saved")))
        })
    }

    /// Blocks until every record produced so far has had a write attempt.
    pub fn flush(&self) {
        self.writer.flush();
    }

    fn apply<F>(&self, intent: &'static str, persist: Persist, f: F) -> Outcome
    where
        F: FnOnce(&UserRecord, i64, &GameConfig) -> Result<(UserRecord, Outcome), GameError>,
    {
        let (outcome, vibration) = {
            let mut user = self.user.lock();
            let now = self.clock.now_ms();
            let credited = collect_referrals(self.store.as_ref(), &user, &self.config);
            if let Some(credited) = &credited {
                *user = credited.clone();
            }
            match f(&*user, now, &self.config) {
                Ok((next, outcome)) => {
                    debug!(user_id = %next.id, intent, message = %outcome.message, "intent applied");
                    match persist {
                        Persist::Debounced if credited.is_none() => {
                            self.writer.schedule(next.clone())
                        }
                        _ => self.writer.write_now(next.clone()),
                    }
                    *user = next;
                    (outcome, user.settings.vibration)
                }
                Err(rejection) => {
                    debug!(user_id = %user.id, intent, %rejection, "intent rejected");
                    if credited.is_some() {
                        self.writer.write_now(user.clone());
                    }
                    (Outcome::rejected(rejection), user.settings.vibration)
                }
            }
        };

        if vibration {
            match &outcome.rejection {
                None => self.feedback.signal(Signal::Success),
                Some(
                    GameError::ClaimNotReady
                    | GameError::InsufficientBalance { .. }
                    | GameError::MaxLevel,
                ) => self.feedback.signal(Signal::Error),
                Some(GameError::AlreadyMining | GameError::AlreadyClaimed) => {}
            }
        }
        outcome
    }
}

/// Builds a first-session record, applying a referral when the referrer
/// checks out. The record is saved once right away; a failed save is logged
/// and the session continues.
fn create_user(
    init: &SessionInit,
    config: &GameConfig,
    deps: &Collaborators,
    now: i64,
) -> UserRecord {
    let mut user = UserRecord::new(init.user_id.clone(), init.auth_key.clone(), now, config);
    if let Some(first_name) = &init.first_name {
        user.first_name = first_name.clone();
    }
    if let Some(last_name) = &init.last_name {
        user.last_name = last_name.clone();
    }

    if let Some(referral) = &init.referral {
        if referral.referrer_id != init.user_id {
            match deps
                .auth
                .validate(&referral.referrer_id, &referral.referrer_key)
            {
                Ok(AuthResult { valid: true, .. }) => {
                    user.referred_by = referral.referrer_id.clone();
                    if let Err(e) = deps.store.add_referral(&referral.referrer_id, &user.id) {
                        warn!(referrer_id = %referral.referrer_id, error = %e, "failed to record referral");
                    }
                }
                Ok(_) => {
                    debug!(referrer_id = %referral.referrer_id, "ignoring referral with invalid referrer")
                }
                Err(e) => {
                    warn!(referrer_id = %referral.referrer_id, error = %e, "could not validate referrer")
                }
            }
        }
    }

    if let Err(e) = deps.store.save_user(&user.id, &user) {
        warn!(user_id = %user.id, error = %e, "failed to save new user; will retry on next change");
    }
    user
}

/// Credits every referral waiting in the store for `user`. Returns `None`
/// when there was nothing to credit. Drained credits live only in the
/// returned record until the writer persists it.
fn collect_referrals(
    store: &dyn UserStore,
    user: &UserRecord,
    config: &GameConfig,
) -> Option<UserRecord> {
    let referred = match store.take_referrals(&user.id) {
        Ok(referred) => referred,
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "failed to read referral inbox");
            return None;
        }
    };
    if referred.is_empty() {
        return None;
    }
    let credited = referred
        .iter()
        .fold(user.clone(), |acc, _| credit_referral(&acc, config));
    info!(user_id = %user.id, count = referred.len(), "credited referrals");
    Some(credited)
}

impl Drop for GameSession {
    fn drop(&mut self) {
        debug!(user_id = %self.user.get_mut().id, "closing session");
    }
}
