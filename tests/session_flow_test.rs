//! Integration test: Session intents
//!
//! Drives a full session through mining, claiming, boost purchases and the
//! welcome bonus against an in-memory store and a manual clock.

use drx_miner::boost::{get_boost_cost, BoostType};
use drx_miner::core::{GameError, Settings};
use drx_miner::mining::{MiningState, RewardKind};
use drx_miner::session::{
    Collaborators, GameSession, ManualClock, RecordingFeedback, SessionInit, Signal,
};
use drx_miner::store::MemoryStore;
use drx_miner::{GameConfig, UserRecord};
use std::sync::Arc;

const T0: i64 = 1_700_000_000_000;

struct Harness {
    store: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
    feedback: Arc<RecordingFeedback>,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            clock: Arc::new(ManualClock::new(T0)),
            feedback: Arc::new(RecordingFeedback::new()),
        }
    }

    fn with_user(user: UserRecord) -> Self {
        Self {
            store: Arc::new(MemoryStore::with_records([user])),
            ..Self::new()
        }
    }

    fn open(&self, user_id: &str, key: &str) -> GameSession {
        self.open_with(SessionInit::new(user_id, key), GameConfig::default())
    }

    fn open_with(&self, init: SessionInit, config: GameConfig) -> GameSession {
        let deps = Collaborators {
            store: self.store.clone(),
            auth: self.store.clone(),
            feedback: self.feedback.clone(),
            clock: self.clock.clone(),
        };
        GameSession::open(init, config, deps).expect("session should open")
    }
}

/// Returning user mining at 10 DRX/s with a 30 minute cooldown
fn fast_miner() -> UserRecord {
    let config = GameConfig {
        base_mining_rate: 10.0,
        ..GameConfig::default()
    };
    UserRecord::new("miner", "key", T0, &config)
}

fn fast_config() -> GameConfig {
    GameConfig {
        base_mining_rate: 10.0,
        ..GameConfig::default()
    }
}

#[test]
fn test_full_mining_cycle() {
    let harness = Harness::with_user(fast_miner());
    let session = harness.open_with(SessionInit::new("miner", "key"), fast_config());

    let started = session.start_mining();
    assert!(started.success);
    assert_eq!(started.message, "Mining started!");
    assert!(session.user().is_mining);
    assert_eq!(session.user().mining_start_time, T0);

    harness.clock.advance_secs(900);
    let early = session.claim_mining_rewards();
    assert!(!early.success);
    assert_eq!(early.rejection, Some(GameError::ClaimNotReady));
    assert_eq!(early.message, "Mining time not reached!");
    assert_eq!(
        session.mining_state(),
        MiningState::Mining {
            remaining_seconds: 900
        }
    );

    harness.clock.advance_secs(900);
    assert_eq!(session.mining_state(), MiningState::ClaimReady);
    let claimed = session.claim_mining_rewards();
    assert!(claimed.success);
    let reward = claimed.reward.expect("claim should carry a reward");
    assert_eq!(reward.earned, 18_000.0);
    assert_eq!(reward.kind, RewardKind::Drx);
    assert_eq!(claimed.message, "Claimed 18.0K DRX!");

    let user = session.user();
    assert_eq!(user.balance, 18_000.0);
    assert_eq!(user.total_earned, 18_000.0);
    assert!(!user.is_mining);
    assert_eq!(user.mining_start_time, 0);
    assert_eq!(user.last_claim_time, T0 + 1_800_000);
    assert_eq!(session.mining_state(), MiningState::Idle);
}

#[test]
fn test_second_start_is_rejected_without_change() {
    let harness = Harness::new();
    let session = harness.open("p", "k");

    assert!(session.start_mining().success);
    let before = session.user();
    harness.clock.advance_secs(60);

    let again = session.start_mining();
    assert!(!again.success);
    assert_eq!(again.message, "Already mining!");
    assert_eq!(session.user(), before);
}

#[test]
fn test_boost_purchase_scenarios() {
    let mut user = UserRecord::new("buyer", "k", T0, &GameConfig::default());
    user.balance = 300.0;
    let harness = Harness::with_user(user);
    let session = harness.open("buyer", "k");

    let first = session.upgrade_boost(BoostType::MiningSpeed);
    assert!(first.success);
    assert_eq!(first.message, "miningSpeed upgraded!");
    assert_eq!(session.user().balance, 200.0);
    assert_eq!(session.user().boosts.mining_speed_level, 2);

    // Level 2 costs 150, only 200 left
    let second = session.upgrade_boost(BoostType::MiningSpeed);
    assert!(second.success);
    assert_eq!(session.user().balance, 50.0);

    let before = session.user();
    let third = session.upgrade_boost(BoostType::MiningSpeed);
    assert!(!third.success);
    assert_eq!(
        third.rejection,
        Some(GameError::InsufficientBalance {
            cost: 225.0,
            balance: 50.0
        })
    );
    assert_eq!(third.message, "Need 225 DRX");
    assert_eq!(session.user(), before);
}

#[test]
fn test_boost_purchase_recomputes_rates() {
    let config = GameConfig::default();
    let mut user = UserRecord::new("rates", "k", T0, &config);
    user.balance = 100_000.0;
    let harness = Harness::with_user(user);
    let session = harness.open("rates", "k");

    session.upgrade_boost(BoostType::MiningRate);
    session.upgrade_boost(BoostType::MiningSpeed);
    session.upgrade_boost(BoostType::ClaimTime);

    let user = session.user();
    let expected_rate =
        config.base_mining_rate * config.mining_rate_multiplier * config.mining_speed_multiplier;
    assert!((user.mining_rate - expected_rate).abs() < 1e-12);
    assert_eq!(user.min_claim_time, 1500);

    let spent = get_boost_cost(BoostType::MiningRate, 1, &config)
        + get_boost_cost(BoostType::MiningSpeed, 1, &config)
        + get_boost_cost(BoostType::ClaimTime, 1, &config);
    assert_eq!(user.balance, 100_000.0 - spent);
}

#[test]
fn test_welcome_bonus_is_one_shot() {
    let harness = Harness::new();
    let session = harness.open("newbie", "k");

    let first = session.claim_welcome_bonus();
    assert!(first.success);
    assert_eq!(first.message, "Claimed 1000 DRX!");
    assert_eq!(session.user().balance, 1000.0);
    assert!(session.user().bonus_claimed);

    let second = session.claim_welcome_bonus();
    assert!(!second.success);
    assert_eq!(second.rejection, Some(GameError::AlreadyClaimed));
    assert_eq!(session.user().balance, 1000.0);
}

#[test]
fn test_feedback_signals() {
    let harness = Harness::new();
    let session = harness.open("fb", "k");

    session.start_mining(); // success
    session.claim_mining_rewards(); // too early: error
    session.start_mining(); // already mining: silent
    session.upgrade_boost(BoostType::MiningRate); // broke: error

    assert_eq!(
        harness.feedback.signals(),
        vec![Signal::Success, Signal::Error, Signal::Error]
    );
}

#[test]
fn test_vibration_off_silences_feedback() {
    let harness = Harness::new();
    let session = harness.open("quiet", "k");

    let settings = Settings {
        vibration: false,
        ..Settings::default()
    };
    assert!(session.update_settings(settings).success);
    let after_settings = harness.feedback.signals().len();

    session.start_mining();
    session.claim_mining_rewards();
    assert_eq!(harness.feedback.signals().len(), after_settings);
}

#[test]
fn test_mutations_reach_the_store() {
    let harness = Harness::new();
    let session = harness.open("saver", "k");

    session.claim_welcome_bonus();
    session.start_mining();
    session.flush();

    let stored = harness.store.get("saver").expect("record persisted");
    assert_eq!(stored, session.user());
    assert!(stored.is_mining);
    assert_eq!(stored.balance, 1000.0);
}

#[test]
fn test_persistence_failure_keeps_in_memory_state() {
    let harness = Harness::new();
    let session = harness.open("flaky", "k");
    harness.store.set_fail_saves(true);

    assert!(session.claim_welcome_bonus().success);
    session.flush();

    assert_eq!(session.user().balance, 1000.0);
    assert!(!harness.store.get("flaky").unwrap().bonus_claimed);

    harness.store.set_fail_saves(false);
    session.flush();
    assert!(harness.store.get("flaky").unwrap().bonus_claimed);
}

#[test]
fn test_drop_flushes_last_record() {
    let harness = Harness::new();
    {
        let session = harness.open("closer", "k");
        session.start_mining();
    }
    assert!(harness.store.get("closer").unwrap().is_mining);
}
