//! Debounced background persistence.
//!
//! Records are handed to a writer thread over a channel. Scheduled records
//! coalesce: only the latest one is written, after `debounce` passes with no
//! newer record. Failed writes stay pending and are retried a few times with
//! jitter before being dropped; the in-memory record remains authoritative
//! either way.

use crate::core::constants::{SAVE_MAX_RETRIES, SAVE_RETRY_JITTER_MS};
use crate::core::user::UserRecord;
use crate::store::UserStore;
use crossbeam_channel::{bounded, unbounded, RecvTimeoutError, Sender};
use rand::Rng;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, warn};

enum Command {
    /// Write after the quiet period
    Schedule(UserRecord),
    /// Write as soon as the thread sees it
    WriteNow(UserRecord),
    Flush(Sender<()>),
}

pub struct CoalescingWriter {
    tx: Option<Sender<Command>>,
    handle: Option<JoinHandle<()>>,
}

impl CoalescingWriter {
    pub fn spawn(store: Arc<dyn UserStore>, debounce: Duration) -> Self {
        let (tx, rx) = unbounded::<Command>();
        let handle = thread::Builder::new()
            .name("drx-save-writer".to_string())
            .spawn(move || {
                let mut pending = Pending::default();
                loop {
                    let received = match pending.wait(debounce) {
                        Some(timeout) => rx.recv_timeout(timeout),
                        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    };
                    match received {
                        Ok(Command::Schedule(record)) => pending.replace(record),
                        Ok(Command::WriteNow(record)) => {
                            pending.replace(record);
                            pending.write(store.as_ref());
                        }
                        Ok(Command::Flush(ack)) => {
                            pending.write(store.as_ref());
                            let _ = ack.send(());
                        }
                        Err(RecvTimeoutError::Timeout) => pending.write(store.as_ref()),
                        Err(RecvTimeoutError::Disconnected) => {
                            pending.write(store.as_ref());
                            break;
                        }
                    }
                }
            })
            .ok();

        if handle.is_none() {
            error!("failed to start save writer thread; saves are disabled");
        }

        Self {
            tx: handle.as_ref().map(|_| tx),
            handle,
        }
    }

    /// Queues a record for a debounced write.
    pub fn schedule(&self, record: UserRecord) {
        self.send(Command::Schedule(record));
    }

    /// Queues a record to be written without waiting for the quiet period.
    /// Does not block the caller.
    pub fn write_now(&self, record: UserRecord) {
        self.send(Command::WriteNow(record));
    }

    /// Blocks until every record queued so far has had a write attempt.
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = bounded(1);
        self.send(Command::Flush(ack_tx));
        let _ = ack_rx.recv();
    }

    fn send(&self, command: Command) {
        if let Some(tx) = &self.tx {
            if tx.send(command).is_err() {
                warn!("save writer has stopped; dropping write");
            }
        }
    }
}

impl Drop for CoalescingWriter {
    fn drop(&mut self) {
        // Closing the channel makes the thread write its last record and exit
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[derive(Default)]
struct Pending {
    record: Option<UserRecord>,
    failed_attempts: u32,
}

impl Pending {
    fn replace(&mut self, record: UserRecord) {
        self.record = Some(record);
        self.failed_attempts = 0;
    }

    /// How long to wait for more commands before writing, or `None` when
    /// there is nothing to write.
    fn wait(&self, debounce: Duration) -> Option<Duration> {
        self.record.as_ref()?;
        if self.failed_attempts == 0 {
            return Some(debounce);
        }
        let jitter = rand::thread_rng().gen_range(0..=SAVE_RETRY_JITTER_MS);
        Some(debounce + Duration::from_millis(jitter))
    }

    fn write(&mut self, store: &dyn UserStore) {
        let Some(record) = self.record.take() else {
            return;
        };
        match store.save_user(&record.id, &record) {
            Ok(()) => {
                debug!(user_id = %record.id, "saved user record");
                self.failed_attempts = 0;
            }
            Err(e) => {
                self.failed_attempts += 1;
                if self.failed_attempts < SAVE_MAX_RETRIES {
                    warn!(
                        user_id = %record.id,
                        attempt = self.failed_attempts,
                        error = %e,
                        "failed to save user record; will retry"
                    );
                    self.record = Some(record);
                } else {
                    error!(
                        user_id = %record.id,
                        error = %e,
                        "giving up on saving user record until the next change"
                    );
                    self.failed_attempts = 0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::store::MemoryStore;

    fn record(id: &str, balance: f64) -> UserRecord {
        let mut user = UserRecord::new(id, "k", 0, &GameConfig::default());
        user.balance = balance;
        user
    }

    #[test]
    fn test_rapid_schedules_coalesce_into_one_write() {
        let store = Arc::new(MemoryStore::new());
        let writer = CoalescingWriter::spawn(store.clone(), Duration::from_secs(60));

        for i in 0..50 {
            writer.schedule(record("w", i as f64));
        }
        writer.flush();

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.get("w").unwrap().balance, 49.0);
    }

    #[test]
    fn test_debounce_writes_after_quiet_period() {
        let store = Arc::new(MemoryStore::new());
        let writer = CoalescingWriter::spawn(store.clone(), Duration::from_millis(20));

        writer.schedule(record("q", 5.0));
        let mut waited = 0;
        while store.save_count() == 0 && waited < 200 {
            thread::sleep(Duration::from_millis(10));
            waited += 1;
        }
        assert_eq!(store.save_count(), 1);
        drop(writer);
    }

    #[test]
    fn test_write_now_does_not_wait_for_debounce() {
        let store = Arc::new(MemoryStore::new());
        let writer = CoalescingWriter::spawn(store.clone(), Duration::from_secs(3600));

        writer.write_now(record("n", 1.0));
        let mut waited = 0;
        while store.save_count() == 0 && waited < 200 {
            thread::sleep(Duration::from_millis(10));
            waited += 1;
        }
        assert_eq!(store.get("n").unwrap().balance, 1.0);
        drop(writer);
    }

    #[test]
    fn test_drop_writes_last_record() {
        let store = Arc::new(MemoryStore::new());
        {
            let writer = CoalescingWriter::spawn(store.clone(), Duration::from_secs(3600));
            writer.schedule(record("d", 7.0));
        }
        assert_eq!(store.get("d").unwrap().balance, 7.0);
    }

    #[test]
    fn test_failed_write_is_retried() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_saves(true);
        let writer = CoalescingWriter::spawn(store.clone(), Duration::from_secs(3600));

        writer.schedule(record("r", 3.0));
        writer.flush();
        assert!(store.get("r").is_none());

        store.set_fail_saves(false);
        writer.flush();
        assert_eq!(store.get("r").unwrap().balance, 3.0);
    }
}
