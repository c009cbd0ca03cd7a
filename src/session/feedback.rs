//! Haptic/sound feedback hooks.

use parking_lot::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Success,
    Error,
}

/// Receives fire-and-forget feedback signals.
pub trait Feedback: Send + Sync {
    fn signal(&self, signal: Signal);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn signal(&self, _signal: Signal) {}
}

/// Emits each signal as a debug log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn signal(&self, signal: Signal) {
        debug!(?signal, "feedback");
    }
}

/// Keeps every signal it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    signals: Mutex<Vec<Signal>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().clone()
    }
}

impl Feedback for RecordingFeedback {
    fn signal(&self, signal: Signal) {
        self.signals.lock().push(signal);
    }
}
