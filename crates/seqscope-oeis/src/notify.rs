//! User-visible reporting of remote failures.
//!
//! Remote failures never propagate out of `initialize`; they are handed to a
//! [`Notifier`] so a front end can show them.

use parking_lot::Mutex;
use tracing::warn;

/// Receives non-fatal failure reports.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Reports through `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!("{message}");
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    messages: Mutex<Vec<String>>,
}

impl CollectingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
