//! Restart-storm detection: a sliding-window counter of recent restarts.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::time::Duration;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

// Layer 3: Internal module imports
// (none)

/// A bounded ordered sequence of restart timestamps, used to detect
/// restart storms.
///
/// Every entry is one restart attempt. After each append, any timestamp
/// older than `now - window_seconds` is purged. `RestartLedger` wraps its
/// history in a [`parking_lot::Mutex`] rather than participating in the
/// supervisor's own `tokio::sync::Mutex` state lock: the ledger's own
/// bookkeeping never holds its lock across an `.await`, so a blocking mutex
/// is the right tool (§5 concurrency model).
///
/// # Ledger accounting
///
/// [`RestartLedger::exceeded`] appends a timestamp on *every* call,
/// including calls that ultimately conclude no restart was warranted. This
/// mirrors the reference implementation's budget accounting exactly; it is
/// arguably a bug (a supervisor with an eligible-but-no-op restart type
/// still burns budget), but behavioral parity is preserved deliberately
/// rather than silently fixed (see DESIGN.md).
#[derive(Debug)]
pub struct RestartLedger {
    max_restarts: u32,
    window: Duration,
    history: Mutex<VecDeque<DateTime<Utc>>>,
}

impl RestartLedger {
    /// Creates a new ledger with the given budget and sliding window.
    pub fn new(max_restarts: u32, window: Duration) -> Self {
        Self {
            max_restarts,
            window,
            history: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends `now` to the history, purges expired entries, and returns
    /// whether the purged sequence length exceeds `max_restarts`.
    pub fn exceeded(&self) -> bool {
        let mut history = self.history.lock();
        history.push_back(Utc::now());
        self.purge_locked(&mut history);
        history.len() > self.max_restarts as usize
    }

    /// Returns the number of non-purged restarts recorded since the last
    /// reset, without appending a new entry.
    pub fn current_restart_count(&self) -> u32 {
        let mut history = self.history.lock();
        self.purge_locked(&mut history);
        history.len() as u32
    }

    /// Clears the restart history. Called on supervisor stop (§4.3).
    pub fn reset(&self) {
        self.history.lock().clear();
    }

    /// Width of the sliding window this ledger enforces.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The configured restart budget.
    pub fn max_restarts(&self) -> u32 {
        self.max_restarts
    }

    fn purge_locked(&self, history: &mut VecDeque<DateTime<Utc>>) {
        let Ok(chrono_window) = chrono::Duration::from_std(self.window) else {
            return;
        };
        let cutoff = Utc::now() - chrono_window;
        while let Some(&oldest) = history.front() {
            if oldest < cutoff {
                history.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fresh_ledger_is_not_exceeded() {
        let ledger = RestartLedger::new(2, Duration::from_secs(5));
        assert!(!ledger.exceeded());
    }

    #[test]
    fn exceeded_after_budget_is_spent() {
        let ledger = RestartLedger::new(2, Duration::from_secs(5));
        assert!(!ledger.exceeded());
        assert!(!ledger.exceeded());
        assert!(ledger.exceeded());
    }

    #[test]
    fn reset_clears_history() {
        let ledger = RestartLedger::new(1, Duration::from_secs(5));
        assert!(!ledger.exceeded());
        assert!(ledger.exceeded());
        ledger.reset();
        assert_eq!(ledger.current_restart_count(), 0);
        assert!(!ledger.exceeded());
    }

    #[test]
    fn entries_expire_outside_window() {
        let ledger = RestartLedger::new(1, Duration::from_millis(50));
        assert!(!ledger.exceeded());
        thread::sleep(Duration::from_millis(80));
        assert_eq!(ledger.current_restart_count(), 0);
        assert!(!ledger.exceeded());
    }

    #[test]
    fn current_restart_count_does_not_append() {
        let ledger = RestartLedger::new(5, Duration::from_secs(5));
        ledger.exceeded();
        let count_before = ledger.current_restart_count();
        let count_after = ledger.current_restart_count();
        assert_eq!(count_before, count_after);
    }
}
