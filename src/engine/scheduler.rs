//! Deferred reconciliation scheduling
//!
//! Each page transition schedules one reconciliation a fixed delay later, so
//! the exit animation can run before the new page is marked active. Tasks are
//! never cancelled. Several can be pending at once under rapid input; that is
//! safe because a reconciliation re-derives the presentation from whatever the
//! cursor holds when it runs.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::debug;

/// Queue of pending reconciliation deadlines
#[derive(Debug, Clone)]
pub struct ReconcileScheduler {
    delay: Duration,
    pending: VecDeque<Instant>,
}

impl ReconcileScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: VecDeque::new(),
        }
    }

    /// Schedule a reconciliation `delay` after `now`; returns its deadline
    pub fn schedule(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        // Deadlines are pushed in order as long as the clock is monotonic
        let position = self
            .pending
            .iter()
            .rposition(|&d| d <= deadline)
            .map_or(0, |i| i + 1);
        self.pending.insert(position, deadline);
        debug!(
            "[SCHEDULER] Reconcile scheduled in {:?} ({} pending)",
            self.delay,
            self.pending.len()
        );
        deadline
    }

    /// Remove and count every task whose deadline is at or before `now`
    pub fn take_due(&mut self, now: Instant) -> usize {
        let mut due = 0;
        while self.pending.front().is_some_and(|&d| d <= now) {
            self.pending.pop_front();
            due += 1;
        }
        due
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.front().copied()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
