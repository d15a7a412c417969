//! Recompute trigger coalescing and response ordering.
//!
//! Three trigger classes: structural changes fire immediately, fine-grained
//! parameter edits arm one shared debounce deadline, and forced refreshes
//! fire immediately with the cache-bypass flag set. The scheduler never
//! sleeps — the event loop polls [`RecomputeScheduler::due`] with the
//! current `Instant`, which keeps tests deterministic.
//!
//! Ordering: every issued request carries a monotonically increasing
//! sequence number. Responses are admitted by comparing against the most
//! recently issued sequence, not by cancelling in-flight work — a slow
//! early response can never clobber a faster later one.

use std::time::{Duration, Instant};

/// Fixed debounce delay for fine-grained parameter edits.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// A granted recompute: the sequence number to tag the request with, plus
/// the cache-bypass flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub force_refresh: bool,
}

#[derive(Debug)]
pub struct RecomputeScheduler {
    debounce: Duration,
    deadline: Option<Instant>,
    next_seq: u64,
    last_issued: u64,
}

impl Default for RecomputeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RecomputeScheduler {
    pub fn new() -> Self {
        Self::with_debounce(DEBOUNCE_DELAY)
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
            next_seq: 1,
            last_issued: 0,
        }
    }

    /// Structural change (selection, date range, ROC window, thresholds):
    /// fire immediately, dropping any pending debounced edit — the full
    /// current state rides along with the immediate request anyway.
    pub fn structural(&mut self) -> Ticket {
        self.deadline = None;
        self.issue(false)
    }

    /// Explicit user refresh: like structural, with the cache-bypass flag.
    pub fn forced(&mut self) -> Ticket {
        self.deadline = None;
        self.issue(true)
    }

    /// Fine-grained parameter edit: arm (or re-arm) the shared debounce
    /// deadline. Rapid edits coalesce; only the deadline of the latest
    /// edit survives.
    pub fn parameter_edited(&mut self, now: Instant) {
        self.deadline = Some(now + self.debounce);
    }

    /// Event-loop poll: fires at most once when the armed deadline passes.
    pub fn due(&mut self, now: Instant) -> Option<Ticket> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(self.issue(false))
            }
            _ => None,
        }
    }

    /// True while a debounced edit is waiting to fire.
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop an armed deadline without firing (teardown path, so a timer
    /// never fires against unmounted state).
    pub fn cancel_pending(&mut self) {
        self.deadline = None;
    }

    /// Latest-wins admission: only the response tagged with the most
    /// recently issued sequence may be applied; anything older is stale.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.last_issued
    }

    /// Sequence of the most recently issued request (0 if none yet).
    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    fn issue(&mut self, force_refresh: bool) -> Ticket {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.last_issued = seq;
        Ticket { seq, force_refresh }
    }
}
