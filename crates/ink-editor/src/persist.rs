//! Debounced autosave state machine.
//!
//! Keeps the backing store eventually consistent without persisting every
//! micro-mutation: each committed change restarts a quiet-period deadline,
//! and only when the deadline passes untouched is one save issued with the
//! state current at that moment. The clock is injected (millisecond
//! timestamps from the host, `performance.now()` in the browser) because
//! the engine runs on a single-threaded UI event loop with no timers of
//! its own; cancellation on document switch is an explicit call, not
//! implicit cleanup.
//!
//! Failures never roll back local state. A failed save leaves the
//! collection untouched and the next mutation's cycle resends the latest
//! full state; there is no retry backoff.

/// Quiet period before an edit is pushed to the backing store.
pub const DEBOUNCE_MS: f64 = 1_000.0;

/// Observable persistence state, surfaced to the UI status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing dirty, nothing in flight.
    Idle,
    /// Dirty, waiting out the quiet period.
    Pending,
    /// A save has been issued and not yet acknowledged.
    Saving,
    /// Last save succeeded.
    Saved,
    /// Last save failed; local edits are preserved.
    Failed,
}

impl SaveStatus {
    /// Wire name used by the bridge.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Saving => "saving",
            Self::Saved => "saved",
            Self::Failed => "failed",
        }
    }
}

pub struct Autosave {
    delay_ms: f64,
    deadline: Option<f64>,
    status: SaveStatus,
}

impl Autosave {
    pub fn new() -> Self {
        Self::with_delay(DEBOUNCE_MS)
    }

    pub fn with_delay(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            deadline: None,
            status: SaveStatus::Idle,
        }
    }

    /// A committed change happened: restart the quiet period (debounce,
    /// not throttle; only the final state of a burst is persisted).
    pub fn mark_dirty(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.delay_ms);
        if self.status != SaveStatus::Saving {
            self.status = SaveStatus::Pending;
        }
    }

    /// Check the deadline. Returns `true` exactly when the caller should
    /// issue a save with the current collection. At most one save is in
    /// flight: while one is unacknowledged the deadline is left standing.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.status == SaveStatus::Saving {
            return false;
        }
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                self.status = SaveStatus::Saving;
                true
            }
            _ => false,
        }
    }

    /// Manual save: bypass the quiet period and issue immediately. If a
    /// save is already in flight, the deadline is pulled up so the next
    /// acknowledgement is followed by an immediate resend.
    pub fn flush(&mut self, now_ms: f64) -> bool {
        if self.status == SaveStatus::Saving {
            self.deadline = Some(now_ms);
            return false;
        }
        self.deadline = None;
        self.status = SaveStatus::Saving;
        true
    }

    /// The host acknowledged the in-flight save.
    pub fn complete(&mut self, ok: bool) {
        if self.status == SaveStatus::Saving {
            self.status = if ok { SaveStatus::Saved } else { SaveStatus::Failed };
        }
    }

    /// Drop any pending deadline, e.g. on unmount or document switch, so a
    /// stale collection is never persisted against the wrong document.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.status = SaveStatus::Idle;
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Whether a deadline is armed.
    pub fn is_dirty(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_period_must_elapse() {
        let mut autosave = Autosave::with_delay(1000.0);
        autosave.mark_dirty(0.0);

        assert!(!autosave.poll(500.0));
        assert!(!autosave.poll(999.0));
        assert!(autosave.poll(1000.0));
    }

    #[test]
    fn burst_of_edits_fires_once() {
        let mut autosave = Autosave::with_delay(1000.0);
        for t in [0.0, 200.0, 400.0, 600.0] {
            autosave.mark_dirty(t);
            assert!(!autosave.poll(t + 50.0));
        }

        // Deadline restarted from the last edit
        assert!(!autosave.poll(1550.0));
        assert!(autosave.poll(1600.0));
        assert!(!autosave.poll(1700.0), "fires exactly once");
    }

    #[test]
    fn no_second_save_while_in_flight() {
        let mut autosave = Autosave::with_delay(1000.0);
        autosave.mark_dirty(0.0);
        assert!(autosave.poll(1000.0));
        assert_eq!(autosave.status(), SaveStatus::Saving);

        autosave.mark_dirty(1100.0);
        assert!(!autosave.poll(2200.0), "in-flight save blocks the next");

        autosave.complete(true);
        assert!(autosave.poll(2200.0), "queued edit saves after ack");
    }

    #[test]
    fn failure_keeps_status_and_allows_retry_on_next_edit() {
        let mut autosave = Autosave::with_delay(1000.0);
        autosave.mark_dirty(0.0);
        autosave.poll(1000.0);
        autosave.complete(false);
        assert_eq!(autosave.status(), SaveStatus::Failed);

        autosave.mark_dirty(2000.0);
        assert_eq!(autosave.status(), SaveStatus::Pending);
        assert!(autosave.poll(3000.0));
    }

    #[test]
    fn flush_bypasses_the_deadline() {
        let mut autosave = Autosave::with_delay(1000.0);
        autosave.mark_dirty(0.0);
        assert!(autosave.flush(10.0));
        assert_eq!(autosave.status(), SaveStatus::Saving);
        assert!(!autosave.poll(5000.0), "deadline consumed by the flush");
    }

    #[test]
    fn flush_during_inflight_save_queues_an_immediate_resend() {
        let mut autosave = Autosave::with_delay(1000.0);
        autosave.mark_dirty(0.0);
        autosave.poll(1000.0);

        assert!(!autosave.flush(1200.0));
        autosave.complete(true);
        assert!(autosave.poll(1201.0));
    }

    #[test]
    fn cancel_disarms_the_deadline() {
        let mut autosave = Autosave::with_delay(1000.0);
        autosave.mark_dirty(0.0);
        autosave.cancel();

        assert!(!autosave.poll(5000.0));
        assert_eq!(autosave.status(), SaveStatus::Idle);
    }

    #[test]
    fn spurious_completion_is_ignored() {
        let mut autosave = Autosave::new();
        autosave.complete(true);
        assert_eq!(autosave.status(), SaveStatus::Idle);
    }
}
