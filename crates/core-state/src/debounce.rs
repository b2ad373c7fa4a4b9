//! Single-slot debounce for typing bursts.
//!
//! The first typing edit of a burst parks the pre-edit snapshot here together
//! with a deadline. Further typing inside the window only pushes the deadline
//! out; the parked snapshot is kept, so one undo step rewinds the whole burst.
//! The snapshot is released either when the deadline passes (`poll`) or when a
//! non-typing command needs history to be current (`flush`).
//!
//! Time is injected by the caller, keeping the struct free of clocks and tasks.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::undo::EditSnapshot;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug)]
struct Pending {
    snapshot: EditSnapshot,
    deadline: Instant,
}

#[derive(Debug)]
pub struct HistoryDebounce {
    window: Duration,
    pending: Option<Pending>,
}

impl Default for HistoryDebounce {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl HistoryDebounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm (or re-arm) the timer. `capture` is only invoked when no burst is
    /// in flight, so the parked snapshot is always the pre-burst state.
    pub fn schedule<F>(&mut self, now: Instant, capture: F)
    where
        F: FnOnce() -> EditSnapshot,
    {
        let deadline = now + self.window;
        match &mut self.pending {
            Some(p) => {
                p.deadline = deadline;
                trace!(target: "state.debounce", "deadline_extended");
            }
            None => {
                self.pending = Some(Pending {
                    snapshot: capture(),
                    deadline,
                });
                trace!(target: "state.debounce", window_ms = self.window.as_millis() as u64, "burst_started");
            }
        }
    }

    /// Release the parked snapshot if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<EditSnapshot> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            trace!(target: "state.debounce", "deadline_expired");
            return self.pending.take().map(|p| p.snapshot);
        }
        None
    }

    /// Release the parked snapshot immediately, regardless of deadline.
    pub fn flush(&mut self) -> Option<EditSnapshot> {
        let p = self.pending.take()?;
        trace!(target: "state.debounce", "flushed");
        Some(p.snapshot)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
