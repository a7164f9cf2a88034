//! Live-search debounce timer.
//!
//! Every keystroke replaces the pending search and pushes its deadline
//! out; the search fires once the deadline passes with no further input.
//! The timer is a plain deadline checked by the event loop, so at most one
//! is ever live and stale triggers are dropped rather than queued.

use std::time::{Duration, Instant};

/// Text waiting for its quiet period to end.
#[derive(Debug, Clone)]
struct Pending {
    text: String,
    deadline: Instant,
}

/// Last-write-wins debounce timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Quiet period after the last input.
    delay: Duration,
    /// Minimum trimmed length (in characters) for the input to fire.
    min_len: usize,
    /// Currently armed input, if any.
    pending: Option<Pending>,
}

impl Debouncer {
    /// Creates an idle timer.
    #[must_use]
    pub const fn new(delay: Duration, min_len: usize) -> Self {
        Self {
            delay,
            min_len,
            pending: None,
        }
    }

    /// Records new input at `now`, restarting the timer.
    pub fn input(&mut self, text: &str, now: Instant) {
        let deadline = now.checked_add(self.delay).unwrap_or(now);
        self.pending = Some(Pending {
            text: String::from(text),
            deadline,
        });
    }

    /// Drops any armed input.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether input is waiting for its deadline.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the text to search for once its deadline has passed.
    ///
    /// An expired input shorter than the minimum length is discarded and
    /// yields `None`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref().is_none_or(|p| now < p.deadline) {
            return None;
        }
        let pending = self.pending.take()?;
        (pending.text.trim().chars().count() >= self.min_len).then_some(pending.text)
    }
}
