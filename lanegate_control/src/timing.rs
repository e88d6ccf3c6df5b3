//! Latched timing values and the peek timing window.
//!
//! The peek cycle is driven by wall-clock polling sampled once per
//! external tick, so its bookkeeping has two latch rules that protect
//! measurements from over-eager polling:
//!
//! - **write-once**: `start_time` and `timeout` accept the first value
//!   recorded in a cycle and ignore all further writes until cleared.
//! - **sticky-nonzero**: `elapsed_time` ignores a write of zero once a
//!   nonzero measurement exists, so a late baseline sample can never
//!   erase a previously observed duration.
//!
//! Both rules are enforced here, at one call site, behind `record` /
//! `clear` operations. There is no bare assignable field.

use std::time::{Duration, Instant};

/// Write-once value: `record` latches the first value, `clear` resets.
#[derive(Debug, Clone, Copy)]
pub struct Latched<T>(Option<T>);

impl<T> Default for Latched<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T: Copy> Latched<T> {
    /// An unset latch.
    pub const fn unset() -> Self {
        Self(None)
    }

    /// Latch `value` if unset; otherwise a no-op.
    pub fn record(&mut self, value: T) {
        if self.0.is_none() {
            self.0 = Some(value);
        }
    }

    /// Return to the unset state.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Current value, if latched.
    #[inline]
    pub fn get(&self) -> Option<T> {
        self.0
    }
}

/// Sticky elapsed-duration latch.
///
/// An unset latch accepts any value, including zero (the per-tick
/// baseline). Once a nonzero duration has been recorded, a write of
/// zero is ignored; nonzero writes keep updating the measurement.
/// `clear` fully resets.
#[derive(Debug, Clone, Copy, Default)]
pub struct StickyElapsed(Option<Duration>);

impl StickyElapsed {
    /// An unset latch.
    pub const fn unset() -> Self {
        Self(None)
    }

    /// Record an elapsed duration, subject to the sticky-nonzero rule.
    pub fn record(&mut self, value: Duration) {
        match self.0 {
            None => self.0 = Some(value),
            Some(_) if !value.is_zero() => self.0 = Some(value),
            Some(_) => {} // zero after a real measurement: ignored
        }
    }

    /// Return to the unset state.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Current measurement, if any.
    #[inline]
    pub fn get(&self) -> Option<Duration> {
        self.0
    }
}

/// One peek timing window (push or at-rest).
///
/// A window is "timed out" iff `elapsed >= timeout` with both present.
/// Windows reset only through [`PeekWindow::reset`], never implicitly
/// by the passage of time.
#[derive(Debug, Default)]
pub struct PeekWindow {
    start: Latched<Instant>,
    elapsed: StickyElapsed,
    timeout: Latched<Duration>,
}

impl PeekWindow {
    /// A fresh, fully unset window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the timeout threshold (write-once per cycle).
    pub fn latch_timeout(&mut self, timeout: Duration) {
        self.timeout.record(timeout);
    }

    /// Latch the window's start instant (write-once per cycle).
    pub fn mark_start(&mut self, now: Instant) {
        self.start.record(now);
    }

    /// The latched start instant, if the window's clock has started.
    #[inline]
    pub fn start(&self) -> Option<Instant> {
        self.start.get()
    }

    /// Record an elapsed duration (sticky-nonzero rule applies).
    pub fn record_elapsed(&mut self, elapsed: Duration) {
        self.elapsed.record(elapsed);
    }

    /// Currently recorded elapsed duration.
    #[inline]
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed.get()
    }

    /// Whether the window has timed out. `false` while either the
    /// elapsed measurement or the threshold is unset.
    pub fn timed_out(&self) -> bool {
        match (self.elapsed.get(), self.timeout.get()) {
            (Some(elapsed), Some(timeout)) => elapsed >= timeout,
            _ => false,
        }
    }

    /// Explicitly reset every field to the unset state.
    pub fn reset(&mut self) {
        self.start.clear();
        self.elapsed.clear();
        self.timeout.clear();
    }
}
