//! Actuator controller: phase triggers and the peek timing cycle.
//!
//! Owns the actuator's physical phase and the push/rest/pull/peek
//! timing state machine. This is the only writer of physical outputs
//! in the whole system.
//!
//! `peek()` is one cooperative step of the autonomous cycle and is
//! meant to be invoked once per external tick, never looped
//! internally:
//!
//! 1. push for `push_timeout` seconds,
//! 2. rest for `at_rest_timeout` seconds,
//! 3. pull back and disable further autonomous pushing.
//!
//! Timing correctness depends on the external engine ticking at a
//! roughly uniform, sufficiently high frequency. A missed tick
//! under-reports elapsed time; that is an accepted tradeoff of the
//! polling model, not something to patch with background timers.

use crate::timing::PeekWindow;
use lanegate_common::actuator::ActuatorPhase;
use lanegate_common::config::LaneConfig;
use lanegate_common::error::ActuatorError;
use lanegate_common::hal::{Clock, LineDriver, MonotonicClock};
use std::time::Duration;
use tracing::{debug, trace};

/// Linear actuator controller.
///
/// Exclusively owns the [`ActuatorPhase`] and both [`PeekWindow`]s.
/// Every phase change goes through the guarded trigger path, which
/// never issues a redundant line write and always passes through the
/// neutral (both-low) signal between opposing directions.
pub struct ActuatorController {
    driver: Box<dyn LineDriver>,
    clock: Box<dyn Clock>,
    phase: ActuatorPhase,
    can_push: bool,
    push_window: PeekWindow,
    at_rest_window: PeekWindow,
    push_timeout: Duration,
    at_rest_timeout: Duration,
    pull_recovery: Duration,
}

impl ActuatorController {
    /// Create a controller over the given output transport, using the
    /// real monotonic clock.
    pub fn new(driver: Box<dyn LineDriver>, config: &LaneConfig) -> Self {
        Self::with_clock(driver, Box::new(MonotonicClock), config)
    }

    /// Create a controller with an explicit clock (sim/test wiring).
    pub fn with_clock(
        driver: Box<dyn LineDriver>,
        clock: Box<dyn Clock>,
        config: &LaneConfig,
    ) -> Self {
        Self {
            driver,
            clock,
            phase: ActuatorPhase::AtRest,
            can_push: true,
            push_window: PeekWindow::new(),
            at_rest_window: PeekWindow::new(),
            push_timeout: config.push_timeout(),
            at_rest_timeout: config.at_rest_timeout(),
            pull_recovery: config.pull_recovery(),
        }
    }

    /// Current physical phase.
    #[inline]
    pub fn phase(&self) -> ActuatorPhase {
        self.phase
    }

    /// Whether the peek cycle is still allowed to push autonomously.
    #[inline]
    pub fn can_push(&self) -> bool {
        self.can_push
    }

    /// Write the line levels for `target` to the transport.
    ///
    /// The phase field is updated only after both writes succeed, so a
    /// failed write leaves the recorded phase at its pre-call value.
    fn trigger(&mut self, target: ActuatorPhase) -> Result<(), ActuatorError> {
        if self.phase == target {
            trace!("already {target:?}, no write");
            return Ok(());
        }
        for (line, level) in target.line_levels() {
            self.driver.set_line(line, level)?;
        }
        debug!("actuator {:?} -> {:?}", self.phase, target);
        self.phase = target;
        Ok(())
    }

    /// Stop actuator motion: drive both lines low.
    ///
    /// A no-op when already at rest; never issues a redundant write.
    pub fn rest(&mut self) -> Result<(), ActuatorError> {
        self.trigger(ActuatorPhase::AtRest)
    }

    /// Drive the actuator into the lane.
    ///
    /// A no-op when already pushing. Otherwise forces the outputs
    /// through the neutral state first so a direct pull-to-push signal
    /// transition can never energize both directions at once.
    pub fn push(&mut self) -> Result<(), ActuatorError> {
        if self.phase == ActuatorPhase::Pushing {
            return Ok(());
        }
        self.rest()?;
        self.trigger(ActuatorPhase::Pushing)
    }

    /// Retract the actuator out of the lane.
    ///
    /// Clears both peek windows and re-enables autonomous pushing for
    /// the next cycle. When `block` is true the call additionally
    /// stalls for the configured recovery duration after the
    /// transition - a manual-recovery affordance, and the only place
    /// in the system where true blocking is permitted. The autonomous
    /// `peek()` path always passes `block = false`.
    pub fn pull(&mut self, block: bool) -> Result<(), ActuatorError> {
        self.push_window.reset();
        self.at_rest_window.reset();
        self.can_push = true;
        if self.phase != ActuatorPhase::Pulling {
            self.rest()?;
            self.trigger(ActuatorPhase::Pulling)?;
        }
        if block {
            debug!("blocking pull: stalling {:?} for recovery", self.pull_recovery);
            std::thread::sleep(self.pull_recovery);
        }
        Ok(())
    }

    /// One cooperative step of the autonomous push/rest/pull cycle.
    ///
    /// Exactly one branch executes per call, in priority order
    /// pull > rest > push. Returns `true` when the pull branch ran,
    /// i.e. the cycle completed.
    pub fn peek(&mut self) -> Result<bool, ActuatorError> {
        // Latch thresholds and zero baselines; both are no-ops once a
        // real value is in place for this cycle.
        self.push_window.latch_timeout(self.push_timeout);
        self.push_window.record_elapsed(Duration::ZERO);
        self.at_rest_window.latch_timeout(self.at_rest_timeout);
        self.at_rest_window.record_elapsed(Duration::ZERO);

        let push_timed_out = self.push_window.timed_out();
        let at_rest_timed_out = self.at_rest_window.timed_out();

        if at_rest_timed_out {
            self.pull(false)?;
            self.can_push = false;
            debug!("peek cycle complete, autonomous push disabled");
            return Ok(true);
        } else if push_timed_out {
            self.at_rest_window.mark_start(self.clock.now());
            self.rest()?;
            if let Some(start) = self.at_rest_window.start() {
                self.at_rest_window
                    .record_elapsed(self.clock.now().saturating_duration_since(start));
            }
        } else if self.can_push {
            self.push_window.mark_start(self.clock.now());
            self.push()?;
            if let Some(start) = self.push_window.start() {
                self.push_window
                    .record_elapsed(self.clock.now().saturating_duration_since(start));
            }
        }
        Ok(false)
    }

    /// Return the actuator to the canonical safe position.
    ///
    /// Pulls back (clearing the windows and re-enabling pushing), then
    /// de-energizes both lines, leaving the phase at rest.
    pub fn reset(&mut self) -> Result<(), ActuatorError> {
        self.pull(false)?;
        self.rest()
    }
}

impl std::fmt::Debug for ActuatorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActuatorController")
            .field("phase", &self.phase)
            .field("can_push", &self.can_push)
            .field("push_window", &self.push_window)
            .field("at_rest_window", &self.at_rest_window)
            .finish_non_exhaustive()
    }
}
