//! Collaborator traits for the lanegate control core.
//!
//! This module defines the seams between the control core and its
//! external collaborators:
//! - [`LineDriver`] - physical output transport for the actuator lines
//! - [`SubjectLocator`] - opaque "is the subject inside the lane?" query
//! - [`EventEngine`] / [`EventSink`] / [`TickHandler`] - the external
//!   timer/event engine registration contract
//! - [`Clock`] - monotonic time source, pluggable for simulation
//!
//! The whole system is single-threaded and cooperative: one logical
//! thread of control advances everything one tick at a time, so none of
//! these traits require `Send` or `Sync`.

use crate::error::{DriverError, EngineError, LaneError, SensorError};
use crate::lane::{LaneEvent, LaneStateId, Trigger};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Default event strength used when an entry callback fires an event.
pub const EVENT_STRENGTH_FULL: u8 = 255;

// ─── Output Transport ───────────────────────────────────────────────

/// Physical output transport for the two actuator lines.
///
/// Implementations must treat each write as immediate and synchronous.
/// A failed write is fatal for the in-progress lane cycle; no retry is
/// attempted by any caller.
pub trait LineDriver {
    /// Drive one output line to the given level.
    fn set_line(
        &mut self,
        line: crate::actuator::Line,
        level: crate::actuator::Level,
    ) -> Result<(), DriverError>;
}

// ─── Subject Location ───────────────────────────────────────────────

/// Opaque subject-location query.
///
/// Returns a best-effort instantaneous reading with no caching across
/// calls. The detection pipeline behind it (camera, vision, whatever)
/// is not this crate's concern.
pub trait SubjectLocator {
    /// Is the subject currently inside the lane?
    fn is_inside_lane(&mut self) -> Result<bool, SensorError>;

    /// Release underlying sensor resources. Idempotent.
    fn clean_up(&mut self);
}

// ─── Event Engine ───────────────────────────────────────────────────

/// Per-state registration handed to the engine by `setup()`.
#[derive(Debug, Clone)]
pub struct StateRegistration {
    /// State timer; `None` means the engine's default transition timer.
    pub timer: Option<Duration>,
    /// Outgoing edges, consulted in order after the entry callback.
    pub transitions: Vec<(Trigger, LaneStateId)>,
}

/// Sink through which an entry callback fires named events back at the
/// engine. Events are considered on the engine's next transition
/// decision, never mid-callback.
pub trait EventSink {
    /// Signal a named event with the given strength.
    fn trigger_event(&mut self, event: LaneEvent, strength: u8);
}

/// Entry-callback dispatch bound to a state machine instance.
///
/// The engine guarantees exactly one `on_enter` invocation per state
/// entry and evaluates transitions only after the callback returns.
pub trait TickHandler {
    /// One tick: the engine entered `state`.
    fn on_enter(&mut self, state: LaneStateId, sink: &mut dyn EventSink) -> Result<(), LaneError>;
}

/// External timer/event engine registration contract.
///
/// The engine owns real time. It invokes a state's entry callback when
/// the state is entered and transitions to the next registered state
/// when the timer expires or a named event fires.
pub trait EventEngine {
    /// Register one state with its timer and transition table.
    fn register(
        &mut self,
        state: LaneStateId,
        registration: StateRegistration,
    ) -> Result<(), EngineError>;
}

// ─── Clock ──────────────────────────────────────────────────────────

/// Monotonic time source.
///
/// All peek timing is wall-clock polling sampled synchronously inside
/// the caller's tick. The seam exists so timing logic can be driven
/// without sleeping in tests and benches.
pub trait Clock {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
}

/// Production clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for simulation and tests.
///
/// Holds a fixed base instant plus an offset that only moves forward
/// via [`ManualClock::advance`].
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: RefCell<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at an arbitrary base instant.
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: RefCell::new(Duration::ZERO),
        }
    }

    /// Move time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut offset = self.offset.borrow_mut();
        *offset += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.borrow()
    }
}

// ─── Shared Handles ─────────────────────────────────────────────────
//
// Single-threaded wiring: the sim/test rig keeps a handle to a driver
// or clock it has already handed to the controller.

impl<C: Clock> Clock for Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<D: LineDriver> LineDriver for Rc<RefCell<D>> {
    fn set_line(
        &mut self,
        line: crate::actuator::Line,
        level: crate::actuator::Level,
    ) -> Result<(), DriverError> {
        self.borrow_mut().set_line(line, level)
    }
}
