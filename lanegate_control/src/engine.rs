//! In-process timer/event engine.
//!
//! Implements the registration contract of `lanegate_common::hal`:
//! states are registered with a timer and a transition table, then the
//! run loop invokes each state's entry callback exactly once per entry
//! and picks the next state only after the callback returns. Events
//! fired during the callback are consulted before the timer edge; with
//! no matching event the engine waits out the state timer and follows
//! the timer-expiry edge.
//!
//! The engine owns real time. It is single-threaded and cooperative:
//! stopping it (via the shared running flag) simply stops further
//! ticks, it does not clean anything up.

use lanegate_common::error::{EngineError, LaneError};
use lanegate_common::hal::{EventEngine, EventSink, StateRegistration, TickHandler};
use lanegate_common::lane::{LaneEvent, LaneStateId, Trigger};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

/// Events collected during one entry callback.
#[derive(Debug, Default)]
struct EventQueue {
    events: Vec<(LaneEvent, u8)>,
}

impl EventSink for EventQueue {
    fn trigger_event(&mut self, event: LaneEvent, strength: u8) {
        trace!("event {event:?} fired (strength {strength})");
        self.events.push((event, strength));
    }
}

/// Software timer/event engine driving a [`TickHandler`].
pub struct TickEngine {
    states: Vec<(LaneStateId, StateRegistration)>,
    current: LaneStateId,
    default_timer: Duration,
    running: Arc<AtomicBool>,
}

impl TickEngine {
    /// Create an engine with the given default transition timer, used
    /// for states registered without their own timer.
    pub fn new(default_timer: Duration) -> Self {
        Self {
            states: Vec::new(),
            current: LaneStateId::initial(),
            default_timer,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The state the engine is currently in.
    #[inline]
    pub fn current(&self) -> LaneStateId {
        self.current
    }

    /// Shared stop flag; clearing it ends [`TickEngine::run`] after the
    /// in-flight tick.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    fn registration(&self, state: LaneStateId) -> Result<&StateRegistration, EngineError> {
        self.states
            .iter()
            .find(|(s, _)| *s == state)
            .map(|(_, r)| r)
            .ok_or(EngineError::UnregisteredState(state))
    }

    /// Run one tick: invoke the current state's entry callback, then
    /// transition. Returns the state entered.
    ///
    /// Event edges are evaluated first, in callback firing order
    /// (zero-strength events are dropped); otherwise the engine sleeps
    /// out the state timer and follows the timer-expiry edge. A state
    /// with neither is a malformed table.
    pub fn step<H: TickHandler>(&mut self, handler: &mut H) -> Result<LaneStateId, LaneError> {
        let (timer, transitions) = {
            let registration = self.registration(self.current).map_err(LaneError::Engine)?;
            (
                registration.timer.unwrap_or(self.default_timer),
                registration.transitions.clone(),
            )
        };

        let mut queue = EventQueue::default();
        handler.on_enter(self.current, &mut queue)?;

        let mut next = None;
        'events: for (event, strength) in &queue.events {
            if *strength == 0 {
                continue;
            }
            for (trigger, dest) in &transitions {
                if *trigger == Trigger::Event(*event) {
                    next = Some(*dest);
                    break 'events;
                }
            }
        }

        let next = match next {
            Some(dest) => dest,
            None => {
                let timer_dest = transitions
                    .iter()
                    .find(|(trigger, _)| *trigger == Trigger::TimerExpired)
                    .map(|(_, dest)| *dest);
                match timer_dest {
                    Some(dest) => {
                        std::thread::sleep(timer);
                        dest
                    }
                    None => {
                        return Err(LaneError::Engine(EngineError::MissingTransition(
                            self.current,
                        )));
                    }
                }
            }
        };

        // Transitioning into an unregistered state is a table fault,
        // caught here rather than on the next tick.
        self.registration(next).map_err(LaneError::Engine)?;
        debug!("transition {:?} -> {next:?}", self.current);
        self.current = next;
        Ok(next)
    }

    /// Tick until the running flag is cleared or a tick fails.
    ///
    /// A failed tick aborts the run; the caller is responsible for
    /// invoking the handler's cleanup path.
    pub fn run<H: TickHandler>(&mut self, handler: &mut H) -> Result<(), LaneError> {
        self.running.store(true, Ordering::SeqCst);
        while self.running.load(Ordering::SeqCst) {
            self.step(handler)?;
        }
        debug!("engine stopped");
        Ok(())
    }
}

impl EventEngine for TickEngine {
    fn register(
        &mut self,
        state: LaneStateId,
        registration: StateRegistration,
    ) -> Result<(), EngineError> {
        if self.states.iter().any(|(s, _)| *s == state) {
            return Err(EngineError::DuplicateState(state));
        }
        debug!(
            "registered {state:?} (timer {:?}, {} edges)",
            registration.timer,
            registration.transitions.len()
        );
        self.states.push((state, registration));
        Ok(())
    }
}
