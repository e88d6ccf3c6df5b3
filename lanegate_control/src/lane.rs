//! Supervisory lane-navigation state machine.
//!
//! Sequences subject-location queries and actuator actions under the
//! externally driven timer/event schedule. The machine owns its
//! transition tables, built once at construction; entry handlers are
//! bound to state identifiers by an explicit match in
//! [`LaneStateMachine::on_enter`], never attached to the identifiers
//! themselves.
//!
//! The machine holds mutable borrows of the actuator controller and
//! the subject locator - both are created once by the wiring layer and
//! live for the whole run.

use crate::actuator::ActuatorController;
use lanegate_common::config::LaneConfig;
use lanegate_common::error::LaneError;
use lanegate_common::hal::{
    EVENT_STRENGTH_FULL, EventEngine, EventSink, StateRegistration, SubjectLocator, TickHandler,
};
use lanegate_common::lane::{LaneEvent, LaneStateId, Trigger};
use std::time::Duration;
use tracing::{debug, info};

/// Supervisory lane state machine.
///
/// | State                | Entry action            | Outgoing edges                  |
/// |----------------------|-------------------------|---------------------------------|
/// | Initiate             | none                    | init timer → Query              |
/// | QuerySubjectLocation | query locator, emit     | inside → EnterLane,             |
/// |                      | inside/outside event    | outside → ExitLane              |
/// | EnterLane            | `peek()`, emit exited   | tick timeout → Query,           |
/// |                      | on cycle completion     | exited → Query                  |
/// | ExitLane             | `pull()` (or `peek()`)  | tick timeout → Query            |
///
/// No terminal state: the machine cycles until the engine stops
/// ticking. `clean_up()` must still run afterwards.
pub struct LaneStateMachine<'a> {
    actuator: &'a mut ActuatorController,
    locator: &'a mut dyn SubjectLocator,
    table: Vec<(LaneStateId, StateRegistration)>,
    exit_with_peek: bool,
}

impl<'a> LaneStateMachine<'a> {
    /// Build the machine and its transition tables.
    pub fn new(
        actuator: &'a mut ActuatorController,
        locator: &'a mut dyn SubjectLocator,
        config: &LaneConfig,
    ) -> Self {
        let table = build_table(config.init_timer());
        Self {
            actuator,
            locator,
            table,
            exit_with_peek: config.exit_with_peek,
        }
    }

    /// Register every state, timer, and transition table with the
    /// external engine.
    pub fn setup<E: EventEngine>(&self, engine: &mut E) -> Result<(), LaneError> {
        for (state, registration) in &self.table {
            engine.register(*state, registration.clone())?;
        }
        info!("lane state machine registered ({} states)", self.table.len());
        Ok(())
    }

    /// Force the actuator back to its safe resting position and
    /// release the locator. Idempotent; safe on both the normal
    /// completion path and the error exit path.
    pub fn clean_up(&mut self) -> Result<(), LaneError> {
        self.actuator.reset()?;
        self.locator.clean_up();
        info!("lane state machine cleaned up");
        Ok(())
    }

    fn query_subject_location(&mut self, sink: &mut dyn EventSink) -> Result<(), LaneError> {
        let inside = self.locator.is_inside_lane()?;
        let event = if inside {
            LaneEvent::SubjectInside
        } else {
            LaneEvent::SubjectOutside
        };
        debug!("subject inside lane: {inside}");
        sink.trigger_event(event, EVENT_STRENGTH_FULL);
        Ok(())
    }

    fn enter_lane(&mut self, sink: &mut dyn EventSink) -> Result<(), LaneError> {
        let cycle_complete = self.actuator.peek()?;
        if cycle_complete {
            sink.trigger_event(LaneEvent::LaneExited, EVENT_STRENGTH_FULL);
        }
        Ok(())
    }

    fn exit_lane(&mut self) -> Result<(), LaneError> {
        if self.exit_with_peek {
            self.actuator.peek()?;
        } else {
            self.actuator.pull(false)?;
        }
        Ok(())
    }
}

impl TickHandler for LaneStateMachine<'_> {
    fn on_enter(&mut self, state: LaneStateId, sink: &mut dyn EventSink) -> Result<(), LaneError> {
        debug!("entering {state:?}");
        match state {
            LaneStateId::Initiate => Ok(()),
            LaneStateId::QuerySubjectLocation => self.query_subject_location(sink),
            LaneStateId::EnterLane => self.enter_lane(sink),
            LaneStateId::ExitLane => self.exit_lane(),
        }
    }
}

/// The fixed transition table of the lane cycle.
fn build_table(init_timer: Duration) -> Vec<(LaneStateId, StateRegistration)> {
    use LaneEvent::*;
    use LaneStateId::*;
    use Trigger::*;

    vec![
        (
            Initiate,
            StateRegistration {
                timer: Some(init_timer),
                transitions: vec![(TimerExpired, QuerySubjectLocation)],
            },
        ),
        (
            QuerySubjectLocation,
            StateRegistration {
                timer: None,
                transitions: vec![
                    (Event(SubjectInside), EnterLane),
                    (Event(SubjectOutside), ExitLane),
                ],
            },
        ),
        (
            EnterLane,
            StateRegistration {
                timer: None,
                transitions: vec![
                    (Event(LaneExited), QuerySubjectLocation),
                    (TimerExpired, QuerySubjectLocation),
                ],
            },
        ),
        (
            ExitLane,
            StateRegistration {
                timer: None,
                transitions: vec![(TimerExpired, QuerySubjectLocation)],
            },
        ),
    ]
}
