//! Lane state and event identifiers.
//!
//! The supervisory machine cycles through four states. Each state owns
//! a transition table mapping an outgoing edge - timer expiry or a
//! named event - to a destination state. The identifiers here are plain
//! data; handlers are bound to them by the state machine instance, not
//! attached to the identifiers themselves.

use serde::{Deserialize, Serialize};

/// Supervisory lane-navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneStateId {
    /// Startup settle state; no entry action.
    Initiate,
    /// Ask the locator whether the subject occupies the lane.
    QuerySubjectLocation,
    /// Subject is inside - advance the actuator peek cycle.
    EnterLane,
    /// Subject is outside - retract (or peek, by configuration).
    ExitLane,
}

impl LaneStateId {
    /// All states, in registration order.
    pub const ALL: [LaneStateId; 4] = [
        LaneStateId::Initiate,
        LaneStateId::QuerySubjectLocation,
        LaneStateId::EnterLane,
        LaneStateId::ExitLane,
    ];

    /// The state the machine starts in.
    #[inline]
    pub const fn initial() -> Self {
        LaneStateId::Initiate
    }
}

/// Named event an entry callback can fire back at the engine to steer
/// the next transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneEvent {
    /// Locator reported the subject inside the lane.
    SubjectInside,
    /// Locator reported the subject outside the lane.
    SubjectOutside,
    /// The actuator peek cycle completed (pull branch ran).
    LaneExited,
}

/// Outgoing edge of a state's transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The state timer expired with no matching event.
    TimerExpired,
    /// A named event fired during the entry callback.
    Event(LaneEvent),
}
