//! Actuator phase and output-line definitions.
//!
//! The linear actuator is driven over two digital output lines. Both
//! lines low is the neutral (de-energized) signal; asserting exactly
//! one line selects the motion direction. The pairing is encoded in
//! [`ActuatorPhase::line_levels`] so that no caller can ever energize
//! both directions at once.

use serde::{Deserialize, Serialize};

/// Logic-low output level.
pub const LEVEL_LOW: u8 = 0;
/// Logic-high output level.
pub const LEVEL_HIGH: u8 = 255;

/// One of the two physical output lines driving the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// Line 1 - asserts the push (extend) direction.
    Push,
    /// Line 2 - asserts the pull (retract) direction.
    Pull,
}

impl Line {
    /// Hardware channel number of this line.
    #[inline]
    pub const fn channel(self) -> u8 {
        match self {
            Line::Push => 1,
            Line::Pull => 2,
        }
    }
}

/// Signal level on an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    /// De-asserted.
    #[default]
    Low,
    /// Asserted.
    High,
}

impl Level {
    /// Raw output value written to the transport.
    #[inline]
    pub const fn value(self) -> u8 {
        match self {
            Level::Low => LEVEL_LOW,
            Level::High => LEVEL_HIGH,
        }
    }
}

/// Physical state of the actuator. Exactly one value is active at a
/// time; transitions happen only through the controller's guarded
/// trigger path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorPhase {
    /// Both lines low - no motion.
    #[default]
    AtRest,
    /// Push line high - extending into the lane.
    Pushing,
    /// Pull line high - retracting out of the lane.
    Pulling,
}

impl ActuatorPhase {
    /// Output-line levels that realize this phase.
    ///
    /// Returned in write order `[(Line::Push, _), (Line::Pull, _)]`.
    pub const fn line_levels(self) -> [(Line, Level); 2] {
        match self {
            ActuatorPhase::AtRest => [(Line::Push, Level::Low), (Line::Pull, Level::Low)],
            ActuatorPhase::Pushing => [(Line::Push, Level::High), (Line::Pull, Level::Low)],
            ActuatorPhase::Pulling => [(Line::Push, Level::Low), (Line::Pull, Level::High)],
        }
    }
}
