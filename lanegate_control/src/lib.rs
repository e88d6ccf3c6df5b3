//! # Lanegate Control Core
//!
//! Gates a test subject's movement through a physical lane in a
//! behavioral-testing apparatus. Two components carry the real
//! invariants; everything else is glue:
//!
//! - [`actuator::ActuatorController`] - owns the actuator's physical
//!   phase and the push/rest/pull/peek timing cycle; the only writer
//!   of physical outputs.
//! - [`lane::LaneStateMachine`] - supervisory four-state machine that
//!   queries the subject locator and drives the actuator under the
//!   external timer/event schedule.
//!
//! The whole system is single-threaded, cooperative, and tick-driven:
//! the engine advances it one entry callback at a time, timing is
//! wall-clock polling inside the tick, and the only blocking call is
//! a blocking pull on the manual-recovery path.
//!
//! # Module Structure
//!
//! - [`timing`] - latched timing values and the peek windows
//! - [`actuator`] - actuator controller
//! - [`lane`] - supervisory lane state machine
//! - [`engine`] - in-process timer/event engine
//! - [`drivers`] - simulation backends for the collaborator traits

pub mod actuator;
pub mod drivers;
pub mod engine;
pub mod lane;
pub mod timing;

pub use crate::actuator::ActuatorController;
pub use crate::engine::TickEngine;
pub use crate::lane::LaneStateMachine;
