//! Fault taxonomy for the lanegate control core.
//!
//! One error kind per component boundary. Each component wraps its
//! collaborators' failures into its own kind at the boundary - no kind
//! crosses a boundary unwrapped. Every fault is fail-fast: there are no
//! retries anywhere, and the caller owns cleanup after a failed run.

use crate::lane::LaneStateId;
use thiserror::Error;

/// A physical output write failed at the transport level.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// The write to a specific output channel failed.
    #[error("output write failed on channel {channel}: {detail}")]
    WriteFailed {
        /// Hardware channel number.
        channel: u8,
        /// Transport-specific failure detail.
        detail: String,
    },

    /// The output transport is not available at all.
    #[error("output transport unavailable: {0}")]
    TransportUnavailable(String),
}

/// The subject-location query failed.
#[derive(Debug, Clone, Error)]
pub enum SensorError {
    /// Underlying detection pipeline failed.
    #[error("subject detection failed: {0}")]
    DetectionFailed(String),

    /// The sensor was queried after being released.
    #[error("sensor queried after clean_up")]
    Released,
}

/// Actuator-boundary fault: a physical output write failed while the
/// controller was changing phase. The in-progress lane cycle is dead;
/// the caller's cleanup path must run.
#[derive(Debug, Clone, Error)]
pub enum ActuatorError {
    /// A line write failed. The actuator phase is unchanged from its
    /// pre-call value.
    #[error("actuator output write failed: {0}")]
    Write(#[from] DriverError),
}

/// Event-engine fault: malformed registration or transition table.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The same state was registered twice.
    #[error("state {0:?} registered twice")]
    DuplicateState(LaneStateId),

    /// A transition targeted (or the run entered) an unregistered state.
    #[error("state {0:?} is not registered")]
    UnregisteredState(LaneStateId),

    /// No outgoing edge matched after the entry callback returned.
    #[error("state {0:?} has no matching outgoing edge")]
    MissingTransition(LaneStateId),
}

/// State-machine-boundary fault. A failed tick aborts the run; the
/// supervisory loop never catches and continues.
#[derive(Debug, Clone, Error)]
pub enum LaneError {
    /// An entry action's actuator call failed.
    #[error("actuator fault during entry action: {0}")]
    Actuator(#[from] ActuatorError),

    /// The subject-location query failed.
    #[error("sensor fault during subject query: {0}")]
    Sensor(#[from] SensorError),

    /// Setup or transition bookkeeping failed in the engine.
    #[error("event engine fault: {0}")]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_error_display_names_channel() {
        let err = DriverError::WriteFailed {
            channel: 2,
            detail: "bus timeout".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("channel 2"));
        assert!(msg.contains("bus timeout"));
    }

    #[test]
    fn actuator_error_wraps_driver_error() {
        let err: ActuatorError = DriverError::TransportUnavailable("no device".into()).into();
        assert!(err.to_string().contains("no device"));
    }

    #[test]
    fn lane_error_wraps_each_collaborator_kind() {
        let from_actuator: LaneError =
            ActuatorError::Write(DriverError::TransportUnavailable("x".into())).into();
        assert!(matches!(from_actuator, LaneError::Actuator(_)));

        let from_sensor: LaneError = SensorError::DetectionFailed("dark frame".into()).into();
        assert!(matches!(from_sensor, LaneError::Sensor(_)));

        let from_engine: LaneError =
            EngineError::UnregisteredState(LaneStateId::EnterLane).into();
        assert!(matches!(from_engine, LaneError::Engine(_)));
    }
}
