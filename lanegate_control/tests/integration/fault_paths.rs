//! Integration test: fail-fast fault propagation and cleanup.
//!
//! Every fault aborts the run at the failing tick; the caller then
//! invokes `clean_up()` exactly once, which must still park the
//! actuator safely.

use lanegate_common::actuator::{ActuatorPhase, Level, Line};
use lanegate_common::config::LaneConfig;
use lanegate_common::error::LaneError;
use lanegate_control::drivers::{SimLineDriver, SimSubjectLocator};
use lanegate_control::{ActuatorController, LaneStateMachine, TickEngine};
use std::cell::RefCell;
use std::rc::Rc;

fn fast_config() -> LaneConfig {
    LaneConfig {
        push_timeout_s: 0.03,
        at_rest_timeout_s: 0.02,
        state_timer_s: 0.005,
        init_timer_s: 0.001,
        ..LaneConfig::default()
    }
}

#[test]
fn sensor_fault_aborts_the_run() {
    let config = fast_config();
    let mut actuator = ActuatorController::new(Box::new(SimLineDriver::new()), &config);
    let mut locator = SimSubjectLocator::new();
    locator.fail_next_query("frame grab failed");
    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    let mut engine = TickEngine::new(config.state_timer());
    machine.setup(&mut engine).unwrap();

    // Initiate ticks fine; the query tick fails.
    engine.step(&mut machine).unwrap();
    let err = engine.step(&mut machine).unwrap_err();
    assert!(matches!(err, LaneError::Sensor(_)));
}

#[test]
fn actuator_fault_aborts_and_cleanup_still_parks() {
    let config = fast_config();
    let driver = Rc::new(RefCell::new(SimLineDriver::new()));
    let mut actuator = ActuatorController::new(Box::new(Rc::clone(&driver)), &config);
    let mut locator = SimSubjectLocator::with_script([true]);
    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    let mut engine = TickEngine::new(config.state_timer());
    machine.setup(&mut engine).unwrap();

    engine.step(&mut machine).unwrap();
    engine.step(&mut machine).unwrap();

    // The EnterLane peek's push write fails.
    driver.borrow_mut().fail_next_write("line open");
    let err = engine.step(&mut machine).unwrap_err();
    assert!(matches!(err, LaneError::Actuator(_)));

    // Caller's cleanup path: the fault was transient, so the reset
    // succeeds and the actuator parks at rest.
    machine.clean_up().unwrap();
    drop(machine);
    assert_eq!(actuator.phase(), ActuatorPhase::AtRest);
    assert!(locator.released());
    let d = driver.borrow();
    assert_eq!(d.level(Line::Push), Level::Low);
    assert_eq!(d.level(Line::Pull), Level::Low);
}

#[test]
fn run_aborts_on_first_fault_without_retry() {
    let config = fast_config();
    let mut actuator = ActuatorController::new(Box::new(SimLineDriver::new()), &config);
    let mut locator = SimSubjectLocator::new();
    locator.fail_next_query("lens cap on");
    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    let mut engine = TickEngine::new(config.state_timer());
    machine.setup(&mut engine).unwrap();

    assert!(engine.run(&mut machine).is_err());
    drop(machine);
    // The failed query consumed no reading: the fault fired before
    // any successful query was served.
    assert_eq!(locator.queries(), 0);
}
