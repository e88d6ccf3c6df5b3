//! Integration test: full lane-cycle workflows.
//!
//! Drives the lane state machine through the tick engine with the
//! simulation backends and short real timers.

use lanegate_common::actuator::{Level, Line};
use lanegate_common::config::LaneConfig;
use lanegate_common::lane::LaneStateId;
use lanegate_control::drivers::{SimLineDriver, SimSubjectLocator};
use lanegate_control::{ActuatorController, LaneStateMachine, TickEngine};
use std::cell::RefCell;
use std::rc::Rc;

// ── Helpers ─────────────────────────────────────────────────────────

fn fast_config() -> LaneConfig {
    LaneConfig {
        push_timeout_s: 0.03,
        at_rest_timeout_s: 0.02,
        state_timer_s: 0.005,
        init_timer_s: 0.001,
        ..LaneConfig::default()
    }
}

fn engine_with(config: &LaneConfig) -> TickEngine {
    TickEngine::new(config.state_timer())
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn subject_inside_routes_to_enter_lane() {
    let config = fast_config();
    let mut actuator = ActuatorController::new(Box::new(SimLineDriver::new()), &config);
    let mut locator = SimSubjectLocator::with_script([true]);
    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    let mut engine = engine_with(&config);
    machine.setup(&mut engine).unwrap();

    assert_eq!(engine.current(), LaneStateId::Initiate);
    assert_eq!(
        engine.step(&mut machine).unwrap(),
        LaneStateId::QuerySubjectLocation
    );
    assert_eq!(engine.step(&mut machine).unwrap(), LaneStateId::EnterLane);
}

#[test]
fn subject_outside_routes_to_exit_lane() {
    let config = fast_config();
    let mut actuator = ActuatorController::new(Box::new(SimLineDriver::new()), &config);
    let mut locator = SimSubjectLocator::with_script([false]);
    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    let mut engine = engine_with(&config);
    machine.setup(&mut engine).unwrap();

    engine.step(&mut machine).unwrap();
    assert_eq!(engine.step(&mut machine).unwrap(), LaneStateId::ExitLane);
    // ExitLane ticks back to the query state.
    assert_eq!(
        engine.step(&mut machine).unwrap(),
        LaneStateId::QuerySubjectLocation
    );
}

#[test]
fn enter_lane_cycles_back_through_query() {
    let config = fast_config();
    let mut actuator = ActuatorController::new(Box::new(SimLineDriver::new()), &config);
    let mut locator = SimSubjectLocator::with_script([true, true]);
    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    let mut engine = engine_with(&config);
    machine.setup(&mut engine).unwrap();

    engine.step(&mut machine).unwrap();
    engine.step(&mut machine).unwrap();
    assert_eq!(engine.current(), LaneStateId::EnterLane);
    assert_eq!(
        engine.step(&mut machine).unwrap(),
        LaneStateId::QuerySubjectLocation
    );
    assert_eq!(engine.step(&mut machine).unwrap(), LaneStateId::EnterLane);
}

#[test]
fn persistent_subject_completes_a_full_peek_cycle() {
    let config = fast_config();
    let driver = Rc::new(RefCell::new(SimLineDriver::new()));
    let mut actuator = ActuatorController::new(Box::new(Rc::clone(&driver)), &config);
    let mut locator = SimSubjectLocator::with_script([true]);
    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    let mut engine = engine_with(&config);
    machine.setup(&mut engine).unwrap();

    // The subject squats in the lane; the peek cycle pushes, rests,
    // then pulls back. The 5 ms tick against 30/20 ms windows gives
    // the cycle ample ticks to complete.
    let mut pulled = false;
    for _ in 0..200 {
        engine.step(&mut machine).unwrap();
        let d = driver.borrow();
        if d.level(Line::Pull) == Level::High && d.level(Line::Push) == Level::Low {
            pulled = true;
            break;
        }
    }
    assert!(pulled, "peek cycle never reached the pull phase");

    // The cycle went through a push phase on the way.
    assert!(
        driver
            .borrow()
            .history()
            .contains(&(Line::Push, Level::High))
    );
}

#[test]
fn clean_up_after_run_is_idempotent() {
    let config = fast_config();
    let driver = Rc::new(RefCell::new(SimLineDriver::new()));
    let mut actuator = ActuatorController::new(Box::new(Rc::clone(&driver)), &config);
    let mut locator = SimSubjectLocator::with_script([true, false]);
    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    let mut engine = engine_with(&config);
    machine.setup(&mut engine).unwrap();

    for _ in 0..6 {
        engine.step(&mut machine).unwrap();
    }

    machine.clean_up().unwrap();
    machine.clean_up().unwrap();
    drop(machine);

    assert_eq!(
        actuator.phase(),
        lanegate_common::actuator::ActuatorPhase::AtRest
    );
    assert!(actuator.can_push());
    assert!(locator.released());

    // Outputs are de-energized.
    let d = driver.borrow();
    assert_eq!(d.level(Line::Push), Level::Low);
    assert_eq!(d.level(Line::Pull), Level::Low);
}

#[test]
fn exit_with_peek_configuration_pushes_on_exit() {
    let config = LaneConfig {
        exit_with_peek: true,
        ..fast_config()
    };
    let driver = Rc::new(RefCell::new(SimLineDriver::new()));
    let mut actuator = ActuatorController::new(Box::new(Rc::clone(&driver)), &config);
    let mut locator = SimSubjectLocator::with_script([false]);
    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    let mut engine = engine_with(&config);
    machine.setup(&mut engine).unwrap();

    engine.step(&mut machine).unwrap();
    assert_eq!(engine.step(&mut machine).unwrap(), LaneStateId::ExitLane);
    engine.step(&mut machine).unwrap();

    // The peek variant starts a push cycle instead of retracting.
    assert_eq!(driver.borrow().level(Line::Push), Level::High);
}
