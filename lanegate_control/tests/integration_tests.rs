//! Integration tests for the lanegate control core.
//!
//! These tests exercise the actuator controller, lane state machine,
//! and tick engine together, driving realistic whole-cycle workflows
//! through the simulation backends.

mod integration;
