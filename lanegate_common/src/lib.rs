//! Lanegate Common Library
//!
//! Shared types and collaborator contracts for the lanegate workspace.
//! The lanegate system gates a test subject's movement through a
//! physical lane by driving a linear actuator under a supervisory
//! state machine; this crate holds everything both the control core
//! and its process wiring need to agree on.
//!
//! # Module Structure
//!
//! - [`actuator`] - Actuator phase and output-line definitions
//! - [`lane`] - Lane state and event identifiers
//! - [`error`] - Fault taxonomy for all component boundaries
//! - [`hal`] - Collaborator traits (output driver, locator, engine, clock)
//! - [`config`] - TOML configuration loading and validation

pub mod actuator;
pub mod config;
pub mod error;
pub mod hal;
pub mod lane;
