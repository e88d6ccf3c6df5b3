//! Collaborator implementations for development and testing.
//!
//! Real deployments plug hardware-backed implementations of the
//! `lanegate_common::hal` traits into the control core. The simulation
//! backends here emulate them in software: the line driver records
//! every write, the locator replays scripted occupancy readings, and
//! both support fault injection for exercising the fail-fast paths.

mod simulation;

pub use simulation::{SimLineDriver, SimSubjectLocator};
