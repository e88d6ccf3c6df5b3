//! Software-emulated output transport and subject locator.

use lanegate_common::actuator::{Level, Line};
use lanegate_common::error::{DriverError, SensorError};
use lanegate_common::hal::{LineDriver, SubjectLocator};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Simulated output transport.
///
/// Records every line write so tests can assert exact write sequences,
/// and can be armed to fail an upcoming write.
#[derive(Debug, Default)]
pub struct SimLineDriver {
    push_level: Level,
    pull_level: Level,
    history: Vec<(Line, Level)>,
    write_count: u64,
    /// Countdown to an injected failure: `Some(1)` fails the next write.
    fail_in: Option<u64>,
    fail_detail: String,
}

impl SimLineDriver {
    /// Create a driver with both lines low and no fault armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of a line.
    pub fn level(&self, line: Line) -> Level {
        match line {
            Line::Push => self.push_level,
            Line::Pull => self.pull_level,
        }
    }

    /// Total successful writes since construction.
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    /// Every successful write, in order.
    pub fn history(&self) -> Vec<(Line, Level)> {
        self.history.clone()
    }

    /// Forget recorded history (the line levels stay).
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Arm a failure for the next write.
    pub fn fail_next_write(&mut self, detail: &str) {
        self.fail_write_number(1, detail);
    }

    /// Arm a failure for the `n`-th upcoming write (1-based).
    pub fn fail_write_number(&mut self, n: u64, detail: &str) {
        self.fail_in = Some(n);
        self.fail_detail = detail.to_string();
    }
}

impl LineDriver for SimLineDriver {
    fn set_line(&mut self, line: Line, level: Level) -> Result<(), DriverError> {
        if let Some(countdown) = self.fail_in.as_mut() {
            *countdown -= 1;
            if *countdown == 0 {
                self.fail_in = None;
                debug!("injected write fault on {line:?}");
                return Err(DriverError::WriteFailed {
                    channel: line.channel(),
                    detail: self.fail_detail.clone(),
                });
            }
        }
        trace!("sim write {line:?} <- {level:?}");
        match line {
            Line::Push => self.push_level = level,
            Line::Pull => self.pull_level = level,
        }
        self.history.push((line, level));
        self.write_count += 1;
        Ok(())
    }
}

/// Simulated subject locator.
///
/// Replays a scripted sequence of occupancy readings, then repeats the
/// last one. With no script it always reports the subject outside.
#[derive(Debug, Default)]
pub struct SimSubjectLocator {
    script: VecDeque<bool>,
    last: bool,
    queries: u64,
    clean_ups: u64,
    released: bool,
    fail_next: Option<String>,
}

impl SimSubjectLocator {
    /// Locator that always reports the subject outside the lane.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator replaying the given readings in order.
    pub fn with_script(readings: impl IntoIterator<Item = bool>) -> Self {
        let script: VecDeque<bool> = readings.into_iter().collect();
        let last = script.back().copied().unwrap_or(false);
        Self {
            script,
            last,
            ..Self::default()
        }
    }

    /// Number of queries served so far.
    pub fn queries(&self) -> u64 {
        self.queries
    }

    /// Number of `clean_up` calls observed.
    pub fn clean_ups(&self) -> u64 {
        self.clean_ups
    }

    /// Whether the sensor resources have been released.
    pub fn released(&self) -> bool {
        self.released
    }

    /// Arm a detection failure for the next query.
    pub fn fail_next_query(&mut self, detail: &str) {
        self.fail_next = Some(detail.to_string());
    }
}

impl SubjectLocator for SimSubjectLocator {
    fn is_inside_lane(&mut self) -> Result<bool, SensorError> {
        if self.released {
            return Err(SensorError::Released);
        }
        if let Some(detail) = self.fail_next.take() {
            return Err(SensorError::DetectionFailed(detail));
        }
        self.queries += 1;
        let reading = self.script.pop_front().unwrap_or(self.last);
        trace!("sim locator reading: inside = {reading}");
        Ok(reading)
    }

    fn clean_up(&mut self) {
        self.clean_ups += 1;
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_records_levels_and_history() {
        let mut driver = SimLineDriver::new();
        driver.set_line(Line::Push, Level::High).unwrap();
        driver.set_line(Line::Pull, Level::Low).unwrap();
        assert_eq!(driver.level(Line::Push), Level::High);
        assert_eq!(driver.level(Line::Pull), Level::Low);
        assert_eq!(driver.write_count(), 2);
        assert_eq!(
            driver.history(),
            vec![(Line::Push, Level::High), (Line::Pull, Level::Low)]
        );
    }

    #[test]
    fn armed_fault_fires_once() {
        let mut driver = SimLineDriver::new();
        driver.fail_next_write("stuck line");
        assert!(driver.set_line(Line::Push, Level::High).is_err());
        // The fault is consumed; the next write succeeds.
        assert!(driver.set_line(Line::Push, Level::High).is_ok());
        assert_eq!(driver.write_count(), 1);
    }

    #[test]
    fn nth_write_fault() {
        let mut driver = SimLineDriver::new();
        driver.fail_write_number(2, "bus glitch");
        assert!(driver.set_line(Line::Push, Level::Low).is_ok());
        assert!(driver.set_line(Line::Pull, Level::Low).is_err());
    }

    #[test]
    fn locator_replays_script_then_repeats_last() {
        let mut locator = SimSubjectLocator::with_script([true, false]);
        assert!(locator.is_inside_lane().unwrap());
        assert!(!locator.is_inside_lane().unwrap());
        assert!(!locator.is_inside_lane().unwrap());
        assert_eq!(locator.queries(), 3);
    }

    #[test]
    fn locator_clean_up_is_idempotent_and_releases() {
        let mut locator = SimSubjectLocator::new();
        locator.clean_up();
        locator.clean_up();
        assert_eq!(locator.clean_ups(), 2);
        assert!(locator.released());
        assert!(matches!(
            locator.is_inside_lane(),
            Err(SensorError::Released)
        ));
    }

    #[test]
    fn locator_injected_fault_fires_once() {
        let mut locator = SimSubjectLocator::with_script([true]);
        locator.fail_next_query("dark frame");
        assert!(matches!(
            locator.is_inside_lane(),
            Err(SensorError::DetectionFailed(_))
        ));
        assert!(locator.is_inside_lane().unwrap());
    }
}
