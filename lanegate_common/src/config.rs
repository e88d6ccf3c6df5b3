//! TOML configuration loading and validation.
//!
//! Loads [`LaneConfig`] from a TOML file, applies defaults for missing
//! fields, and validates parameter bounds before anything touches
//! hardware. All timing parameters are expressed in seconds.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(String),

    /// TOML parsing failed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// Semantic validation failed.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Lane-gating configuration.
///
/// Defaults reproduce the reference apparatus tuning: three seconds of
/// push, three seconds at rest, a 100 ms supervisory transition timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaneConfig {
    /// Seconds the actuator pushes before the peek cycle rests it.
    pub push_timeout_s: f64,
    /// Seconds the actuator rests before the peek cycle pulls it back.
    pub at_rest_timeout_s: f64,
    /// Upper validation bound for both peek timeouts.
    pub max_actuator_timeout_s: f64,
    /// Default supervisory transition timer (tick period).
    pub state_timer_s: f64,
    /// Fixed settle timer for the Initiate state.
    pub init_timer_s: f64,
    /// Recovery stall applied by a blocking pull (manual path only).
    pub pull_recovery_s: f64,
    /// Drive ExitLane with `peek()` instead of a plain `pull()`.
    pub exit_with_peek: bool,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            push_timeout_s: 3.0,
            at_rest_timeout_s: 3.0,
            max_actuator_timeout_s: 5.0,
            state_timer_s: 0.1,
            init_timer_s: 1.0,
            pull_recovery_s: 3.0,
            exit_with_peek: false,
        }
    }
}

impl LaneConfig {
    /// Parse a config from TOML text. Missing fields take defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: LaneConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        debug!("loaded lane config from {}", path.display());
        Self::from_toml(&text)
    }

    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Finiteness first: NaN slips through ordered comparisons, and
        // a non-finite value would panic later in Duration conversion.
        for (name, value) in [
            ("push_timeout_s", self.push_timeout_s),
            ("at_rest_timeout_s", self.at_rest_timeout_s),
            ("max_actuator_timeout_s", self.max_actuator_timeout_s),
            ("state_timer_s", self.state_timer_s),
            ("init_timer_s", self.init_timer_s),
            ("pull_recovery_s", self.pull_recovery_s),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.max_actuator_timeout_s <= 0.0 {
            return Err(ConfigError::Validation(
                "max_actuator_timeout_s must be positive".into(),
            ));
        }
        for (name, value) in [
            ("push_timeout_s", self.push_timeout_s),
            ("at_rest_timeout_s", self.at_rest_timeout_s),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Validation(format!("{name} must be >= 0")));
            }
            if value > self.max_actuator_timeout_s {
                return Err(ConfigError::Validation(format!(
                    "{name} = {value} exceeds max_actuator_timeout_s = {}",
                    self.max_actuator_timeout_s
                )));
            }
        }
        if self.state_timer_s <= 0.0 {
            return Err(ConfigError::Validation(
                "state_timer_s must be positive".into(),
            ));
        }
        if self.init_timer_s < 0.0 {
            return Err(ConfigError::Validation("init_timer_s must be >= 0".into()));
        }
        if self.pull_recovery_s < 0.0 {
            return Err(ConfigError::Validation(
                "pull_recovery_s must be >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Push-window timeout.
    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.push_timeout_s)
    }

    /// At-rest-window timeout.
    pub fn at_rest_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.at_rest_timeout_s)
    }

    /// Default supervisory transition timer.
    pub fn state_timer(&self) -> Duration {
        Duration::from_secs_f64(self.state_timer_s)
    }

    /// Initiate-state settle timer.
    pub fn init_timer(&self) -> Duration {
        Duration::from_secs_f64(self.init_timer_s)
    }

    /// Blocking-pull recovery stall.
    pub fn pull_recovery(&self) -> Duration {
        Duration::from_secs_f64(self.pull_recovery_s)
    }
}
