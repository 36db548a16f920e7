//! Frame loop configuration
//!
//! A `LoopConfig` is passed to the scheduler at construction time. It can be
//! built in code or loaded from a TOML file; every field is optional in the
//! file and falls back to its default:
//!
//! ```toml
//! simulation_rate = 100.0
//! max_frame_time = 0.25
//! fps_reporting_period = 1.0
//! error_policy = "propagate"
//! ```

use crate::{CadenceError, FramesPerSecond, Result, Seconds};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the run loop does when a lifecycle hook returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Return the error to the caller of `run`/`tick`.
    #[default]
    Propagate,
    /// Stop the loop, shut the host down and return the error's exit code.
    ExitCode,
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Fixed update frequency in steps per second
    #[serde(default = "default_simulation_rate")]
    pub simulation_rate: FramesPerSecond,
    /// Upper bound on the wall-clock delta consumed by a single tick
    #[serde(default = "default_max_frame_time")]
    pub max_frame_time: Seconds,
    /// Interval at which the measured frame rate is reported to the host
    #[serde(default = "default_fps_reporting_period")]
    pub fps_reporting_period: Seconds,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

fn default_simulation_rate() -> FramesPerSecond {
    100.0
}
fn default_max_frame_time() -> Seconds {
    0.25
}
fn default_fps_reporting_period() -> Seconds {
    1.0
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            simulation_rate: default_simulation_rate(),
            max_frame_time: default_max_frame_time(),
            fps_reporting_period: default_fps_reporting_period(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl LoopConfig {
    pub fn with_simulation_rate(mut self, fps: FramesPerSecond) -> Self {
        self.simulation_rate = fps;
        self
    }

    pub fn with_max_frame_time(mut self, seconds: Seconds) -> Self {
        self.max_frame_time = seconds;
        self
    }

    pub fn with_fps_reporting_period(mut self, seconds: Seconds) -> Self {
        self.fps_reporting_period = seconds;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Reject non-positive or non-finite values.
    pub fn validate(&self) -> Result<()> {
        require_positive("simulation_rate", self.simulation_rate)?;
        require_positive("max_frame_time", self.max_frame_time)?;
        require_positive("fps_reporting_period", self.fps_reporting_period)?;
        Ok(())
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LoopConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Check that a rate or duration is a positive finite number.
pub fn require_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CadenceError::InvalidArgument(format!(
            "{field} must be a positive finite number, got {value}"
        )))
    }
}
