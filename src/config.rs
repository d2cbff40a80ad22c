//! Run configuration.
//!
//! Settings for the outer run loop, read from an optional JSON file and
//! overridden by command-line flags:
//!
//! ```json
//! { "steps_per_tick": 50000, "ticks_per_second": 30, "max_steps": 1000000 }
//! ```

use serde::{Serialize, Deserialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// How the runner paces execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Instructions executed per tick.
    pub steps_per_tick: u64,
    /// Ticks per second when pacing is enabled.
    pub ticks_per_second: u32,
    /// Stop after this many instructions.
    pub max_steps: Option<u64>,
    /// Sleep out the rest of each tick instead of running flat out.
    pub paced: bool,
    /// Stop once the program parks itself in an `@n / 0;JMP` loop.
    pub stop_on_halt: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps_per_tick: 50_000,
            ticks_per_second: 30,
            max_steps: None,
            paced: true,
            stop_on_halt: true,
        }
    }
}

impl RunConfig {
    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_json::from_str(text)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps_per_tick == 0 {
            return Err(ConfigError::Invalid("steps_per_tick must be at least 1".into()));
        }
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid("ticks_per_second must be at least 1".into()));
        }
        Ok(())
    }

    /// Wall-clock length of one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("invalid config file: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
