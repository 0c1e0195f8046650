//! Simulator configuration.
//!
//! Loaded from TOML (`~/.config/valis/simulator.toml` by default). Every
//! field is optional in the file and falls back to the demo pacing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValisError};
use crate::task::MAX_PROGRESS;

const APP_DIR: &str = "valis";
const CONFIG_FILE: &str = "simulator.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Period between progress ticks.
    pub tick_interval_ms: u64,
    /// Pause between reaching 100% and emitting the completion event.
    pub completion_delay_ms: u64,
    /// Smallest increment applied per tick. Must be positive so every task
    /// finishes in a bounded number of ticks.
    pub min_increment: f64,
    /// Exclusive upper bound of the random increment.
    pub max_increment: f64,
    /// Finished tasks kept for lookup; 0 disables the history.
    pub history_limit: usize,
    /// Seed for the random increment source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 800,
            completion_delay_ms: 1000,
            min_increment: 1.0,
            max_increment: 20.0,
            history_limit: 50,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    /// Upper bound on the number of ticks a task needs to complete.
    pub fn max_ticks(&self) -> u64 {
        (MAX_PROGRESS / self.min_increment).ceil() as u64
    }

    /// Rejects settings that would stall or break the simulation.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(ValisError::config("tick_interval_ms must be greater than 0"));
        }
        if !self.min_increment.is_finite() || self.min_increment <= 0.0 {
            return Err(ValisError::config(format!(
                "min_increment must be a positive number, got {}",
                self.min_increment
            )));
        }
        if !self.max_increment.is_finite() || self.max_increment < self.min_increment {
            return Err(ValisError::config(format!(
                "max_increment ({}) must not be below min_increment ({})",
                self.max_increment, self.min_increment
            )));
        }
        if self.max_increment > MAX_PROGRESS {
            return Err(ValisError::config(format!(
                "max_increment must not exceed {}, got {}",
                MAX_PROGRESS, self.max_increment
            )));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulatorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads the configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValisError::io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads an explicitly named file, or the default file when present.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::load(&default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// `<config dir>/valis/simulator.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }
}
