//! Configuration for the heist engine.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this config.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine settings. Every field has a default, so a config file only needs
/// the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeistConfig {
    /// RNG seed for reproducible heists. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// How long each member has to finish their role task.
    pub task_window_ms: u64,
    /// Range of the driver's green-light delay, `[min, max]` in ms.
    pub green_light_ms: [u64; 2],
    /// Minutes a player must wait between starting heists.
    pub start_cooldown_minutes: u32,
}

impl Default for HeistConfig {
    fn default() -> Self {
        Self {
            seed: None,
            task_window_ms: 45_000,
            green_light_ms: [1_500, 4_500],
            start_cooldown_minutes: 15,
        }
    }
}

impl HeistConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the task window (at least 1 ms).
    pub fn with_task_window(mut self, window: Duration) -> Self {
        self.task_window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX).max(1);
        self
    }

    /// Set the green-light delay range. The bounds are swapped if reversed.
    pub fn with_green_light(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.green_light_ms = [min_ms.min(max_ms), min_ms.max(max_ms)];
        self
    }

    /// Set the start cooldown.
    pub fn with_start_cooldown(mut self, minutes: u32) -> Self {
        self.start_cooldown_minutes = minutes;
        self
    }

    /// The task window as a `Duration`.
    pub fn task_window(&self) -> Duration {
        Duration::from_millis(self.task_window_ms.max(1))
    }

    /// The green-light range as ordered `(min, max)` milliseconds.
    pub fn green_light_range(&self) -> (u64, u64) {
        let [a, b] = self.green_light_ms;
        (a.min(b), a.max(b))
    }
}
