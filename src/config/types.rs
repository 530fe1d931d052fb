//! Configuration section types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::trajectory::PhysicalParameters;

/// `[physics]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Physical parameters of the simulation
    #[serde(flatten)]
    pub params: PhysicalParameters,

    /// Simulation step bound per trajectory (None = unbounded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

/// `[motion]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Pause between ticks in milliseconds
    #[serde(default = "default_tick_delay_ms")]
    pub tick_delay_ms: u64,

    /// Duration passed to each backend move in milliseconds
    #[serde(default)]
    pub step_duration_ms: u64,

    /// Fixed seed for reproducible paths (None = entropy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_tick_delay_ms() -> u64 {
    10
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick_delay_ms: default_tick_delay_ms(),
            step_duration_ms: 0,
            seed: None,
        }
    }
}

impl MotionConfig {
    /// Pause between ticks
    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }

    /// Duration of each backend move
    pub fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_duration_ms)
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format ("pretty", "compact", "json")
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Values supplied on the command line, applied over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Gravity magnitude
    pub gravity: Option<f64>,
    /// Wind magnitude
    pub wind: Option<f64>,
    /// Maximum step
    pub max_step: Option<f64>,
    /// Damped distance
    pub damped_distance: Option<f64>,
    /// Simulation step bound
    pub max_steps: Option<usize>,
    /// RNG seed
    pub seed: Option<u64>,
}
