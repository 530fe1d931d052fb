//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments
//!
//! Every section and field has a default, so partial files load.
//!
//! ```toml
//! [physics]
//! gravity_magnitude = 9.0
//! wind_magnitude = 3.0
//! max_step = 15.0
//! damped_distance = 12.0
//! max_steps = 10000
//!
//! [motion]
//! tick_delay_ms = 10
//! step_duration_ms = 0
//! seed = 42
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::controller::{MotionControllerBuilder, PointerBackend};

pub mod types;

pub use types::{ConfigOverrides, LoggingConfig, MotionConfig, PhysicsConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Simulation parameters
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Controller pacing and seeding
    #[serde(default)]
    pub motion: MotionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.physics
            .params
            .validate()
            .context("Invalid [physics] section")?;

        if self.physics.max_steps == Some(0) {
            anyhow::bail!("max_steps must be at least 1 when set");
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        let params = &mut self.physics.params;
        if let Some(gravity) = overrides.gravity {
            params.gravity_magnitude = gravity;
        }
        if let Some(wind) = overrides.wind {
            params.wind_magnitude = wind;
        }
        if let Some(max_step) = overrides.max_step {
            params.max_step = max_step;
        }
        if let Some(damped_distance) = overrides.damped_distance {
            params.damped_distance = damped_distance;
        }
        if overrides.max_steps.is_some() {
            self.physics.max_steps = overrides.max_steps;
        }
        if overrides.seed.is_some() {
            self.motion.seed = overrides.seed;
        }

        self
    }

    /// Apply physics and seed settings to a controller builder
    pub fn configure<B: PointerBackend>(
        &self,
        builder: MotionControllerBuilder<B>,
    ) -> MotionControllerBuilder<B> {
        let builder = builder
            .params(self.physics.params)
            .max_steps(self.physics.max_steps);

        match self.motion.seed {
            Some(seed) => builder.seed(seed),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default_config();
        assert_eq!(config.physics.params.gravity_magnitude, 9.0);
        assert_eq!(config.physics.max_steps, None);
        assert_eq!(config.motion.tick_delay_ms, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[physics]\nwind_magnitude = 0.5\nmax_steps = 200").unwrap();
        writeln!(file, "[motion]\nseed = 9").unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.physics.params.wind_magnitude, 0.5);
        assert_eq!(config.physics.params.max_step, 15.0);
        assert_eq!(config.physics.max_steps, Some(200));
        assert_eq!(config.motion.seed, Some(9));
        assert_eq!(config.motion.tick_delay_ms, 10);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_rejects_invalid_physics() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[physics]\nmax_step = 0.0").unwrap();

        let err = Config::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("max_step"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = Config::default_config();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_step_bound() {
        let mut config = Config::default_config();
        config.physics.max_steps = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let config = Config::default_config().with_overrides(ConfigOverrides {
            gravity: Some(5.0),
            max_steps: Some(1000),
            seed: Some(3),
            ..Default::default()
        });

        assert_eq!(config.physics.params.gravity_magnitude, 5.0);
        assert_eq!(config.physics.params.wind_magnitude, 3.0);
        assert_eq!(config.physics.max_steps, Some(1000));
        assert_eq!(config.motion.seed, Some(3));
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let text = toml::to_string(&Config::default_config()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default_config());
    }
}
