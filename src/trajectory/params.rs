//! Physical model parameters

use serde::{Deserialize, Serialize};

use super::error::{Result, TrajectoryError};
use super::{
    DAMPED_DISTANCE_DEFAULT, GRAVITY_MAGNITUDE_DEFAULT, MAX_STEP_DEFAULT, WIND_MAGNITUDE_DEFAULT,
};

/// Tunables of the WindMouse simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParameters {
    /// Pull strength toward the destination
    #[serde(default = "default_gravity")]
    pub gravity_magnitude: f64,

    /// Strength of the lateral wind fluctuations (0 = straight line)
    #[serde(default = "default_wind")]
    pub wind_magnitude: f64,

    /// Velocity clip threshold in pixels per step
    #[serde(default = "default_max_step")]
    pub max_step: f64,

    /// Distance below which wind is damped and steps shrink
    #[serde(default = "default_damped_distance")]
    pub damped_distance: f64,
}

fn default_gravity() -> f64 {
    GRAVITY_MAGNITUDE_DEFAULT
}
fn default_wind() -> f64 {
    WIND_MAGNITUDE_DEFAULT
}
fn default_max_step() -> f64 {
    MAX_STEP_DEFAULT
}
fn default_damped_distance() -> f64 {
    DAMPED_DISTANCE_DEFAULT
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        Self {
            gravity_magnitude: default_gravity(),
            wind_magnitude: default_wind(),
            max_step: default_max_step(),
            damped_distance: default_damped_distance(),
        }
    }
}

impl PhysicalParameters {
    /// Set gravity magnitude
    pub fn with_gravity(mut self, gravity_magnitude: f64) -> Self {
        self.gravity_magnitude = gravity_magnitude;
        self
    }

    /// Set wind magnitude
    pub fn with_wind(mut self, wind_magnitude: f64) -> Self {
        self.wind_magnitude = wind_magnitude;
        self
    }

    /// Set maximum step
    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    /// Set damped distance
    pub fn with_damped_distance(mut self, damped_distance: f64) -> Self {
        self.damped_distance = damped_distance;
        self
    }

    /// Check every parameter against its domain.
    ///
    /// Gravity, max step and damped distance must be finite and positive.
    /// Wind must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        positive("gravity_magnitude", self.gravity_magnitude)?;
        positive("max_step", self.max_step)?;
        positive("damped_distance", self.damped_distance)?;

        if !self.wind_magnitude.is_finite() {
            return Err(TrajectoryError::invalid(
                "wind_magnitude",
                self.wind_magnitude,
                "must be finite",
            ));
        }
        if self.wind_magnitude < 0.0 {
            return Err(TrajectoryError::invalid(
                "wind_magnitude",
                self.wind_magnitude,
                "must not be negative",
            ));
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TrajectoryError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(TrajectoryError::invalid(
            name,
            value,
            "must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PhysicalParameters::default();
        assert_eq!(params.gravity_magnitude, 9.0);
        assert_eq!(params.wind_magnitude, 3.0);
        assert_eq!(params.max_step, 15.0);
        assert_eq!(params.damped_distance, 12.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let params = PhysicalParameters::default()
            .with_gravity(5.0)
            .with_wind(0.0)
            .with_max_step(20.0)
            .with_damped_distance(8.0);
        assert_eq!(params.gravity_magnitude, 5.0);
        assert_eq!(params.wind_magnitude, 0.0);
        assert_eq!(params.max_step, 20.0);
        assert_eq!(params.damped_distance, 8.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_non_positive_rejected() {
        let cases = [
            (PhysicalParameters::default().with_gravity(0.0), "gravity_magnitude"),
            (PhysicalParameters::default().with_max_step(-3.0), "max_step"),
            (
                PhysicalParameters::default().with_damped_distance(0.0),
                "damped_distance",
            ),
            (PhysicalParameters::default().with_wind(-0.5), "wind_magnitude"),
        ];

        for (params, name) in cases {
            let err = params.validate().unwrap_err();
            assert_eq!(err.parameter(), name);
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(PhysicalParameters::default()
            .with_gravity(f64::NAN)
            .validate()
            .is_err());
        assert!(PhysicalParameters::default()
            .with_wind(f64::INFINITY)
            .validate()
            .is_err());
        assert!(PhysicalParameters::default()
            .with_max_step(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_deserialize() {
        let params: PhysicalParameters = toml::from_str("gravity_magnitude = 4.5").unwrap();
        assert_eq!(params.gravity_magnitude, 4.5);
        assert_eq!(params.wind_magnitude, 3.0);
        assert_eq!(params.max_step, 15.0);
        assert_eq!(params.damped_distance, 12.0);
    }
}
