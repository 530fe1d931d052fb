//! Trajectory Error Types

use thiserror::Error;

/// Result type for trajectory operations
pub type Result<T> = std::result::Result<T, TrajectoryError>;

/// Trajectory generation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// A physical parameter is outside its valid domain
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in configuration
        name: &'static str,
        /// Offending value
        value: f64,
        /// Constraint that was violated
        reason: &'static str,
    },
}

impl TrajectoryError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        TrajectoryError::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Name of the parameter that caused the error
    pub fn parameter(&self) -> &'static str {
        match self {
            TrajectoryError::InvalidParameter { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TrajectoryError::invalid("max_step", -1.0, "must be greater than zero");
        assert_eq!(
            error.to_string(),
            "Invalid parameter max_step = -1: must be greater than zero"
        );
        assert_eq!(error.parameter(), "max_step");
    }
}
