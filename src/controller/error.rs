//! Controller Error Types

use thiserror::Error;

use super::backend::BackendError;
use crate::trajectory::TrajectoryError;

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Motion controller errors
///
/// Running out of points is not an error; `tick` reports it as `Ok(false)`.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Physical parameters rejected while building a trajectory
    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),

    /// Backend failure, passed through untouched
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Only one axis of the destination was configured
    #[error("Incomplete target: {0} coordinate is missing")]
    IncompleteTarget(&'static str),
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid parameters or construction input
    Configuration,
    /// Backend I/O failure
    Backend,
}

impl ControllerError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ControllerError::Trajectory(_) | ControllerError::IncompleteTarget(_) => {
                ErrorKind::Configuration
            }
            ControllerError::Backend(_) => ErrorKind::Backend,
        }
    }
}
