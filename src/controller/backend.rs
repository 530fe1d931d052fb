//! Pointer backend capability
//!
//! A backend is whatever actually moves the OS pointer: an automation
//! bridge, a virtual input device, a remote-desktop channel. The controller
//! only needs five primitives from it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trajectory::Coordinate;

/// Pointer button that can be held for a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldMouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

impl HoldMouseButton {
    /// Lowercase button name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
        }
    }
}

impl std::fmt::Display for HoldMouseButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HoldMouseButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" | "primary" => Ok(Self::Left),
            "right" | "r" | "secondary" => Ok(Self::Right),
            "middle" | "m" | "wheel" => Ok(Self::Middle),
            _ => Err(format!("Unknown mouse button: {}", s)),
        }
    }
}

/// Errors raised by pointer backends
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend cannot be reached or is not initialized
    #[error("Pointer backend unavailable: {0}")]
    Unavailable(String),

    /// Current pointer position could not be read
    #[error("Failed to query pointer position: {0}")]
    PositionUnavailable(String),

    /// Pointer move was rejected
    #[error("Failed to move pointer to ({x}, {y}): {reason}")]
    MoveFailed {
        /// Requested x coordinate
        x: Coordinate,
        /// Requested y coordinate
        y: Coordinate,
        /// Backend-specific reason
        reason: String,
    },

    /// Button press or release was rejected
    #[error("Failed to {action} {button} button: {reason}")]
    ButtonFailed {
        /// Button involved
        button: HoldMouseButton,
        /// "press" or "release"
        action: &'static str,
        /// Backend-specific reason
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability set a [`MotionController`](super::MotionController) drives
///
/// Implementations are plain I/O shims; they should not retry internally.
#[cfg_attr(test, mockall::automock)]
pub trait PointerBackend {
    /// Current pointer x position in screen pixels
    fn current_pointer_x(&mut self) -> Result<Coordinate, BackendError>;

    /// Current pointer y position in screen pixels
    fn current_pointer_y(&mut self) -> Result<Coordinate, BackendError>;

    /// Move the pointer to `(x, y)`, taking roughly `duration`
    fn move_pointer_to(
        &mut self,
        x: Coordinate,
        y: Coordinate,
        duration: Duration,
    ) -> Result<(), BackendError>;

    /// Press and hold `button`
    fn press_button(&mut self, button: HoldMouseButton) -> Result<(), BackendError>;

    /// Release `button`
    fn release_button(&mut self, button: HoldMouseButton) -> Result<(), BackendError>;
}

impl<B: PointerBackend + ?Sized> PointerBackend for &mut B {
    fn current_pointer_x(&mut self) -> Result<Coordinate, BackendError> {
        (**self).current_pointer_x()
    }

    fn current_pointer_y(&mut self) -> Result<Coordinate, BackendError> {
        (**self).current_pointer_y()
    }

    fn move_pointer_to(
        &mut self,
        x: Coordinate,
        y: Coordinate,
        duration: Duration,
    ) -> Result<(), BackendError> {
        (**self).move_pointer_to(x, y, duration)
    }

    fn press_button(&mut self, button: HoldMouseButton) -> Result<(), BackendError> {
        (**self).press_button(button)
    }

    fn release_button(&mut self, button: HoldMouseButton) -> Result<(), BackendError> {
        (**self).release_button(button)
    }
}

impl<B: PointerBackend + ?Sized> PointerBackend for Box<B> {
    fn current_pointer_x(&mut self) -> Result<Coordinate, BackendError> {
        (**self).current_pointer_x()
    }

    fn current_pointer_y(&mut self) -> Result<Coordinate, BackendError> {
        (**self).current_pointer_y()
    }

    fn move_pointer_to(
        &mut self,
        x: Coordinate,
        y: Coordinate,
        duration: Duration,
    ) -> Result<(), BackendError> {
        (**self).move_pointer_to(x, y, duration)
    }

    fn press_button(&mut self, button: HoldMouseButton) -> Result<(), BackendError> {
        (**self).press_button(button)
    }

    fn release_button(&mut self, button: HoldMouseButton) -> Result<(), BackendError> {
        (**self).release_button(button)
    }
}
