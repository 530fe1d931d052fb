//! Pointer motion control
//!
//! Drives a [`PointerBackend`] along WindMouse trajectories.
//!
//! # Architecture
//!
//! ```text
//!  caller ──> MotionController ──tick──> WindMouse (one per target)
//!                    │                        │ next point
//!                    v                        v
//!              PointerBackend <──── move_pointer_to(x, y, speed)
//! ```
//!
//! The controller owns its target and at most one live trajectory.
//! Changing the target discards the trajectory; a new one is built on the
//! next tick, starting from wherever the backend reports the pointer.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use windmouse::controller::{MotionController, RecordingBackend};
//! use windmouse::trajectory::Point;
//!
//! # fn main() -> windmouse::controller::Result<()> {
//! let mut controller = MotionController::builder(RecordingBackend::new())
//!     .target(Point::new(320, 240))
//!     .seed(7)
//!     .build()?;
//!
//! controller.move_to_target(Duration::ZERO, Duration::ZERO)?;
//! assert_eq!(controller.backend().position(), Point::new(320, 240));
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
mod motion;
mod recording;

pub use backend::{BackendError, HoldMouseButton, PointerBackend};
pub use error::{ControllerError, ErrorKind, Result};
pub use motion::{ControllerState, MotionController, MotionControllerBuilder};
pub use recording::{BackendEvent, RecordingBackend};
