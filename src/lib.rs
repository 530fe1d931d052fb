//! # windmouse
//!
//! Human-like pointer trajectories using the WindMouse algorithm, plus a
//! controller that steps a real pointer along them.
//!
//! The generator simulates a particle pulled toward the destination by
//! gravity and pushed sideways by a randomly fluctuating wind, emitting the
//! rounded integer positions it passes through.
//!
//! # Architecture
//!
//! ```text
//! windmouse
//!   ├─> trajectory  (WindMouse generator, physical parameters, points)
//!   ├─> controller  (MotionController, PointerBackend, recording backend)
//!   ├─> config      (TOML configuration for the CLI)
//!   └─> utils       (user-facing error formatting)
//! ```
//!
//! # Data Flow
//!
//! **Path generation:** start + destination + parameters + RNG → WindMouse → points
//!
//! **Pointer motion:** MotionController → tick → WindMouse → PointerBackend

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Command-line tool configuration
pub mod config;

/// Stateful pointer motion over a backend
pub mod controller;

/// WindMouse trajectory generation
pub mod trajectory;

/// Utility functions
pub mod utils;

pub use controller::{HoldMouseButton, MotionController, PointerBackend};
pub use trajectory::{generate_path, PhysicalParameters, Point, WindMouse};
