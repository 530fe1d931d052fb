//! WindMouse trajectory generation
//!
//! Produces human-like cursor paths between two screen points using a small
//! physical simulation. The simulated cursor is pulled toward the destination
//! by a constant-magnitude force (gravity) while a random force (wind) pushes
//! it sideways. Velocity is clipped to a maximum step, and once the cursor is
//! close to the destination the wind dies down and the step size shrinks so
//! the approach settles instead of orbiting.
//!
//! # Physics Model
//!
//! ```text
//! free regime (dist >= damped_distance):
//!     wind = wind / √3 + U(-1, 1) · min(wind_magnitude, dist) / √5
//!
//! damped regime (dist < damped_distance):
//!     wind = wind / √3
//!     max_step = max_step < 3 ? U[3, 6) : max_step / √5
//!
//! velocity += wind + gravity · (dest - pos) / dist
//! |velocity| > max_step  =>  |velocity| = U[max_step / 2, max_step)
//! pos += velocity
//! ```
//!
//! The continuous position is rounded to integer pixels and only new points
//! are emitted, so consecutive points are never equal.
//!
//! # Determinism
//!
//! The random source is injected. Two generators built from the same
//! start, destination, parameters and seed yield identical paths:
//!
//! ```rust
//! use windmouse::trajectory::{PhysicalParameters, Point, WindMouse};
//!
//! let params = PhysicalParameters::default();
//! let a: Vec<Point> = WindMouse::seeded(Point::new(0, 0), Point::new(300, 120), params, 7)
//!     .unwrap()
//!     .collect();
//! let b: Vec<Point> = WindMouse::seeded(Point::new(0, 0), Point::new(300, 120), params, 7)
//!     .unwrap()
//!     .collect();
//! assert_eq!(a, b);
//! assert_eq!(a.last(), Some(&Point::new(300, 120)));
//! ```
//!
//! # Termination
//!
//! The simulation stops once the cursor is within one pixel of the
//! destination. With degenerate parameters (very weak gravity against strong
//! wind) this may take arbitrarily long; [`WindMouse::with_max_steps`] puts an
//! upper bound on the number of simulation steps.

mod error;
mod generator;
mod params;
mod point;

pub use error::{Result, TrajectoryError};
pub use generator::WindMouse;
pub use params::PhysicalParameters;
pub use point::{Coordinate, Point};

pub(crate) use generator::check_step_bound;

/// Default pull strength toward the destination
pub const GRAVITY_MAGNITUDE_DEFAULT: f64 = 9.0;

/// Default strength of the lateral wind fluctuations
pub const WIND_MAGNITUDE_DEFAULT: f64 = 3.0;

/// Default velocity clip threshold (pixels per step)
pub const MAX_STEP_DEFAULT: f64 = 15.0;

/// Default distance below which wind switches from random to damped
pub const DAMPED_DISTANCE_DEFAULT: f64 = 12.0;

/// Generate a complete seeded path from `start` to `dest`.
///
/// Convenience wrapper that drains a [`WindMouse`] into a vector.
pub fn generate_path(
    start: Point,
    dest: Point,
    params: PhysicalParameters,
    seed: u64,
) -> Result<Vec<Point>> {
    Ok(WindMouse::seeded(start, dest, params, seed)?.collect())
}
