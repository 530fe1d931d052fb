//! Motion Controller
//!
//! Steps a pointer along WindMouse trajectories one point at a time.
//!
//! # State Machine
//!
//! ```text
//!            set_target                 tick → point
//!   Idle ─────────────────> HasTarget ─────────────┐
//!     ^                      │   ^  ^              │
//!     │ clear_target         │   │  └──────────────┘
//!     └──────────────────────┤   │ set_target
//!                            │   │
//!              tick → none   v   │
//!                           Done ┘
//! ```
//!
//! The trajectory for a target is built lazily on the first `tick` after the
//! target is set. That is also when an unset start position is read from the
//! backend, so pointer movement between construction and the first tick is
//! respected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::backend::{HoldMouseButton, PointerBackend};
use super::error::{ControllerError, Result};
use crate::trajectory::{check_step_bound, Coordinate, PhysicalParameters, Point, WindMouse};

/// Observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No target configured
    Idle,
    /// Target configured and not yet reached
    HasTarget,
    /// Trajectory for the current target fully traversed
    Done,
}

impl std::fmt::Display for ControllerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::HasTarget => write!(f, "HasTarget"),
            Self::Done => write!(f, "Done"),
        }
    }
}

#[derive(Debug)]
enum Motion<R> {
    Idle,
    /// Target set, trajectory not built yet
    Pending(Point),
    Moving(WindMouse<R>),
    Done,
}

/// Stateful pointer driver over a [`PointerBackend`]
///
/// Owns the destination and at most one live trajectory. Each
/// [`tick`](Self::tick) pulls one point and forwards it to the backend.
///
/// A controller is meant for one caller at a time; every operation takes
/// `&mut self`.
#[derive(Debug)]
pub struct MotionController<B, R = StdRng> {
    backend: B,
    params: PhysicalParameters,
    max_steps: Option<usize>,

    /// Explicit start, used by the next trajectory only
    start_x: Option<Coordinate>,
    start_y: Option<Coordinate>,

    target: Option<Point>,
    motion: Motion<R>,
    last_point: Option<Point>,

    /// Parent RNG; each trajectory gets a child seeded from it
    rng: R,
}

impl<B: PointerBackend> MotionController<B> {
    /// Create a controller with default parameters and no target
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            params: PhysicalParameters::default(),
            max_steps: None,
            start_x: None,
            start_y: None,
            target: None,
            motion: Motion::Idle,
            last_point: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Start building a controller around `backend`
    pub fn builder(backend: B) -> MotionControllerBuilder<B> {
        MotionControllerBuilder::new(backend)
    }
}

impl<B: PointerBackend, R: Rng + SeedableRng> MotionController<B, R> {
    /// Current state
    pub fn state(&self) -> ControllerState {
        match self.motion {
            Motion::Idle => ControllerState::Idle,
            Motion::Pending(_) | Motion::Moving(_) => ControllerState::HasTarget,
            Motion::Done => ControllerState::Done,
        }
    }

    /// Configured destination, regardless of progress
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    /// Destination x coordinate
    pub fn x(&self) -> Option<Coordinate> {
        self.target.map(|p| p.x)
    }

    /// Destination y coordinate
    pub fn y(&self) -> Option<Coordinate> {
        self.target.map(|p| p.y)
    }

    /// Last point successfully sent to the backend
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Live trajectory, if one has been built for the current target
    pub fn trajectory(&self) -> Option<&WindMouse<R>> {
        match &self.motion {
            Motion::Moving(trajectory) => Some(trajectory),
            _ => None,
        }
    }

    /// Physical parameters used for new trajectories
    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    /// Replace the physical parameters.
    ///
    /// Takes effect for the next trajectory; a trajectory already in flight
    /// keeps its parameters.
    pub fn set_params(&mut self, params: PhysicalParameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Bound simulation steps for new trajectories
    pub fn set_max_steps(&mut self, max_steps: Option<usize>) -> Result<()> {
        check_step_bound(max_steps)?;
        self.max_steps = max_steps;
        Ok(())
    }

    /// Use `start` instead of the backend position for the next trajectory
    pub fn set_start(&mut self, start: Point) {
        self.start_x = Some(start.x);
        self.start_y = Some(start.y);
    }

    /// Set or change the destination, discarding any trajectory in flight
    pub fn set_target(&mut self, target: Point) {
        if let Motion::Moving(trajectory) = &self.motion {
            debug!(
                "Retargeting {} -> {} (was heading to {})",
                self.last_point
                    .map_or_else(|| "?".to_string(), |p| p.to_string()),
                target,
                trajectory.destination()
            );
        } else {
            debug!("Target set to {}", target);
        }

        self.target = Some(target);
        self.motion = Motion::Pending(target);
    }

    /// Forget the destination and return to `Idle`
    pub fn clear_target(&mut self) {
        self.target = None;
        self.motion = Motion::Idle;
    }

    /// Advance the pointer by one trajectory point.
    ///
    /// Returns `Ok(true)` after one backend move, `Ok(false)` when there is
    /// nothing to do (no target, or the target was already reached). Backend
    /// errors are returned as-is; the trajectory stays positioned after the
    /// point that failed, so ticking again resumes the path.
    pub fn tick(&mut self, step_duration: Duration) -> Result<bool> {
        if let Motion::Pending(dest) = self.motion {
            let trajectory = self.build_trajectory(dest)?;
            self.motion = Motion::Moving(trajectory);
        }

        let Motion::Moving(trajectory) = &mut self.motion else {
            return Ok(false);
        };

        match trajectory.next() {
            Some(point) => {
                self.backend
                    .move_pointer_to(point.x, point.y, step_duration)?;
                self.last_point = Some(point);
                Ok(true)
            }
            None => {
                debug!(
                    "Reached {} after {} simulation steps{}",
                    trajectory.destination(),
                    trajectory.step_count(),
                    if trajectory.is_truncated() {
                        " (truncated)"
                    } else {
                        ""
                    }
                );
                self.motion = Motion::Done;
                Ok(false)
            }
        }
    }

    /// Tick until the target is reached, sleeping `delay` after every move.
    ///
    /// `speed` is passed to each backend move as its duration. Blocks the
    /// calling thread. The first error aborts the loop and is returned.
    pub fn move_to_target(&mut self, delay: Duration, speed: Duration) -> Result<()> {
        while self.tick(speed)? {
            pause(delay);
        }
        Ok(())
    }

    /// Like [`move_to_target`](Self::move_to_target), but stops early once
    /// `cancel` is set.
    ///
    /// Returns `Ok(true)` if the target was reached and `Ok(false)` if the
    /// loop was cancelled. A cancelled traversal can be resumed by ticking.
    pub fn move_to_target_cancellable(
        &mut self,
        delay: Duration,
        speed: Duration,
        cancel: &AtomicBool,
    ) -> Result<bool> {
        loop {
            if cancel.load(Ordering::Relaxed) {
                debug!("Traversal cancelled at {:?}", self.last_point);
                return Ok(false);
            }
            if !self.tick(speed)? {
                return Ok(true);
            }
            pause(delay);
        }
    }

    /// Async variant of [`move_to_target`](Self::move_to_target) that sleeps
    /// on the tokio timer between ticks.
    pub async fn move_to_target_async(&mut self, delay: Duration, speed: Duration) -> Result<()> {
        while self.tick(speed)? {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(())
    }

    /// Press and hold `button`
    pub fn hold(&mut self, button: HoldMouseButton) -> Result<()> {
        debug!("Holding {} button", button);
        self.backend.press_button(button)?;
        Ok(())
    }

    /// Release `button`
    pub fn release(&mut self, button: HoldMouseButton) -> Result<()> {
        debug!("Releasing {} button", button);
        self.backend.release_button(button)?;
        Ok(())
    }

    /// Hold `button`, travel to `target`, release.
    ///
    /// If the traversal fails the button is released before the traversal
    /// error is returned; a failing release at that point is only logged.
    pub fn drag_to(
        &mut self,
        button: HoldMouseButton,
        target: Point,
        delay: Duration,
        speed: Duration,
    ) -> Result<()> {
        self.hold(button)?;
        self.set_target(target);

        if let Err(e) = self.move_to_target(delay, speed) {
            if let Err(release_error) = self.backend.release_button(button) {
                warn!(
                    "Failed to release {} button after aborted drag: {}",
                    button, release_error
                );
            }
            return Err(e);
        }

        self.release(button)
    }

    /// Shared access to the backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Exclusive access to the backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consume the controller and return the backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn build_trajectory(&mut self, dest: Point) -> Result<WindMouse<R>> {
        let start = self.resolve_start()?;
        let rng = R::seed_from_u64(self.rng.gen());
        let trajectory =
            WindMouse::with_rng(start, dest, self.params, rng)?.with_max_steps(self.max_steps)?;

        debug!(
            "Trajectory {} -> {} ({:.1}px)",
            start,
            dest,
            start.distance_to(dest)
        );
        Ok(trajectory)
    }

    /// Explicit start if one is pending, backend position for missing axes
    fn resolve_start(&mut self) -> Result<Point> {
        let x = match self.start_x {
            Some(x) => x,
            None => self.backend.current_pointer_x()?,
        };
        let y = match self.start_y {
            Some(y) => y,
            None => self.backend.current_pointer_y()?,
        };

        self.start_x = None;
        self.start_y = None;
        Ok(Point::new(x, y))
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

/// Builder for [`MotionController`]
///
/// ```rust
/// use windmouse::controller::{MotionController, RecordingBackend};
/// use windmouse::trajectory::Point;
///
/// let controller = MotionController::builder(RecordingBackend::new())
///     .start(Point::new(0, 0))
///     .target(Point::new(200, 150))
///     .gravity_magnitude(7.0)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert_eq!(controller.target(), Some(Point::new(200, 150)));
/// ```
#[derive(Debug)]
pub struct MotionControllerBuilder<B, R = StdRng> {
    backend: B,
    start_x: Option<Coordinate>,
    start_y: Option<Coordinate>,
    dest_x: Option<Coordinate>,
    dest_y: Option<Coordinate>,
    params: PhysicalParameters,
    max_steps: Option<usize>,
    rng: Option<R>,
}

impl<B: PointerBackend> MotionControllerBuilder<B> {
    /// Create a builder with default parameters
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            start_x: None,
            start_y: None,
            dest_x: None,
            dest_y: None,
            params: PhysicalParameters::default(),
            max_steps: None,
            rng: None,
        }
    }
}

impl<B: PointerBackend, R: Rng + SeedableRng> MotionControllerBuilder<B, R> {
    /// Explicit start point (otherwise read from the backend on first tick)
    pub fn start(mut self, start: Point) -> Self {
        self.start_x = Some(start.x);
        self.start_y = Some(start.y);
        self
    }

    /// Explicit start x coordinate
    pub fn start_x(mut self, x: Coordinate) -> Self {
        self.start_x = Some(x);
        self
    }

    /// Explicit start y coordinate
    pub fn start_y(mut self, y: Coordinate) -> Self {
        self.start_y = Some(y);
        self
    }

    /// Destination point
    pub fn target(mut self, target: Point) -> Self {
        self.dest_x = Some(target.x);
        self.dest_y = Some(target.y);
        self
    }

    /// Destination x coordinate
    pub fn dest_x(mut self, x: Coordinate) -> Self {
        self.dest_x = Some(x);
        self
    }

    /// Destination y coordinate
    pub fn dest_y(mut self, y: Coordinate) -> Self {
        self.dest_y = Some(y);
        self
    }

    /// All physical parameters at once
    pub fn params(mut self, params: PhysicalParameters) -> Self {
        self.params = params;
        self
    }

    /// Gravity magnitude
    pub fn gravity_magnitude(mut self, gravity_magnitude: f64) -> Self {
        self.params.gravity_magnitude = gravity_magnitude;
        self
    }

    /// Wind magnitude
    pub fn wind_magnitude(mut self, wind_magnitude: f64) -> Self {
        self.params.wind_magnitude = wind_magnitude;
        self
    }

    /// Maximum step
    pub fn max_step(mut self, max_step: f64) -> Self {
        self.params.max_step = max_step;
        self
    }

    /// Damped distance
    pub fn damped_distance(mut self, damped_distance: f64) -> Self {
        self.params.damped_distance = damped_distance;
        self
    }

    /// Simulation step bound per trajectory
    pub fn max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Seed the controller for reproducible trajectories
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(R::seed_from_u64(seed));
        self
    }

    /// Use a specific random source (possibly of another type)
    pub fn rng<R2: Rng + SeedableRng>(self, rng: R2) -> MotionControllerBuilder<B, R2> {
        MotionControllerBuilder {
            backend: self.backend,
            start_x: self.start_x,
            start_y: self.start_y,
            dest_x: self.dest_x,
            dest_y: self.dest_y,
            params: self.params,
            max_steps: self.max_steps,
            rng: Some(rng),
        }
    }

    /// Validate and build the controller.
    ///
    /// Fails on invalid physical parameters, a zero step bound, or a
    /// destination with only one axis set. Never touches the backend.
    pub fn build(self) -> Result<MotionController<B, R>> {
        self.params.validate()?;
        check_step_bound(self.max_steps)?;

        let target = match (self.dest_x, self.dest_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            (None, None) => None,
            (Some(_), None) => return Err(ControllerError::IncompleteTarget("y")),
            (None, Some(_)) => return Err(ControllerError::IncompleteTarget("x")),
        };

        let motion = match target {
            Some(target) => Motion::Pending(target),
            None => Motion::Idle,
        };

        Ok(MotionController {
            backend: self.backend,
            params: self.params,
            max_steps: self.max_steps,
            start_x: self.start_x,
            start_y: self.start_y,
            target,
            motion,
            last_point: None,
            rng: self.rng.unwrap_or_else(R::from_entropy),
        })
    }
}
