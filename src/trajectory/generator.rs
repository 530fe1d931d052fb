//! WindMouse simulation
//!
//! The generator is an explicit state machine over a continuous
//! position/velocity/wind state. Each call to [`Iterator::next`] runs
//! simulation steps until the rounded position lands on a new pixel, so the
//! work done per emitted point is bounded by how many silent sub-pixel steps
//! the physics takes.

use std::iter::FusedIterator;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{trace, warn};

use super::error::{Result, TrajectoryError};
use super::params::PhysicalParameters;
use super::point::Point;

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Below this live max step the damped regime re-rolls a fresh one
const MIN_SETTLING_STEP: f64 = 3.0;

/// Simulation stops once the cursor is closer than this (pixels)
const ARRIVAL_DISTANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Physics still running
    Simulating,
    /// Physics finished; destination may still need emitting
    Settling,
    /// Nothing left to yield
    Exhausted,
}

/// Lazy, single-use WindMouse trajectory
///
/// Yields integer pixel points from near `start` to exactly `dest`. The
/// start point itself is never yielded, and two consecutive points are never
/// equal. Once exhausted the iterator keeps returning `None`; build a new
/// generator for a new path.
#[derive(Debug, Clone)]
pub struct WindMouse<R = StdRng> {
    start: Point,
    dest: Point,
    params: PhysicalParameters,

    /// Live velocity clip; shrinks during the damped approach
    max_step: f64,

    /// Optional upper bound on simulation steps
    max_steps: Option<usize>,

    position: (f64, f64),
    velocity: (f64, f64),
    wind: (f64, f64),

    /// Last point handed out (initially the start point)
    last_emitted: Point,

    steps: usize,
    phase: Phase,
    truncated: bool,
    rng: R,
}

impl WindMouse<StdRng> {
    /// Create a generator seeded from OS entropy
    pub fn new(start: Point, dest: Point, params: PhysicalParameters) -> Result<Self> {
        Self::with_rng(start, dest, params, StdRng::from_entropy())
    }

    /// Create a reproducible generator from a seed
    pub fn seeded(
        start: Point,
        dest: Point,
        params: PhysicalParameters,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(start, dest, params, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WindMouse<R> {
    /// Create a generator drawing its noise from `rng`
    ///
    /// Fails with [`TrajectoryError::InvalidParameter`] if any parameter is
    /// outside its domain.
    pub fn with_rng(start: Point, dest: Point, params: PhysicalParameters, rng: R) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            start,
            dest,
            params,
            max_step: params.max_step,
            max_steps: None,
            position: (start.x as f64, start.y as f64),
            velocity: (0.0, 0.0),
            wind: (0.0, 0.0),
            last_emitted: start,
            steps: 0,
            phase: Phase::Simulating,
            truncated: false,
            rng,
        })
    }

    /// Bound the number of simulation steps.
    ///
    /// When the bound is reached the simulation stops and the generator
    /// finishes by yielding the destination. `None` removes the bound.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Result<Self> {
        check_step_bound(max_steps)?;
        self.max_steps = max_steps;
        Ok(self)
    }

    /// Start point of the path
    pub fn start(&self) -> Point {
        self.start
    }

    /// Destination of the path
    pub fn destination(&self) -> Point {
        self.dest
    }

    /// Parameters the generator was built with
    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    /// Number of simulation steps run so far (including silent ones)
    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// Whether the step bound cut the simulation short
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Whether every point has been yielded
    pub fn is_exhausted(&self) -> bool {
        self.phase == Phase::Exhausted
    }

    fn remaining_distance(&self) -> f64 {
        let dx = self.dest.x as f64 - self.position.0;
        let dy = self.dest.y as f64 - self.position.1;
        dx.hypot(dy)
    }

    /// Uniform draw in [-1, 1)
    fn unit_noise(&mut self) -> f64 {
        2.0 * self.rng.gen::<f64>() - 1.0
    }

    /// Advance the simulation by one step and return the rounded position
    fn step(&mut self, dist: f64) -> Point {
        let wind_current = self.params.wind_magnitude.min(dist);

        if dist >= self.params.damped_distance {
            self.wind.0 = self.wind.0 / SQRT_3 + self.unit_noise() * wind_current / SQRT_5;
            self.wind.1 = self.wind.1 / SQRT_3 + self.unit_noise() * wind_current / SQRT_5;
        } else {
            self.wind.0 /= SQRT_3;
            self.wind.1 /= SQRT_3;
            if self.max_step < MIN_SETTLING_STEP {
                self.max_step = self.rng.gen::<f64>() * 3.0 + MIN_SETTLING_STEP;
            } else {
                self.max_step /= SQRT_5;
            }
        }

        let gravity = self.params.gravity_magnitude;
        self.velocity.0 += self.wind.0 + gravity * (self.dest.x as f64 - self.position.0) / dist;
        self.velocity.1 += self.wind.1 + gravity * (self.dest.y as f64 - self.position.1) / dist;

        let speed = self.velocity.0.hypot(self.velocity.1);
        if speed > self.max_step {
            let clip = self.max_step / 2.0 + self.rng.gen::<f64>() * self.max_step / 2.0;
            self.velocity.0 = self.velocity.0 / speed * clip;
            self.velocity.1 = self.velocity.1 / speed * clip;
        }

        self.position.0 += self.velocity.0;
        self.position.1 += self.velocity.1;
        self.steps += 1;

        Point::from_rounded(self.position.0, self.position.1)
    }
}

impl<R: Rng> Iterator for WindMouse<R> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        loop {
            match self.phase {
                Phase::Simulating => {
                    let dist = self.remaining_distance();
                    if dist < ARRIVAL_DISTANCE {
                        self.phase = Phase::Settling;
                        continue;
                    }

                    if let Some(limit) = self.max_steps {
                        if self.steps >= limit {
                            warn!(
                                "Trajectory {} -> {} hit the {}-step bound {:.1}px short",
                                self.start, self.dest, limit, dist
                            );
                            self.truncated = true;
                            self.phase = Phase::Settling;
                            continue;
                        }
                    }

                    let point = self.step(dist);
                    if point != self.last_emitted {
                        trace!(
                            "WindMouse step {}: {} dist={:.1} max_step={:.2}",
                            self.steps,
                            point,
                            dist,
                            self.max_step
                        );
                        self.last_emitted = point;
                        return Some(point);
                    }
                }
                Phase::Settling => {
                    self.phase = Phase::Exhausted;
                    if self.last_emitted != self.dest {
                        self.last_emitted = self.dest;
                        return Some(self.dest);
                    }
                }
                Phase::Exhausted => return None,
            }
        }
    }
}

impl<R: Rng> FusedIterator for WindMouse<R> {}

/// Reject a zero step bound
pub(crate) fn check_step_bound(max_steps: Option<usize>) -> Result<()> {
    match max_steps {
        Some(0) => Err(TrajectoryError::invalid(
            "max_steps",
            0.0,
            "must be greater than zero",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(start: Point, dest: Point, seed: u64) -> Vec<Point> {
        WindMouse::seeded(start, dest, PhysicalParameters::default(), seed)
            .unwrap()
            .collect()
    }

    #[test]
    fn test_reference_scenario() {
        let dest = Point::new(100, 0);
        let points = path(Point::new(0, 0), dest, 42);

        assert!(points.len() > 1, "Path should not be a single jump");
        assert!(points.len() < 500, "Path too long: {}", points.len());
        assert_eq!(*points.last().unwrap(), dest);
    }

    #[test]
    fn test_same_start_and_destination() {
        let p = Point::new(250, 250);
        let mut generator = WindMouse::seeded(p, p, PhysicalParameters::default(), 1).unwrap();

        assert_eq!(generator.next(), None);
        assert!(generator.is_exhausted());
        assert_eq!(generator.step_count(), 0);
    }

    #[test]
    fn test_adjacent_destination() {
        // One pixel away is still a full simulation (the first step overshoots)
        let dest = Point::new(11, 10);
        let points = path(Point::new(10, 10), dest, 3);
        assert!(!points.is_empty());
        assert_eq!(points.last(), Some(&dest));
    }

    #[test]
    fn test_no_consecutive_duplicates() {
        for seed in 0..20 {
            let start = Point::new(0, 0);
            let points = path(start, Point::new(640, -380), seed);

            assert_ne!(points[0], start, "Start point must not be re-emitted");
            for pair in points.windows(2) {
                assert_ne!(pair[0], pair[1], "Duplicate point with seed {}", seed);
            }
        }
    }

    #[test]
    fn test_ends_at_destination() {
        for seed in 0..20 {
            let dest = Point::new(-731, 1299);
            let points = path(Point::new(1500, 20), dest, seed);
            assert_eq!(points.last(), Some(&dest));
        }
    }

    #[test]
    fn test_seeded_paths_are_reproducible() {
        let a = path(Point::new(5, 5), Point::new(900, 400), 1234);
        let b = path(Point::new(5, 5), Point::new(900, 400), 1234);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = path(Point::new(0, 0), Point::new(1200, 800), 1);
        let b = path(Point::new(0, 0), Point::new(1200, 800), 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_distance_trend_decreases() {
        let dest = Point::new(800, 600);
        let points = path(Point::new(0, 0), dest, 99);
        let half = points.len() / 2;

        let mean = |slice: &[Point]| {
            slice.iter().map(|p| p.distance_to(dest)).sum::<f64>() / slice.len() as f64
        };

        assert!(mean(&points[..half]) > mean(&points[half..]));
    }

    #[test]
    fn test_step_size_bounded_by_max_step() {
        let params = PhysicalParameters::default();
        let points: Vec<Point> = WindMouse::seeded(Point::new(0, 0), Point::new(1000, 0), params, 5)
            .unwrap()
            .collect();

        // Final snap to the destination can add up to ~1.5px on top of a step
        let limit = params.max_step + 2.0;
        let mut previous = Point::new(0, 0);
        for p in points {
            assert!(
                previous.distance_to(p) <= limit,
                "Jump {} -> {} exceeds {}",
                previous,
                p,
                limit
            );
            previous = p;
        }
    }

    #[test]
    fn test_zero_wind_stays_on_line() {
        let params = PhysicalParameters::default().with_wind(0.0);
        let points: Vec<Point> =
            WindMouse::seeded(Point::new(0, 50), Point::new(400, 50), params, 8)
                .unwrap()
                .collect();

        assert!(points.iter().all(|p| p.y == 50));
        assert_eq!(points.last(), Some(&Point::new(400, 50)));
    }

    #[test]
    fn test_invalid_parameters_fail_fast() {
        let bad = PhysicalParameters::default().with_max_step(0.0);
        let err = WindMouse::new(Point::new(0, 0), Point::new(10, 10), bad).unwrap_err();
        assert_eq!(err.parameter(), "max_step");
    }

    #[test]
    fn test_zero_step_bound_rejected() {
        let generator =
            WindMouse::seeded(Point::new(0, 0), Point::new(10, 0), Default::default(), 0).unwrap();
        assert!(generator.with_max_steps(Some(0)).is_err());
    }

    #[test]
    fn test_step_bound_truncates_and_snaps() {
        let dest = Point::new(2000, 0);
        let mut generator = WindMouse::seeded(Point::new(0, 0), dest, Default::default(), 11)
            .unwrap()
            .with_max_steps(Some(5))
            .unwrap();

        let points: Vec<Point> = generator.by_ref().collect();

        assert!(generator.is_truncated());
        assert_eq!(generator.step_count(), 5);
        assert!(points.len() <= 6);
        assert_eq!(points.last(), Some(&dest));
    }

    #[test]
    fn test_fused_after_exhaustion() {
        let mut generator =
            WindMouse::seeded(Point::new(0, 0), Point::new(30, 30), Default::default(), 4)
                .unwrap();
        while generator.next().is_some() {}

        assert!(generator.is_exhausted());
        assert_eq!(generator.next(), None);
        assert_eq!(generator.next(), None);
    }

    #[test]
    fn test_damped_regime_shrinks_max_step() {
        // Starting inside the damped distance skips the free regime entirely
        let mut generator =
            WindMouse::seeded(Point::new(0, 0), Point::new(8, 0), Default::default(), 21)
                .unwrap();
        generator.next();
        assert!(generator.max_step < generator.params().max_step);
    }

    #[test]
    fn test_injected_rng_matches_seeded() {
        let start = Point::new(0, 0);
        let dest = Point::new(60, 80);
        let injected: Vec<Point> =
            WindMouse::with_rng(start, dest, Default::default(), StdRng::seed_from_u64(9))
                .unwrap()
                .collect();
        assert_eq!(injected, path(start, dest, 9));
    }
}
