//! In-memory pointer backend
//!
//! Keeps a virtual pointer and logs every call. Used for dry runs by the
//! `windmouse` binary and as a deterministic backend in tests.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::backend::{BackendError, HoldMouseButton, PointerBackend};
use crate::trajectory::{Coordinate, Point};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BackendEvent {
    /// Pointer moved
    Move {
        /// Target x
        x: Coordinate,
        /// Target y
        y: Coordinate,
        /// Requested move duration
        duration_ms: u64,
    },
    /// Button pressed
    Press {
        /// Button pressed
        button: HoldMouseButton,
    },
    /// Button released
    Release {
        /// Button released
        button: HoldMouseButton,
    },
}

/// Virtual pointer that records what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    position: Point,
    held: BTreeSet<HoldMouseButton>,
    events: Vec<BackendEvent>,
    position_queries: usize,
}

impl RecordingBackend {
    /// Pointer at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer at `position`
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Current virtual pointer position
    pub fn position(&self) -> Point {
        self.position
    }

    /// Move the pointer without recording an event (simulates the user)
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Whether `button` is currently held
    pub fn is_held(&self, button: HoldMouseButton) -> bool {
        self.held.contains(&button)
    }

    /// Buttons currently held
    pub fn held(&self) -> impl Iterator<Item = HoldMouseButton> + '_ {
        self.held.iter().copied()
    }

    /// Every recorded call, oldest first
    pub fn events(&self) -> &[BackendEvent] {
        &self.events
    }

    /// Move targets, oldest first
    pub fn moves(&self) -> impl Iterator<Item = Point> + '_ {
        self.events.iter().filter_map(|event| match event {
            BackendEvent::Move { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        })
    }

    /// Number of per-axis position queries served
    pub fn position_queries(&self) -> usize {
        self.position_queries
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<BackendEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PointerBackend for RecordingBackend {
    fn current_pointer_x(&mut self) -> Result<Coordinate, BackendError> {
        self.position_queries += 1;
        Ok(self.position.x)
    }

    fn current_pointer_y(&mut self) -> Result<Coordinate, BackendError> {
        self.position_queries += 1;
        Ok(self.position.y)
    }

    fn move_pointer_to(
        &mut self,
        x: Coordinate,
        y: Coordinate,
        duration: Duration,
    ) -> Result<(), BackendError> {
        trace!("Recording move to ({}, {})", x, y);
        self.position = Point::new(x, y);
        self.events.push(BackendEvent::Move {
            x,
            y,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        });
        Ok(())
    }

    fn press_button(&mut self, button: HoldMouseButton) -> Result<(), BackendError> {
        self.held.insert(button);
        self.events.push(BackendEvent::Press { button });
        Ok(())
    }

    fn release_button(&mut self, button: HoldMouseButton) -> Result<(), BackendError> {
        self.held.remove(&button);
        self.events.push(BackendEvent::Release { button });
        Ok(())
    }
}
