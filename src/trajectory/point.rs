//! Integer pixel points

use serde::{Deserialize, Serialize};

/// Integer pixel position on one screen axis
pub type Coordinate = i32;

/// Screen point in integer pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: Coordinate,
    /// Y coordinate
    pub y: Coordinate,
}

impl Point {
    /// Create a new point
    pub const fn new(x: Coordinate, y: Coordinate) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        dx.hypot(dy)
    }

    /// Round a continuous position to the nearest pixel
    pub(crate) fn from_rounded(x: f64, y: f64) -> Self {
        Self {
            x: x.round() as Coordinate,
            y: y.round() as Coordinate,
        }
    }
}

impl From<(Coordinate, Coordinate)> for Point {
    fn from((x, y): (Coordinate, Coordinate)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (Coordinate, Coordinate) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::str::FromStr for Point {
    type Err = String;

    /// Parse `"x,y"` (whitespace around either value is ignored)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected \"x,y\", got: {}", s))?;
        let x = x
            .trim()
            .parse::<Coordinate>()
            .map_err(|e| format!("Invalid x coordinate {:?}: {}", x.trim(), e))?;
        let y = y
            .trim()
            .parse::<Coordinate>()
            .map_err(|e| format!("Invalid y coordinate {:?}: {}", y.trim(), e))?;
        Ok(Self { x, y })
    }
}
