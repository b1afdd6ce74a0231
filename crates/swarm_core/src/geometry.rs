use serde::{Deserialize, Serialize};

/// A point in the 2D simulation plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Rectangular area `[0, width] x [0, height]` the swarm lives in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 30.0,
        }
    }
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp both axes of `pos` into the area.
    pub fn clamp(&self, pos: Position) -> Position {
        Position::new(pos.x.clamp(0.0, self.width), pos.y.clamp(0.0, self.height))
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_and_center() {
        let bounds = Bounds::new(10.0, 20.0);
        assert_eq!(bounds.center(), Position::new(5.0, 10.0));

        let clamped = bounds.clamp(Position::new(-1.0, 25.0));
        assert_eq!(clamped, Position::new(0.0, 20.0));
        assert!(bounds.contains(clamped));
    }
}
