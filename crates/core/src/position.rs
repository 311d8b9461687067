//! Grid anchors and continuous pointer coordinates.

use serde::{Deserialize, Serialize};

/// Top-left anchor of a shape's bounding box on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }

    pub fn distance_to(self, point: Point) -> f32 {
        self.to_point().distance_to(point)
    }
}

/// Pointer location in fractional cell units.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<Position> for Point {
    fn from(pos: Position) -> Self {
        pos.to_point()
    }
}
