use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Tolerance used when comparing layout coordinates.
pub const EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Position) -> Position {
        Position::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    pub fn min(self, other: Position) -> Position {
        Position::new(self.x.min(other.x), self.y.min(other.y))
    }
}

impl Add<Size> for Position {
    type Output = Position;

    fn add(self, rhs: Size) -> Position {
        Position::new(self.x + rhs.width, self.y + rhs.height)
    }
}

impl Sub for Position {
    type Output = Size;

    fn sub(self, rhs: Position) -> Size {
        Size::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.width.abs() < EPSILON && self.height.abs() < EPSILON
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn from_corners(left_top: Position, right_bottom: Position) -> Self {
        Self::new(
            left_top.x,
            left_top.y,
            (right_bottom.x - left_top.x).max(0.0),
            (right_bottom.y - left_top.y).max(0.0),
        )
    }

    pub fn left_top(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn right_bottom(&self) -> Position {
        Position::new(self.right(), self.bottom())
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_corners(
            self.left_top().min(other.left_top()),
            self.right_bottom().max(other.right_bottom()),
        )
    }

    /// Clips this rectangle so that its right-bottom corner does not exceed `limit`.
    pub fn clip_to(&self, limit: Position) -> Rect {
        Rect::from_corners(self.left_top(), self.right_bottom().min(limit))
    }

    /// Returns which axis (if any) this rectangle crosses when bounded by `limit`.
    /// The vertical axis is reported first, since it decides pagination.
    pub fn crossing(&self, limit: Position) -> Option<Axis> {
        if self.bottom() > limit.y + EPSILON {
            Some(Axis::Y)
        } else if self.right() > limit.x + EPSILON {
            Some(Axis::X)
        } else {
            None
        }
    }
}

/// Direction in which a layout places consecutive children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_to_limits_right_bottom_only() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        let clipped = rect.clip_to(Position::new(50.0, 200.0));
        assert_eq!(clipped, Rect::new(10.0, 10.0, 40.0, 100.0));
    }

    #[test]
    fn test_crossing_prefers_vertical_axis() {
        let rect = Rect::new(0.0, 0.0, 120.0, 120.0);
        assert_eq!(rect.crossing(Position::new(100.0, 100.0)), Some(Axis::Y));
        assert_eq!(rect.crossing(Position::new(100.0, 200.0)), Some(Axis::X));
        assert_eq!(rect.crossing(Position::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_union_spans_both_rects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 20.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 30.0, 25.0));
    }
}
