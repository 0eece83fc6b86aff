//! Overlay-local geometry.
//!
//! All coordinates are pixels in the overlay's own space, origin at the
//! top-left of the overlay, y increasing downward. The engine never reads
//! live element geometry; the embedding layer converts client coordinates
//! before events reach it.

use serde::{Deserialize, Serialize};

/// A position in overlay space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle, origin at the top-left corner.
///
/// Zero-area rects are valid: a click-without-drag highlight stores one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Normalize two drag corners (any order) into a min-origin rect with
    /// non-negative size.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    /// Grow the rect by `pad` on every side. Used for tolerant hit testing
    /// so degenerate rects remain clickable.
    pub fn inflate(&self, pad: f32) -> Self {
        Self {
            x: self.x - pad,
            y: self.y - pad,
            width: self.width + pad * 2.0,
            height: self.height + pad * 2.0,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn from_corners_normalizes_reverse_drag() {
        let r = Rect::from_corners(Point::new(110.0, 60.0), Point::new(10.0, 10.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn zero_area_rect_is_valid_and_inflatable() {
        let r = Rect::from_corners(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert!(r.is_empty());
        assert!(!r.contains(Point::new(6.0, 5.0)));
        assert!(r.inflate(2.0).contains(Point::new(6.0, 5.0)));
    }

    #[test]
    fn contains_includes_edges() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(30.0, 30.0)));
        assert!(!r.contains(Point::new(30.1, 30.0)));
    }
}
