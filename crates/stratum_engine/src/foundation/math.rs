//! Math utilities and types
//!
//! Provides the 2D vector aliases used across the engine plus a couple of
//! plain value types (`Rect`, `Color`) that are shared by rendering, culling
//! and physics.
//!
//! Rotations are counter-clockwise in mathematical axes:
//!
//! ```text
//! x' = x·cos θ − y·sin θ
//! y' = x·sin θ + y·cos θ
//! ```
//!
//! On a Y-down screen the same rotation reads as clockwise. Every helper that
//! composes rotations goes through [`rotate_vector`].

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

pub use nalgebra::{Point2, Rotation2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Reduce an angle in radians into `[0, 2π)`.
pub fn normalize_radians(radians: f32) -> f32 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Rotate a vector by `radians` about the origin.
pub fn rotate_vector(v: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// 2D cross product (z component of the 3D cross product).
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Axis-aligned rectangle, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width (may be negative for flipped source rects)
    pub width: f32,
    /// Height (may be negative for flipped source rects)
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its corner and extent
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle from a position and a size vector
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Smallest rectangle containing every point
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = points.first()?;
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some(Self::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Extent
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Centre point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// The four corners, clockwise from top-left on a Y-down screen
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x + self.width, self.y + self.height),
            Vec2::new(self.x, self.y + self.height),
        ]
    }

    /// Check if a point lies inside (edges inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Check if two rectangles overlap
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Grow the rectangle by `margin` on every side
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// Opaque red
    pub const RED: Self = Self::rgba(230, 41, 55, 255);
    /// Opaque green
    pub const GREEN: Self = Self::rgba(0, 228, 48, 255);
    /// Opaque yellow
    pub const YELLOW: Self = Self::rgba(253, 249, 0, 255);

    /// Build a color from its channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_radians_wraps_into_range() {
        assert_relative_eq!(normalize_radians(TAU + 0.5), 0.5, epsilon = 1e-5);
        assert_relative_eq!(normalize_radians(-FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1e-5);
        assert!(normalize_radians(-1e-9) < TAU);
        assert_eq!(normalize_radians(0.0), 0.0);
    }

    #[test]
    fn test_rotate_vector_quarter_turn() {
        let rotated = rotate_vector(Vec2::new(5.0, 0.0), FRAC_PI_2);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.y, 5.0, epsilon = 1e-5);

        let back = rotate_vector(Vec2::new(1.0, 2.0), PI);
        assert_relative_eq!(back.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(back.y, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rect_intersects_and_expands() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(15.0, 0.0, 5.0, 5.0);
        assert!(!a.intersects(&b));
        assert!(a.expanded(6.0).intersects(&b));
        assert!(a.contains_point(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_rect_from_points() {
        let rect = Rect::from_points(&[
            Vec2::new(3.0, -1.0),
            Vec2::new(-2.0, 4.0),
            Vec2::new(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(rect, Rect::new(-2.0, -1.0, 5.0, 5.0));
        assert!(Rect::from_points(&[]).is_none());
    }
}
