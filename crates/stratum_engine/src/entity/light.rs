//! Point light data

use crate::foundation::math::Color;

/// A 2D point light. The scene indexes lights separately from drawables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light2D {
    /// Light color
    pub color: Color,
    /// Reach in world units
    pub radius: f32,
    /// Intensity multiplier
    pub brightness: f32,
}

impl Light2D {
    /// Create a light
    pub const fn new(color: Color, radius: f32, brightness: f32) -> Self {
        Self { color, radius, brightness }
    }
}

impl Default for Light2D {
    fn default() -> Self {
        Self::new(Color::WHITE, 128.0, 1.0)
    }
}
