//! Local 2D transform

use crate::foundation::math::{normalize_radians, rotate_vector, Vec2};

/// Position, rotation and scale of an entity relative to its parent.
///
/// Rotation is kept in radians and is always normalized into `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Position relative to the parent
    pub position: Vec2,
    rotation: f32,
    /// Scale factors
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create a transform from its parts
    pub fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position,
            rotation: normalize_radians(rotation),
            scale,
        }
    }

    /// Create an unrotated, unscaled transform at `position`
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotation in radians, in `[0, 2π)`
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Rotation in degrees, in `[0, 360)`
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation.to_degrees()
    }

    /// Set the absolute rotation in radians
    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = normalize_radians(radians);
    }

    /// Set the absolute rotation in degrees
    pub fn set_rotation_degrees(&mut self, degrees: f32) {
        self.set_rotation(degrees.to_radians());
    }

    /// Translate along world axes
    pub fn move_global(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Translate along the transform's own rotated axes
    pub fn move_local(&mut self, delta: Vec2) {
        self.position += rotate_vector(delta, self.rotation);
    }

    /// Add to the rotation
    pub fn rotate(&mut self, delta_radians: f32) {
        self.set_rotation(self.rotation + delta_radians);
    }

    /// Add to the rotation, in degrees
    pub fn rotate_degrees(&mut self, delta_degrees: f32) {
        self.rotate(delta_degrees.to_radians());
    }

    /// Multiply the scale component-wise
    pub fn scale_by(&mut self, factor: Vec2) {
        self.scale.component_mul_assign(&factor);
    }

    /// Swing the position about `pivot` and turn by the same angle
    pub fn rotate_around(&mut self, pivot: Vec2, delta_radians: f32) {
        self.position = pivot + rotate_vector(self.position - pivot, delta_radians);
        self.rotate(delta_radians);
    }
}
