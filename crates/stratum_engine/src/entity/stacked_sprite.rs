//! Sprite stacks
//!
//! A stack is a pile of horizontal slices cut from one sheet and drawn bottom
//! to top, each nudged a little further along the view diagonal. Rotating the
//! entity rotates every slice about its own pivot, which reads as a solid
//! object seen from above.

use super::sprite::quad_bounds;
use crate::assets::TextureHandle;
use crate::foundation::math::{Color, Rect, Vec2};

/// A textured slice stack
#[derive(Debug, Clone)]
pub struct StackedSprite {
    /// Sheet the slices are cut from
    pub texture: TextureHandle,
    /// Size of one slice in texels and world units before scaling
    pub slice_size: Vec2,
    /// Number of slices, bottom first
    pub slice_count: u32,
    /// Slices per sheet row
    pub slices_wide: u32,
    /// Top-left texel of the first slice
    pub atlas_start: Vec2,
    /// Pivot relative to a slice's top-left corner
    pub origin: Vec2,
    /// Color modulation
    pub tint: Color,
    /// Per-slice offset overriding the scene-wide one
    pub layer_offset: Option<f32>,
    /// Perspective shift setting overriding the scene-wide one
    pub perspective_shift: Option<bool>,
}

impl StackedSprite {
    /// Stack of `slice_count` slices of `slice_size`, laid out `slices_wide`
    /// to a row starting at the sheet's corner
    pub fn new(texture: TextureHandle, slice_size: Vec2, slice_count: u32, slices_wide: u32) -> Self {
        Self {
            texture,
            slice_size,
            slice_count,
            slices_wide: slices_wide.max(1),
            atlas_start: Vec2::zeros(),
            origin: slice_size * 0.5,
            tint: Color::WHITE,
            layer_offset: None,
            perspective_shift: None,
        }
    }

    /// Cut slices starting at `start` instead of the sheet's corner
    #[must_use]
    pub const fn with_atlas_start(mut self, start: Vec2) -> Self {
        self.atlas_start = start;
        self
    }

    /// Set the pivot
    #[must_use]
    pub const fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Set the tint
    #[must_use]
    pub const fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// Use `offset` per slice whatever the scene default is
    #[must_use]
    pub const fn with_layer_offset(mut self, offset: f32) -> Self {
        self.layer_offset = Some(offset);
        self
    }

    /// Turn the camera-relative perspective shift on or off for this stack
    #[must_use]
    pub const fn with_perspective_shift(mut self, enabled: bool) -> Self {
        self.perspective_shift = Some(enabled);
        self
    }

    /// Source rectangle of slice `index`, reading the sheet row by row
    #[allow(clippy::cast_precision_loss)]
    pub fn slice_source(&self, index: u32) -> Rect {
        let column = (index % self.slices_wide) as f32;
        let row = (index / self.slices_wide) as f32;
        Rect::from_position_size(
            self.atlas_start + Vec2::new(column * self.slice_size.x, row * self.slice_size.y),
            self.slice_size,
        )
    }

    /// World distance between neighbouring slices
    pub fn slice_step(&self, default_offset: f32, scale_y: f32, zoom: f32) -> f32 {
        self.layer_offset.unwrap_or(default_offset) * scale_y * zoom
    }

    /// Whether slices lean away from the screen centre
    pub fn uses_perspective_shift(&self, default: bool) -> bool {
        self.perspective_shift.unwrap_or(default)
    }

    /// Displacement of slice `index`.
    ///
    /// Without a shift every slice moves along the `(1, 1)` diagonal. With
    /// one, `shift` is the entity's normalized screen position and each axis
    /// is pushed against it.
    #[allow(clippy::cast_precision_loss)]
    pub fn slice_offset(&self, index: u32, step: f32, shift: Option<Vec2>) -> Vec2 {
        let distance = step * index as f32;
        let offset = Vec2::new(distance, distance);
        shift.map_or(offset, |shift| offset.component_mul(&-shift))
    }

    /// World-space bounds of the whole stack drawn at `position` with
    /// `scale`, slices `step` apart
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self, position: Vec2, scale: Vec2, step: f32) -> Rect {
        let drift = step.abs() * self.slice_count.saturating_sub(1) as f32;
        quad_bounds(position, self.slice_size, self.origin, scale).expanded(drift)
    }
}
