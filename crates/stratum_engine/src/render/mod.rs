//! Render backend boundary
//!
//! The scene never touches GPU resources. Each frame it opens the backend for
//! a camera view, submits textured quads, lines and circles in paint order,
//! then closes the frame. Texture lifetime belongs to
//! [`TextureCache`](crate::assets::TextureCache).

use crate::assets::TextureHandle;
use crate::entity::CameraView;
use crate::foundation::math::{Color, Rect, Vec2};

/// Immediate-mode drawing interface implemented by a concrete renderer
pub trait RenderBackend {
    /// Start a frame as seen through `view`
    fn begin_frame(&mut self, view: &CameraView);

    /// Draw `source` out of `texture` into the world-space `dest` rectangle,
    /// rotated by `rotation_degrees` about `origin` (relative to `dest`'s corner)
    fn draw_texture(
        &mut self,
        texture: TextureHandle,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation_degrees: f32,
        tint: Color,
    );

    /// Draw a world-space line segment
    fn draw_line(&mut self, start: Vec2, end: Vec2, thickness: f32, color: Color);

    /// Draw a world-space filled circle
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Present the frame
    fn end_frame(&mut self);
}

/// A single call captured by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Frame opened
    BeginFrame(CameraView),
    /// Textured quad
    Texture {
        /// Texture drawn from
        texture: TextureHandle,
        /// Source rectangle in texels
        source: Rect,
        /// Destination rectangle in world units
        dest: Rect,
        /// Rotation pivot relative to the destination corner
        origin: Vec2,
        /// Rotation in degrees
        rotation_degrees: f32,
        /// Color modulation
        tint: Color,
    },
    /// Line segment
    Line {
        /// Start point
        start: Vec2,
        /// End point
        end: Vec2,
        /// Line thickness
        thickness: f32,
        /// Line color
        color: Color,
    },
    /// Filled circle
    Circle {
        /// Centre point
        center: Vec2,
        /// Radius
        radius: f32,
        /// Fill color
        color: Color,
    },
    /// Frame closed
    EndFrame,
}

/// Backend that records every call, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingBackend {
    /// Every command recorded since the last [`clear`](Self::clear)
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Destination rectangles of the recorded textured quads, in paint order
    pub fn texture_destinations(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Texture { dest, .. } => Some(*dest),
                _ => None,
            })
            .collect()
    }

    /// Number of completed frames
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Forget recorded commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, view: &CameraView) {
        self.commands.push(DrawCommand::BeginFrame(*view));
    }

    fn draw_texture(
        &mut self,
        texture: TextureHandle,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation_degrees: f32,
        tint: Color,
    ) {
        self.commands.push(DrawCommand::Texture {
            texture,
            source,
            dest,
            origin,
            rotation_degrees,
            tint,
        });
    }

    fn draw_line(&mut self, start: Vec2, end: Vec2, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            thickness,
            color,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn end_frame(&mut self) {
        self.commands.push(DrawCommand::EndFrame);
        self.frames += 1;
    }
}
