//! Debug drawing primitives and system

use crate::foundation::math::{Color, Rect, Vec2};
use crate::render::RenderBackend;

/// Debug shape primitives
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// Start point in world space
        start: Vec2,
        /// End point in world space
        end: Vec2,
        /// Line color
        color: Color,
        /// Seconds left to live; zero means a single frame
        duration: f32,
    },

    /// Circle at center with radius
    Circle {
        /// Centre in world space
        center: Vec2,
        /// Radius
        radius: f32,
        /// Fill color
        color: Color,
        /// Seconds left to live; zero means a single frame
        duration: f32,
    },
}

impl DebugShape {
    /// Decrease duration by `delta_time`, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let (Self::Line { duration, .. } | Self::Circle { duration, .. }) = self;
        *duration -= delta_time;
        *duration <= 0.0
    }

    fn submit(&self, backend: &mut dyn RenderBackend) {
        match *self {
            Self::Line { start, end, color, .. } => backend.draw_line(start, end, 1.0, color),
            Self::Circle { center, radius, color, .. } => {
                backend.draw_circle(center, radius, color);
            }
        }
    }
}

/// Queue of short-lived debug shapes
#[derive(Debug)]
pub struct DebugDrawSystem {
    shapes: Vec<DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub const fn new() -> Self {
        Self {
            shapes: Vec::new(),
            enabled: true,
        }
    }

    /// Queue a line segment
    pub fn draw_line(&mut self, start: Vec2, end: Vec2, color: Color, duration: f32) {
        if self.enabled {
            self.shapes.push(DebugShape::Line { start, end, color, duration });
        }
    }

    /// Queue a circle
    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, duration: f32) {
        if self.enabled {
            self.shapes.push(DebugShape::Circle { center, radius, color, duration });
        }
    }

    /// Queue a closed outline through `points`
    pub fn draw_polygon(&mut self, points: &[Vec2], color: Color, duration: f32) {
        for (i, &start) in points.iter().enumerate() {
            let end = points[(i + 1) % points.len()];
            self.draw_line(start, end, color, duration);
        }
    }

    /// Queue the outline of a rectangle
    pub fn draw_rect(&mut self, rect: Rect, color: Color, duration: f32) {
        self.draw_polygon(&rect.corners(), color, duration);
    }

    /// Submit every queued shape, then age them and drop the expired ones
    pub fn flush(&mut self, delta_time: f32, backend: &mut dyn RenderBackend) {
        if !self.enabled {
            self.shapes.clear();
            return;
        }
        for shape in &self.shapes {
            shape.submit(backend);
        }
        self.shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get the number of queued shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Drop every queued shape
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingBackend};

    #[test]
    fn test_single_frame_shapes_expire_after_flush() {
        let mut debug = DebugDrawSystem::new();
        debug.draw_line(Vec2::zeros(), Vec2::new(1.0, 0.0), Color::RED, 0.0);
        debug.draw_circle(Vec2::zeros(), 2.0, Color::GREEN, 1.0);

        let mut backend = RecordingBackend::default();
        debug.flush(0.5, &mut backend);
        assert_eq!(backend.commands().len(), 2);
        assert_eq!(debug.shape_count(), 1);

        debug.flush(0.5, &mut backend);
        assert_eq!(debug.shape_count(), 0);
    }

    #[test]
    fn test_rect_outline_is_four_lines() {
        let mut debug = DebugDrawSystem::new();
        debug.draw_rect(Rect::new(0.0, 0.0, 4.0, 2.0), Color::YELLOW, 0.0);

        let mut backend = RecordingBackend::default();
        debug.flush(0.016, &mut backend);
        let lines = backend
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 4);
    }

    #[test]
    fn test_disabled_system_ignores_shapes() {
        let mut debug = DebugDrawSystem::new();
        debug.enabled = false;
        debug.draw_circle(Vec2::zeros(), 1.0, Color::WHITE, 5.0);
        assert_eq!(debug.shape_count(), 0);
    }
}
