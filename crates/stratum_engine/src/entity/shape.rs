//! Vector shapes drawn in an entity's local space

use crate::foundation::math::{Color, Vec2};
use std::collections::BTreeMap;

/// A single primitive, in the owning entity's local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeData {
    /// Line segment
    Line {
        /// Start point
        start: Vec2,
        /// End point
        end: Vec2,
        /// Stroke thickness
        thickness: f32,
        /// Stroke color
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
}

impl ShapeData {
    /// Farthest distance the primitive reaches from the local origin
    pub fn extent(&self) -> f32 {
        match *self {
            Self::Line { start, end, .. } => start.norm().max(end.norm()),
            Self::Circle { center, radius, .. } => center.norm() + radius,
        }
    }
}

#[derive(Debug, Clone)]
struct ShapeEntry {
    data: ShapeData,
    visible: bool,
}

/// A collection of lines and circles addressed by sequential IDs
#[derive(Debug, Clone, Default)]
pub struct ShapeSet {
    shapes: BTreeMap<u32, ShapeEntry>,
    next_id: u32,
}

impl ShapeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, data: ShapeData) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.shapes.insert(id, ShapeEntry { data, visible: true });
        id
    }

    /// Add a line and return its ID
    pub fn add_line(&mut self, start: Vec2, end: Vec2, thickness: f32, color: Color) -> u32 {
        self.insert(ShapeData::Line { start, end, thickness, color })
    }

    /// Add a circle and return its ID
    pub fn add_circle(&mut self, center: Vec2, radius: f32, color: Color) -> u32 {
        self.insert(ShapeData::Circle { center, radius, color })
    }

    /// Look up a shape
    pub fn get(&self, id: u32) -> Option<&ShapeData> {
        self.shapes.get(&id).map(|entry| &entry.data)
    }

    /// Replace a shape's data in place
    pub fn set(&mut self, id: u32, data: ShapeData) -> bool {
        self.shapes.get_mut(&id).map(|entry| entry.data = data).is_some()
    }

    /// Delete a shape; IDs are not reused
    pub fn remove(&mut self, id: u32) -> bool {
        self.shapes.remove(&id).is_some()
    }

    /// Show or hide one shape
    pub fn set_visible(&mut self, id: u32, visible: bool) -> bool {
        self.shapes.get_mut(&id).map(|entry| entry.visible = visible).is_some()
    }

    /// Whether a shape exists and is shown
    pub fn is_visible(&self, id: u32) -> bool {
        self.shapes.get(&id).is_some_and(|entry| entry.visible)
    }

    /// Shown shapes, in ID order
    pub fn visible(&self) -> impl Iterator<Item = &ShapeData> {
        self.shapes.values().filter(|entry| entry.visible).map(|entry| &entry.data)
    }

    /// Radius around the local origin that contains every shown shape
    pub fn extent(&self) -> f32 {
        self.visible().map(ShapeData::extent).fold(0.0, f32::max)
    }

    /// Number of shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_and_not_reused() {
        let mut shapes = ShapeSet::new();
        let line = shapes.add_line(Vec2::zeros(), Vec2::new(3.0, 4.0), 1.0, Color::WHITE);
        let circle = shapes.add_circle(Vec2::new(1.0, 0.0), 2.0, Color::RED);
        assert_eq!((line, circle), (0, 1));

        assert!(shapes.remove(line));
        assert!(!shapes.remove(line));
        assert_eq!(shapes.add_circle(Vec2::zeros(), 1.0, Color::RED), 2);
    }

    #[test]
    fn test_hidden_shapes_do_not_count() {
        let mut shapes = ShapeSet::new();
        let far = shapes.add_line(Vec2::zeros(), Vec2::new(30.0, 40.0), 1.0, Color::WHITE);
        shapes.add_circle(Vec2::new(1.0, 0.0), 2.0, Color::RED);
        assert_eq!(shapes.extent(), 50.0);

        shapes.set_visible(far, false);
        assert!(!shapes.is_visible(far));
        assert_eq!(shapes.extent(), 3.0);
        assert_eq!(shapes.visible().count(), 1);
    }
}
