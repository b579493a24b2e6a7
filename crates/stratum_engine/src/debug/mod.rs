//! Debug module for visualization and debugging tools
//!
//! Overlays are queued on the scene's [`DebugDrawSystem`] and flushed through
//! the render backend after the frame's regular draw list.

pub mod draw;

pub use draw::{DebugDrawSystem, DebugShape};

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Built-in overlays the scene emits every frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct DebugFlags: u32 {
        /// Outline every physics fixture
        const PHYSICS_SHAPES = 1 << 0;
        /// Outline the culling bounds of every drawn sprite
        const SPRITE_BOUNDS = 1 << 1;
        /// Draw a world-space grid under the camera view
        const WORLD_GRID = 1 << 2;
    }
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self::empty()
    }
}
