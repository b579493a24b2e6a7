//! Scenes
//!
//! A [`Scene`] owns an entity tree, the indices over its registered entities,
//! a physics world wired to those entities, and the named resources shared
//! between them. It runs the per-frame update, fixed update, late update and
//! draw passes.

pub mod draw_order;
mod events;
mod frame;
mod physics;
mod render;
mod resources;
mod scene_graph;
mod services;

pub use draw_order::{sort_draw_entries, DrawEntry};
pub use events::SceneEvent;
pub use physics::RaycastHit;
pub use resources::ResourceLocator;
pub use scene_graph::Scene;
pub use services::{SceneServices, Services, SharedInputMap, SharedTextureCache};

use crate::entity::EntityId;
use thiserror::Error;

/// Scene errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// Child index past the end of the child list
    #[error("child index {index} out of bounds for {entity} with {len} children")]
    ChildIndexOutOfBounds {
        /// Parent entity
        entity: EntityId,
        /// Requested index
        index: usize,
        /// Number of children
        len: usize,
    },

    /// No such entity in the scene
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    /// Entity has no physics body
    #[error("entity {0} is not a physics entity")]
    NotPhysical(EntityId),

    /// Entity is not a tilemap
    #[error("entity {0} is not a tilemap")]
    NotTileMap(EntityId),
}
