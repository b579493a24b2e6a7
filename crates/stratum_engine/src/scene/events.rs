//! Notifications queued by a scene for the embedding application

use crate::entity::EntityId;
use crate::foundation::math::Vec2;

/// Something that happened in a scene since the last drain
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// An entity left the tree for good
    EntityDeleted {
        /// Former ID
        id: EntityId,
        /// Former name
        name: String,
    },
    /// An entity entered a trigger area
    BodyEntered {
        /// Trigger entity
        trigger: EntityId,
        /// Entering entity, if its body has an owner
        other: Option<EntityId>,
        /// Entering entity's name
        name: String,
    },
    /// An entity left a trigger area
    BodyExited {
        /// Trigger entity
        trigger: EntityId,
        /// Leaving entity, if it still exists
        other: Option<EntityId>,
        /// Leaving entity's name
        name: String,
    },
    /// The window changed size
    WindowResized {
        /// New size in pixels
        size: Vec2,
    },
}
