//! Entities
//!
//! An entity is a node in the scene's [`EntityTree`]: a transform, identity,
//! draw metadata and an [`EntityKind`] carrying what the node actually is.

pub mod behavior;
pub mod camera;
pub mod id;
pub mod kind;
pub mod light;
pub mod node;
pub mod physics_body;
pub mod shape;
pub mod sprite;
pub mod stacked_sprite;
pub mod tilemap;
pub mod transform;
pub mod tree;

pub use behavior::Behavior;
pub use camera::{Camera2D, CameraView, RenderMode, ScaleMode};
pub use id::EntityId;
pub use kind::{EntityKind, EntityType};
pub use light::Light2D;
pub use node::{EntityBuilder, EntityNode, TransformFlags};
pub use physics_body::PhysicsBody;
pub use shape::{ShapeData, ShapeSet};
pub use sprite::{AnimatedSprite, Sprite, SpriteAnimation};
pub use stacked_sprite::StackedSprite;
pub use tilemap::{TileMap, TileMapLayer, TILEMAP_BASE_DRAW_LAYER};
pub use transform::Transform2D;
pub use tree::EntityTree;
