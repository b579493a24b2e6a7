//! User behavior hooks
//!
//! A behavior is attached to one entity. The scene takes it out of the node
//! while a hook runs, so the hook can freely borrow the scene through
//! [`SceneServices`], including the node it belongs to.

use super::EntityId;
use crate::foundation::math::Vec2;
use crate::physics::Collision;
use crate::scene::SceneServices;

/// Per-entity game logic. Every hook defaults to a no-op.
pub trait Behavior {
    /// The entity was registered with a scene
    fn on_register(&mut self, _entity: EntityId, _scene: &mut dyn SceneServices) {}

    /// Variable-rate update, once per frame
    fn update(&mut self, _entity: EntityId, _scene: &mut dyn SceneServices, _delta_time: f32) {}

    /// Fixed-rate update, after each physics step
    fn fixed_update(&mut self, _entity: EntityId, _scene: &mut dyn SceneServices, _step: f32) {}

    /// Runs after physics, before drawing
    fn late_update(&mut self, _entity: EntityId, _scene: &mut dyn SceneServices, _delta_time: f32) {}

    /// The entity's body started touching another
    fn on_collision_start(&mut self, _collision: &Collision, _scene: &mut dyn SceneServices) {}

    /// The entity's body stopped touching another
    fn on_collision_end(&mut self, _collision: &Collision, _scene: &mut dyn SceneServices) {}

    /// The window changed size. Only cameras receive this.
    fn on_window_resized(&mut self, _entity: EntityId, _scene: &mut dyn SceneServices, _size: Vec2) {}

    /// The entity is being destroyed; the scene is mid-teardown of its
    /// subtree and cannot be touched
    fn on_destroy(&mut self, _entity: EntityId) {}
}
