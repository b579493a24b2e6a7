//! Physics helpers addressed by entity

use super::scene_graph::Scene;
use super::SceneError;
use crate::entity::{EntityId, PhysicsBody};
use crate::foundation::math::Vec2;
use crate::physics::{BodyHandle, CollisionBridge, CollisionFilter, CollisionTracker, FixtureDef, PhysicsWorld};

/// One entity crossed by [`Scene::raycast`]
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastHit {
    /// Owning entity, if the body has one
    pub entity: Option<EntityId>,
    /// Owning entity's name
    pub name: Option<String>,
    /// Body hit
    pub body: BodyHandle,
    /// World point of the hit
    pub point: Vec2,
    /// Surface normal at the hit
    pub normal: Vec2,
    /// Fraction along the ray
    pub fraction: f32,
}

impl Scene {
    /// Physics world
    pub const fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Physics world, mutably
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Body ownership table
    pub const fn bridge(&self) -> &CollisionBridge {
        &self.bridge
    }

    /// Tracked physics entities
    pub const fn tracker(&self) -> &CollisionTracker {
        &self.tracker
    }

    fn physics_body_mut(&mut self, id: EntityId) -> Result<&mut PhysicsBody, SceneError> {
        self.tree
            .get_mut(id)
            .ok_or(SceneError::UnknownEntity(id))?
            .kind
            .as_physics_mut()
            .ok_or(SceneError::NotPhysical(id))
    }

    /// Live body of a physics entity
    pub fn body_handle(&self, id: EntityId) -> Option<BodyHandle> {
        self.tree.get(id)?.kind.as_physics()?.handle()
    }

    /// Add a collider. Buffered until registration, immediate afterwards.
    pub fn add_collider(&mut self, id: EntityId, fixture: FixtureDef) -> Result<(), SceneError> {
        let body = self.physics_body_mut(id)?;
        match body.handle() {
            Some(handle) => {
                let fixture = body.prepare_fixture(fixture);
                self.physics.create_fixture(handle, fixture);
            }
            None => body.buffer_collider(fixture),
        }
        Ok(())
    }

    fn update_filter(&mut self, id: EntityId, change: impl FnOnce(&mut CollisionFilter)) -> Result<(), SceneError> {
        let body = self.physics_body_mut(id)?;
        let mut filter = body.filter();
        change(&mut filter);
        body.set_filter(filter);

        // before registration the buffered colliders pick it up at flush
        if let Some(handle) = body.handle() {
            let fixtures = self.physics.body(handle).map(|b| b.fixtures().to_vec()).unwrap_or_default();
            for fixture in fixtures {
                self.physics.set_fixture_filter(fixture, filter);
            }
        }
        Ok(())
    }

    /// Set the category bits of every collider of an entity
    pub fn set_collision_category(&mut self, id: EntityId, category: u16) -> Result<(), SceneError> {
        self.update_filter(id, |filter| filter.category = category)
    }

    /// Set the mask bits of every collider of an entity
    pub fn set_collision_mask(&mut self, id: EntityId, mask: u16) -> Result<(), SceneError> {
        self.update_filter(id, |filter| filter.mask = mask)
    }

    /// Set the group of every collider of an entity
    pub fn set_collision_group(&mut self, id: EntityId, group: i16) -> Result<(), SceneError> {
        self.update_filter(id, |filter| filter.group = group)
    }

    fn live_body(&self, id: EntityId) -> Option<BodyHandle> {
        let handle = self.body_handle(id);
        if handle.is_none() {
            log::warn!("Entity {id} has no live physics body");
        }
        handle
    }

    /// Push an entity's body through its centre until the next step
    pub fn apply_force(&mut self, id: EntityId, force: Vec2) -> bool {
        self.live_body(id)
            .is_some_and(|handle| self.physics.apply_force_to_center(handle, force))
    }

    /// Kick an entity's body through its centre
    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) -> bool {
        let Some(handle) = self.live_body(id) else {
            return false;
        };
        let center = self.physics.body(handle).map(|body| body.position()).unwrap_or_default();
        self.physics.apply_linear_impulse(handle, impulse, center)
    }

    /// Spin an entity's body until the next step
    pub fn apply_torque(&mut self, id: EntityId, torque: f32) -> bool {
        self.live_body(id)
            .is_some_and(|handle| self.physics.apply_torque(handle, torque))
    }

    /// Overwrite an entity's linear velocity
    pub fn set_linear_velocity(&mut self, id: EntityId, velocity: Vec2) -> bool {
        self.live_body(id)
            .is_some_and(|handle| self.physics.set_linear_velocity(handle, velocity))
    }

    /// Linear velocity of an entity's body
    pub fn linear_velocity(&self, id: EntityId) -> Option<Vec2> {
        let handle = self.body_handle(id)?;
        self.physics.body(handle).map(|body| body.linear_velocity())
    }

    /// Whether an entity named `name` is inside the trigger `trigger`
    pub fn is_body_in_area(&self, trigger: EntityId, name: &str) -> bool {
        self.tree
            .get(trigger)
            .and_then(|node| node.kind.as_physics())
            .is_some_and(|body| body.is_body_in_area(name))
    }

    /// Cast a ray through the physics world. At most `max_hits` hits come
    /// back, nearest first.
    pub fn raycast(&self, start: Vec2, end: Vec2, mask: u16, max_hits: usize) -> Vec<RaycastHit> {
        self.physics
            .ray_cast(start, end, mask)
            .into_iter()
            .take(max_hits)
            .map(|hit| {
                let owner = self.bridge.resolve(hit.body);
                RaycastHit {
                    entity: owner.map(|data| data.entity_id),
                    name: owner.map(|data| data.entity_name.clone()),
                    body: hit.body,
                    point: hit.point,
                    normal: hit.normal,
                    fraction: hit.fraction,
                }
            })
            .collect()
    }
}
