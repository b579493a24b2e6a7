//! Contact dispatch for physics-linked entities

use super::body::BodyHandle;
use super::bridge::CollisionBridge;
use super::contact::Contact;
use crate::entity::EntityId;
use std::collections::BTreeMap;

/// One side of a contact, addressed to the entity that should hear about it
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    /// Entity receiving the notification
    pub entity: EntityId,
    /// Receiver's body
    pub own_body: BodyHandle,
    /// Body on the other side
    pub other_body: BodyHandle,
    /// Owner of the other body, if it has one
    pub other_entity: Option<EntityId>,
    /// Name of the other body's owner, if it has one
    pub other_name: Option<String>,
    /// Raw contact as reported by the world
    pub contact: Contact,
}

/// Registry of physics-enabled entities
#[derive(Debug, Default)]
pub struct CollisionTracker {
    tracked: BTreeMap<EntityId, BodyHandle>,
}

impl CollisionTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an entity. Returns false if it already was.
    pub fn add_tracked_entity(&mut self, entity: EntityId, body: BodyHandle) -> bool {
        if self.tracked.contains_key(&entity) {
            return false;
        }
        self.tracked.insert(entity, body);
        true
    }

    /// Stop tracking an entity. Returns false if it was not tracked.
    pub fn remove_tracked_entity(&mut self, entity: EntityId) -> bool {
        self.tracked.remove(&entity).is_some()
    }

    /// Whether an entity is tracked
    pub fn is_tracking_entity(&self, entity: EntityId) -> bool {
        self.tracked.contains_key(&entity)
    }

    /// Body recorded for a tracked entity
    pub fn body_of(&self, entity: EntityId) -> Option<BodyHandle> {
        self.tracked.get(&entity).copied()
    }

    /// Number of tracked entities
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Collision-start notifications for a new contact
    pub fn begin_contact(&self, contact: &Contact, bridge: &CollisionBridge) -> Vec<Collision> {
        self.dispatch(contact, bridge)
    }

    /// Collision-end notifications for a finished contact
    pub fn end_contact(&self, contact: &Contact, bridge: &CollisionBridge) -> Vec<Collision> {
        self.dispatch(contact, bridge)
    }

    fn dispatch(&self, contact: &Contact, bridge: &CollisionBridge) -> Vec<Collision> {
        let sides = [(contact.body_a, contact.body_b), (contact.body_b, contact.body_a)];
        sides
            .into_iter()
            .filter_map(|(own, other)| {
                // untracked geometry and already-destroyed bodies are skipped
                let owner = bridge.resolve(own)?;
                if !self.is_tracking_entity(owner.entity_id) {
                    return None;
                }
                let other_data = bridge.resolve(other);
                log::trace!("Contact for {} ({})", owner.entity_name, owner.entity_id);
                Some(Collision {
                    entity: owner.entity_id,
                    own_body: own,
                    other_body: other,
                    other_entity: other_data.map(|d| d.entity_id),
                    other_name: other_data.map(|d| d.entity_name.clone()),
                    contact: *contact,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::{BodyDef, BodyKind, BodyUserData, FixtureDef, PhysicsWorld};

    struct Rig {
        world: PhysicsWorld,
        bridge: CollisionBridge,
        tracker: CollisionTracker,
        contact: Contact,
        ids: [EntityId; 2],
    }

    fn rig() -> Rig {
        let mut world = PhysicsWorld::default();
        let mut bridge = CollisionBridge::new();
        let mut tracker = CollisionTracker::new();
        let mut bodies = Vec::new();
        let mut fixtures = Vec::new();
        let mut ids = Vec::new();
        for name in ["left", "right"] {
            let body = world.create_body(&BodyDef::new(BodyKind::Dynamic));
            fixtures.push(world.create_fixture(body, FixtureDef::circle(Vec2::zeros(), 1.0)).unwrap());
            let id = EntityId::next();
            bridge.attach(body, BodyUserData { entity_id: id, entity_name: name.into() });
            tracker.add_tracked_entity(id, body);
            bodies.push(body);
            ids.push(id);
        }
        let contact = Contact {
            fixture_a: fixtures[0],
            fixture_b: fixtures[1],
            body_a: bodies[0],
            body_b: bodies[1],
            normal: Vec2::x(),
            is_sensor: false,
        };
        Rig { world, bridge, tracker, contact, ids: [ids[0], ids[1]] }
    }

    #[test]
    fn test_one_dispatch_per_side() {
        let rig = rig();
        let begun = rig.tracker.begin_contact(&rig.contact, &rig.bridge);
        assert_eq!(begun.len(), 2);
        assert_eq!(begun[0].entity, rig.ids[0]);
        assert_eq!(begun[0].other_name.as_deref(), Some("right"));
        assert_eq!(begun[1].entity, rig.ids[1]);
        assert_eq!(begun[1].other_entity, Some(rig.ids[0]));

        let ended = rig.tracker.end_contact(&rig.contact, &rig.bridge);
        assert_eq!(ended.len(), 2);
    }

    #[test]
    fn test_untracked_and_unknown_sides_are_skipped() {
        let mut rig = rig();
        assert!(rig.tracker.remove_tracked_entity(rig.ids[1]));
        assert!(!rig.tracker.remove_tracked_entity(rig.ids[1]));

        let begun = rig.tracker.begin_contact(&rig.contact, &rig.bridge);
        assert_eq!(begun.len(), 1);
        assert_eq!(begun[0].entity, rig.ids[0]);

        rig.bridge.detach(rig.contact.body_a);
        rig.world.destroy_body(rig.contact.body_a);
        assert!(rig.tracker.begin_contact(&rig.contact, &rig.bridge).is_empty());
    }

    #[test]
    fn test_tracking_is_idempotent() {
        let mut rig = rig();
        assert!(!rig.tracker.add_tracked_entity(rig.ids[0], rig.contact.body_a));
        assert_eq!(rig.tracker.len(), 2);
        assert_eq!(rig.tracker.body_of(rig.ids[0]), Some(rig.contact.body_a));
    }
}
