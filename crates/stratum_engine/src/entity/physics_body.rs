//! Physics-linked entity state
//!
//! Colliders added before the entity is registered are buffered here and
//! handed to the world once, when the scene creates the body.

use crate::foundation::math::Vec2;
use crate::physics::{BodyDef, BodyHandle, BodyKind, CollisionFilter, FixtureDef};
use std::collections::BTreeMap;

/// Body definition, colliders and live handle of a physical entity
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    def: BodyDef,
    filter: CollisionFilter,
    pending: Vec<FixtureDef>,
    body: Option<BodyHandle>,
    overlaps: Option<BTreeMap<String, BodyHandle>>,
}

impl PhysicsBody {
    /// Body of the given kind
    pub fn new(kind: BodyKind) -> Self {
        Self::from_def(BodyDef::new(kind))
    }

    /// Body from a full definition. The pose is taken from the entity at
    /// registration.
    pub fn from_def(def: BodyDef) -> Self {
        Self {
            def,
            filter: CollisionFilter::default(),
            pending: Vec::new(),
            body: None,
            overlaps: None,
        }
    }

    /// A trigger area: kinematic, every collider a sensor, and it remembers
    /// who is inside
    pub fn trigger() -> Self {
        let mut body = Self::new(BodyKind::Kinematic);
        body.overlaps = Some(BTreeMap::new());
        body
    }

    /// Builder for a collider
    #[must_use]
    pub fn with_collider(mut self, fixture: FixtureDef) -> Self {
        self.pending.push(fixture);
        self
    }

    /// Builder for a box collider of `size` centred on the body
    #[must_use]
    pub fn with_rect(self, size: Vec2) -> Self {
        self.with_collider(FixtureDef::rect(Vec2::zeros(), size, 0.0))
    }

    /// Builder for a circle collider centred on the body
    #[must_use]
    pub fn with_circle(self, radius: f32) -> Self {
        self.with_collider(FixtureDef::circle(Vec2::zeros(), radius))
    }

    /// Builder for the collision filter
    #[must_use]
    pub const fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Simulation kind
    pub const fn body_kind(&self) -> BodyKind {
        self.def.kind
    }

    /// Body definition used at registration
    pub const fn def(&self) -> &BodyDef {
        &self.def
    }

    /// Live body, once registered
    pub const fn handle(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Filter applied to every collider
    pub const fn filter(&self) -> CollisionFilter {
        self.filter
    }

    /// Whether this body tracks overlaps instead of colliding
    pub const fn is_trigger(&self) -> bool {
        self.overlaps.is_some()
    }

    /// Colliders waiting for the body to exist
    pub fn pending_colliders(&self) -> &[FixtureDef] {
        &self.pending
    }

    /// Whether an entity named `name` is currently inside this trigger
    pub fn is_body_in_area(&self, name: &str) -> bool {
        self.overlaps.as_ref().is_some_and(|set| set.contains_key(name))
    }

    /// Names of the entities currently inside this trigger
    pub fn overlapping(&self) -> impl Iterator<Item = &str> {
        self.overlaps.iter().flat_map(|set| set.keys().map(String::as_str))
    }

    pub(crate) fn buffer_collider(&mut self, fixture: FixtureDef) {
        self.pending.push(fixture);
    }

    pub(crate) fn take_pending(&mut self) -> Vec<FixtureDef> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn set_handle(&mut self, body: Option<BodyHandle>) {
        self.body = body;
    }

    pub(crate) fn set_filter(&mut self, filter: CollisionFilter) {
        self.filter = filter;
    }

    /// Stamp the entity's filter onto a collider, and make it a sensor for
    /// triggers
    pub(crate) fn prepare_fixture(&self, mut fixture: FixtureDef) -> FixtureDef {
        fixture.filter = self.filter;
        if self.is_trigger() {
            fixture.is_sensor = true;
        }
        fixture
    }

    /// Returns true if `name` was not already inside
    pub(crate) fn record_overlap_begin(&mut self, name: &str, body: BodyHandle) -> bool {
        match &mut self.overlaps {
            Some(set) if !set.contains_key(name) => {
                set.insert(name.to_owned(), body);
                true
            }
            _ => false,
        }
    }

    /// Remove by name, or by body when the other side no longer has an owner
    pub(crate) fn record_overlap_end(&mut self, name: Option<&str>, body: BodyHandle) -> Option<String> {
        let set = self.overlaps.as_mut()?;
        let key = match name {
            Some(name) if set.contains_key(name) => name.to_owned(),
            _ => set.iter().find(|(_, handle)| **handle == body).map(|(key, _)| key.clone())?,
        };
        set.remove(&key);
        Some(key)
    }

    pub(crate) fn clear_overlaps(&mut self) {
        if let Some(set) = &mut self.overlaps {
            set.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicsWorld;

    #[test]
    fn test_trigger_forces_sensors_and_filter() {
        let filter = CollisionFilter::new(0b10, 0b01, 0);
        let trigger = PhysicsBody::trigger().with_filter(filter);
        let fixture = trigger.prepare_fixture(FixtureDef::circle(Vec2::zeros(), 4.0));
        assert!(fixture.is_sensor);
        assert_eq!(fixture.filter, filter);
        assert_eq!(trigger.body_kind(), BodyKind::Kinematic);

        let solid = PhysicsBody::new(BodyKind::Dynamic);
        assert!(!solid.prepare_fixture(FixtureDef::circle(Vec2::zeros(), 4.0)).is_sensor);
    }

    #[test]
    fn test_pending_colliders_flush_once() {
        let mut body = PhysicsBody::new(BodyKind::Dynamic).with_rect(Vec2::new(2.0, 2.0)).with_circle(1.0);
        assert_eq!(body.pending_colliders().len(), 2);
        assert_eq!(body.take_pending().len(), 2);
        assert!(body.take_pending().is_empty());
    }

    #[test]
    fn test_overlap_set_has_no_duplicates() {
        let mut world = PhysicsWorld::default();
        let other = world.create_body(&BodyDef::default());
        let mut trigger = PhysicsBody::trigger();

        assert!(trigger.record_overlap_begin("player", other));
        assert!(!trigger.record_overlap_begin("player", other));
        assert!(trigger.is_body_in_area("player"));
        assert_eq!(trigger.overlapping().collect::<Vec<_>>(), vec!["player"]);

        // owner gone: fall back to the body handle
        assert_eq!(trigger.record_overlap_end(None, other).as_deref(), Some("player"));
        assert!(!trigger.is_body_in_area("player"));
        assert!(trigger.record_overlap_end(Some("player"), other).is_none());
    }

    #[test]
    fn test_solid_body_never_records_overlaps() {
        let mut world = PhysicsWorld::default();
        let other = world.create_body(&BodyDef::default());
        let mut body = PhysicsBody::new(BodyKind::Dynamic);
        assert!(!body.record_overlap_begin("player", other));
        assert!(!body.is_body_in_area("player"));
    }
}
