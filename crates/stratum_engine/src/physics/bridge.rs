//! Body ownership side table
//!
//! Bodies in the [`PhysicsWorld`](super::PhysicsWorld) know nothing about
//! entities. The bridge records which entity owns each body so contact reports
//! can be routed back.

use super::body::BodyHandle;
use crate::entity::EntityId;
use slotmap::SecondaryMap;

/// Owner of a physics body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyUserData {
    /// Owning entity
    pub entity_id: EntityId,
    /// Owning entity's name at body creation
    pub entity_name: String,
}

/// Maps body handles back to owning entities
#[derive(Debug, Default)]
pub struct CollisionBridge {
    owners: SecondaryMap<BodyHandle, BodyUserData>,
}

impl CollisionBridge {
    /// Create an empty bridge
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the owner of a freshly created body
    pub fn attach(&mut self, body: BodyHandle, data: BodyUserData) {
        if let Some(previous) = self.owners.insert(body, data) {
            log::warn!("Body already owned by {} ({}); owner replaced", previous.entity_name, previous.entity_id);
        }
    }

    /// Forget a destroyed body
    pub fn detach(&mut self, body: BodyHandle) -> Option<BodyUserData> {
        self.owners.remove(body)
    }

    /// Owner of a body, if it is still known
    pub fn resolve(&self, body: BodyHandle) -> Option<&BodyUserData> {
        self.owners.get(body)
    }

    /// Number of owned bodies
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no body is owned
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyDef, BodyKind, PhysicsWorld};

    #[test]
    fn test_attach_resolve_detach() {
        let mut world = PhysicsWorld::default();
        let body = world.create_body(&BodyDef::new(BodyKind::Dynamic));
        let owner = EntityId::next();

        let mut bridge = CollisionBridge::new();
        bridge.attach(body, BodyUserData { entity_id: owner, entity_name: "crate".into() });
        assert_eq!(bridge.resolve(body).map(|d| d.entity_id), Some(owner));

        assert!(bridge.detach(body).is_some());
        assert!(bridge.resolve(body).is_none());
        assert!(bridge.is_empty());
    }
}
