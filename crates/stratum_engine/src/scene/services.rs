//! Services shared with scenes and the view of a scene given to behaviors

use crate::assets::TextureCache;
use crate::debug::DebugDrawSystem;
use crate::entity::{CameraView, EntityBuilder, EntityId, EntityNode};
use crate::foundation::math::Vec2;
use crate::input::InputMap;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Texture cache shared between scenes
pub type SharedTextureCache = Rc<RefCell<TextureCache>>;

/// Input map shared between scenes
pub type SharedInputMap = Rc<RefCell<InputMap>>;

/// Services injected into every scene at construction
#[derive(Clone, Default)]
pub struct Services {
    /// Texture cache; headless scenes may run without one
    pub textures: Option<SharedTextureCache>,
    /// Named input actions
    pub input: SharedInputMap,
}

impl Services {
    /// Services around a texture cache and an input map
    pub fn new(textures: TextureCache, input: InputMap) -> Self {
        Self {
            textures: Some(Rc::new(RefCell::new(textures))),
            input: Rc::new(RefCell::new(input)),
        }
    }
}

/// What a behavior hook may do with the scene that owns its entity
pub trait SceneServices {
    /// Look up an entity
    fn entity(&self, id: EntityId) -> Option<&EntityNode>;

    /// Look up an entity mutably
    fn entity_mut(&mut self, id: EntityId) -> Option<&mut EntityNode>;

    /// Registered entity by name
    fn find_entity_by_name(&self, name: &str) -> Option<EntityId>;

    /// World position of an entity
    fn global_position(&self, id: EntityId) -> Option<Vec2>;

    /// World rotation of an entity in radians
    fn global_rotation(&self, id: EntityId) -> Option<f32>;

    /// Add a root-level entity, unregistered
    fn spawn(&mut self, builder: EntityBuilder) -> EntityId;

    /// Register an entity and its subtree
    fn register_entity(&mut self, id: EntityId) -> bool;

    /// Destroy an entity and its subtree
    fn destroy_entity(&mut self, id: EntityId) -> bool;

    /// Named resource
    fn resource(&self, name: &str) -> Option<&dyn Any>;

    /// Named resource, mutably
    fn resource_mut(&mut self, name: &str) -> Option<&mut dyn Any>;

    /// Shared input map
    fn input(&self) -> SharedInputMap;

    /// Shared texture cache, if the scene has one
    fn textures(&self) -> Option<SharedTextureCache>;

    /// Debug draw queue
    fn debug_draw(&mut self) -> &mut DebugDrawSystem;

    /// Push a physics entity's body through its centre
    fn apply_force(&mut self, id: EntityId, force: Vec2) -> bool;

    /// Kick a physics entity's body through its centre
    fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) -> bool;

    /// Overwrite a physics entity's linear velocity
    fn set_linear_velocity(&mut self, id: EntityId, velocity: Vec2) -> bool;

    /// Linear velocity of a physics entity's body
    fn linear_velocity(&self, id: EntityId) -> Option<Vec2>;

    /// Whether an entity named `name` is inside the trigger `trigger`
    fn is_body_in_area(&self, trigger: EntityId, name: &str) -> bool;

    /// View of the current camera
    fn camera_view(&self) -> Option<CameraView>;
}

impl dyn SceneServices + '_ {
    /// Named resource of a concrete type
    pub fn resource_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.resource(name)?.downcast_ref()
    }

    /// Named resource of a concrete type, mutably
    pub fn resource_as_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.resource_mut(name)?.downcast_mut()
    }
}
