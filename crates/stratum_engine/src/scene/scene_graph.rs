//! Scene ownership, registration and entity lifecycle

use super::events::SceneEvent;
use super::resources::ResourceLocator;
use super::services::{SceneServices, Services, SharedInputMap, SharedTextureCache};
use super::SceneError;
use crate::assets::{AssetError, TileMapData};
use crate::config::{EngineConfig, SceneConfig};
use crate::debug::DebugDrawSystem;
use crate::entity::{
    Behavior, CameraView, EntityBuilder, EntityId, EntityKind, EntityNode, EntityTree, Light2D, TileMap,
    TileMapLayer, TILEMAP_BASE_DRAW_LAYER,
};
use crate::foundation::math::{Color, Vec2};
use crate::physics::{BodyUserData, CollisionBridge, CollisionTracker, PhysicsWorld};
use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Name given to every scene's synthetic root node
const ROOT_NAME: &str = "root";

/// A level: entity tree, indices, physics and resources
pub struct Scene {
    name: String,
    pub(super) config: SceneConfig,
    pub(super) window_size: Vec2,
    pub(super) tree: EntityTree,
    pub(super) registry: BTreeSet<EntityId>,
    names: HashMap<String, EntityId>,
    pub(super) drawables: BTreeSet<EntityId>,
    lights: BTreeSet<EntityId>,
    pub(super) cameras: BTreeSet<EntityId>,
    resources: ResourceLocator,
    current_camera: Option<EntityId>,
    pub(super) physics: PhysicsWorld,
    pub(super) bridge: CollisionBridge,
    pub(super) tracker: CollisionTracker,
    services: Services,
    pub(super) events: Vec<SceneEvent>,
    pub(super) debug: DebugDrawSystem,
    physics_fraction: f32,
    paused: bool,
    torn_down: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>, config: &EngineConfig, services: Services) -> Self {
        let name = name.into();
        log::debug!("Creating scene '{name}'");
        Self {
            name,
            config: config.scene.clone(),
            window_size: config.window.size(),
            tree: EntityTree::new(ROOT_NAME),
            registry: BTreeSet::new(),
            names: HashMap::new(),
            drawables: BTreeSet::new(),
            lights: BTreeSet::new(),
            cameras: BTreeSet::new(),
            resources: ResourceLocator::new(),
            current_camera: None,
            physics: PhysicsWorld::new(config.physics.gravity()),
            bridge: CollisionBridge::new(),
            tracker: CollisionTracker::new(),
            services,
            events: Vec::new(),
            debug: DebugDrawSystem::new(),
            physics_fraction: 0.0,
            paused: false,
            torn_down: false,
        }
    }

    /// Scene with default configuration and no texture cache
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self::new(name, &EngineConfig::default(), Services::default())
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scene settings
    pub const fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Entity tree
    pub const fn tree(&self) -> &EntityTree {
        &self.tree
    }

    /// Entity tree, mutably
    pub fn tree_mut(&mut self) -> &mut EntityTree {
        &mut self.tree
    }

    /// Synthetic root node
    pub const fn root(&self) -> EntityId {
        self.tree.root()
    }

    // ------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------

    /// Add a root-level entity. It stays unregistered until
    /// [`register_entity`](Self::register_entity).
    pub fn spawn(&mut self, builder: EntityBuilder) -> EntityId {
        self.tree.insert(builder.build())
    }

    /// Add an entity under `parent`, registering it if the parent is
    /// registered
    pub fn spawn_child(&mut self, parent: EntityId, builder: EntityBuilder) -> Result<EntityId, SceneError> {
        if !self.tree.contains(parent) {
            return Err(SceneError::UnknownEntity(parent));
        }
        let id = self.spawn(builder);
        self.tree.add_child(parent, id);
        if self.is_registered(parent) {
            self.register_entity(id);
        }
        Ok(id)
    }

    /// Add a tilemap with one child entity per layer
    pub fn spawn_tilemap(&mut self, name: &str, data: TileMapData) -> Result<EntityId, AssetError> {
        data.validate()?;
        let (tile_set, layers) = data.into_parts();

        let mut map = TileMap::new(Rc::clone(&tile_set));
        let mut layer_ids = Vec::with_capacity(layers.len());
        for (index, tiles) in layers.into_iter().enumerate() {
            let layer = TileMapLayer::new(index, tiles, Rc::clone(&tile_set));
            let id = self.spawn(
                EntityBuilder::new(format!("{name}_layer_{index}"))
                    .with_draw_layer(i32::try_from(index).unwrap_or(i32::MAX))
                    .with_kind(EntityKind::TileMapLayer(layer)),
            );
            map.push_layer(id);
            layer_ids.push(id);
        }

        let map_id = self.spawn(
            EntityBuilder::new(name)
                .with_draw_layer(TILEMAP_BASE_DRAW_LAYER)
                .with_kind(EntityKind::TileMap(map)),
        );
        for layer in layer_ids {
            self.tree.add_child(map_id, layer);
        }
        Ok(map_id)
    }

    /// Move a tilemap layer to another relative draw layer
    pub fn set_map_layer_draw_layer(&mut self, tilemap: EntityId, index: usize, layer: i32) -> Result<(), SceneError> {
        let node = self.tree.get(tilemap).ok_or(SceneError::UnknownEntity(tilemap))?;
        let map = node.kind.as_tilemap().ok_or(SceneError::NotTileMap(tilemap))?;
        let target = *map.layers().get(index).ok_or(SceneError::ChildIndexOutOfBounds {
            entity: tilemap,
            index,
            len: map.layers().len(),
        })?;
        self.tree.set_draw_layer(target, layer);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register an entity and its existing subtree. Returns false if the
    /// entity is unknown or already registered.
    pub fn register_entity(&mut self, id: EntityId) -> bool {
        if !self.tree.get(id).is_some_and(|node| !node.is_registered()) {
            return false;
        }
        self.register_node(id);
        true
    }

    fn register_node(&mut self, id: EntityId) {
        if let Some(node) = self.tree.get_mut(id) {
            node.registered = true;
        }

        self.on_register_kind(id);
        self.with_behavior(id, |behavior, scene| behavior.on_register(id, scene));

        let children = self.tree.get(id).map(|node| node.children().to_vec()).unwrap_or_default();
        for child in children {
            if self.tree.get(child).is_some_and(|node| !node.is_registered()) {
                self.register_node(child);
            }
        }

        let Some(node) = self.tree.get(id) else {
            return;
        };
        self.registry.insert(id);
        self.names.entry(node.name().to_owned()).or_insert(id);

        let kind = &node.kind;
        if kind.is_drawable() {
            self.drawables.insert(id);
        }
        if kind.is_light() {
            self.lights.insert(id);
        }
        if let Some(body) = kind.as_physics().and_then(|body| body.handle()) {
            self.tracker.add_tracked_entity(id, body);
        }
        if kind.is_camera() {
            self.cameras.insert(id);
        }
        log::debug!("Registered {} '{}' in scene '{}'", id, node.name(), self.name);
    }

    fn on_register_kind(&mut self, id: EntityId) {
        let position = self.tree.global_position(id).unwrap_or_default();
        let rotation = self.tree.global_rotation(id).unwrap_or_default();
        let window_size = self.window_size;
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        let name = node.name().to_owned();

        match &mut node.kind {
            EntityKind::Physics(physics) if physics.handle().is_none() => {
                let def = physics.def().clone().at(position, rotation);
                let body = self.physics.create_body(&def);
                for fixture in physics.take_pending() {
                    self.physics.create_fixture(body, physics.prepare_fixture(fixture));
                }
                physics.set_handle(Some(body));
                self.bridge.attach(body, BodyUserData { entity_id: id, entity_name: name });
                log::debug!("Created {:?} body for {id}", def.kind);
            }
            EntityKind::Camera(camera) => {
                camera.on_window_resized(window_size);
                camera.resolve(position, rotation.to_degrees());
            }
            _ => {}
        }
    }

    /// Unregister the entity registered under `name`. Not recursive.
    pub fn unregister_entity(&mut self, name: &str) -> bool {
        match self.names.get(name).copied() {
            Some(id) => self.unregister_entity_by_id(id),
            None => false,
        }
    }

    /// Unregister an entity by ID. Not recursive.
    pub fn unregister_entity_by_id(&mut self, id: EntityId) -> bool {
        if !self.registry.remove(&id) {
            return false;
        }
        self.names.retain(|_, entry| *entry != id);
        self.drawables.remove(&id);
        self.lights.remove(&id);
        self.cameras.remove(&id);
        self.tracker.remove_tracked_entity(id);
        if self.current_camera == Some(id) {
            self.current_camera = None;
        }
        if let Some(node) = self.tree.get_mut(id) {
            node.registered = false;
            // untracked triggers stop hearing about exits
            if let Some(body) = node.kind.as_physics_mut() {
                body.clear_overlaps();
            }
        }
        true
    }

    /// Whether the entity is registered
    pub fn is_registered(&self, id: EntityId) -> bool {
        self.registry.contains(&id)
    }

    /// Registered entities in ID order
    pub fn registered(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.registry.iter().copied()
    }

    /// Number of registered entities
    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Registered entity by name; the first registration of a name wins
    pub fn find_entity_by_name(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Resolve `a/b/c`: `a` through the name index, then child lookups
    pub fn get_entity(&self, path: &str) -> Option<EntityId> {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let mut current = self.find_entity_by_name(segments.next()?)?;
        for segment in segments {
            current = self.tree.child_by_name(current, segment)?;
        }
        Some(current)
    }

    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Option<&EntityNode> {
        self.tree.get(id)
    }

    /// Look up an entity mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut EntityNode> {
        self.tree.get_mut(id)
    }

    /// See [`EntityTree::global_position`]
    pub fn global_position(&self, id: EntityId) -> Option<Vec2> {
        self.tree.global_position(id)
    }

    /// See [`EntityTree::global_rotation`]
    pub fn global_rotation(&self, id: EntityId) -> Option<f32> {
        self.tree.global_rotation(id)
    }

    /// See [`EntityTree::add_child`]
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        self.tree.add_child(parent, child)
    }

    /// See [`EntityTree::set_parent`]
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> bool {
        self.tree.set_parent(child, parent)
    }

    /// See [`EntityTree::set_visible`]
    pub fn set_visible(&mut self, id: EntityId, visible: bool) -> bool {
        self.tree.set_visible(id, visible)
    }

    // ------------------------------------------------------------------
    // Destruction
    // ------------------------------------------------------------------

    /// Destroy an entity and its whole subtree. The root cannot be destroyed.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        if id == self.tree.root() || !self.tree.contains(id) {
            return false;
        }
        self.destroy_subtree(id);
        true
    }

    fn destroy_subtree(&mut self, id: EntityId) {
        if let Some(mut behavior) = self.tree.get_mut(id).and_then(EntityNode::take_behavior) {
            behavior.on_destroy(id);
        }
        self.tree.detach(id);

        let children = self.tree.get(id).map(|node| node.children().to_vec()).unwrap_or_default();
        for child in children {
            self.destroy_subtree(child);
        }

        if let Some(node) = self.tree.remove(id) {
            self.on_entity_deleted(node);
        }
    }

    fn on_entity_deleted(&mut self, node: EntityNode) {
        let id = node.id();
        self.unregister_entity_by_id(id);

        match &node.kind {
            EntityKind::Physics(physics) => {
                if let Some(body) = physics.handle() {
                    self.bridge.detach(body);
                    self.physics.destroy_body(body);
                }
            }
            EntityKind::Sprite(sprite) if sprite.owns_texture() => {
                if let Some(textures) = &self.services.textures {
                    if let Err(err) = textures.borrow_mut().release(sprite.texture) {
                        log::warn!("Failed to release texture of {id}: {err}");
                    }
                }
            }
            _ => {}
        }

        log::debug!("Deleted {} '{}'", id, node.name());
        self.events.push(SceneEvent::EntityDeleted {
            id,
            name: node.name().to_owned(),
        });
    }

    /// Destroy every registered entity and the physics world. Runs once;
    /// also run on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        log::debug!("Tearing down scene '{}' ({} registered)", self.name, self.registry.len());

        let snapshot: Vec<EntityId> = self.registry.iter().copied().collect();
        for id in snapshot {
            // already gone with a destroyed ancestor
            if self.registry.contains(&id) {
                self.destroy_entity(id);
            }
        }

        self.physics = PhysicsWorld::new(self.physics.gravity());
        self.bridge = CollisionBridge::new();
        self.tracker = CollisionTracker::new();
    }

    // ------------------------------------------------------------------
    // Behaviors
    // ------------------------------------------------------------------

    /// Run `hook` with the entity's behavior taken out of the node
    pub(super) fn with_behavior<F>(&mut self, id: EntityId, hook: F)
    where
        F: FnOnce(&mut dyn Behavior, &mut dyn SceneServices),
    {
        let Some(mut behavior) = self.tree.get_mut(id).and_then(EntityNode::take_behavior) else {
            return;
        };
        let scene: &mut dyn SceneServices = self;
        hook(&mut *behavior, scene);
        match self.tree.get_mut(id) {
            Some(node) if !node.has_behavior() => node.set_behavior(behavior),
            // replaced by the hook itself
            Some(_) => {}
            // destroyed by the hook itself
            None => behavior.on_destroy(id),
        }
    }

    // ------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------

    /// Register a named resource. Re-registering a name is a logic error.
    pub fn register_resource<T: Any>(&mut self, name: impl Into<String>, value: T) -> bool {
        self.resources.register(name, value)
    }

    /// Named resource
    pub fn get_resource<T: Any>(&self, name: &str) -> Option<&T> {
        self.resources.get(name)
    }

    /// Named resource, mutably
    pub fn get_resource_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.resources.get_mut(name)
    }

    /// Whether a resource name is taken
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains(name)
    }

    /// Injected services
    pub const fn services(&self) -> &Services {
        &self.services
    }

    // ------------------------------------------------------------------
    // Cameras, lights and settings
    // ------------------------------------------------------------------

    /// Make a camera entity current, registering it if needed
    pub fn set_current_camera(&mut self, id: EntityId) -> bool {
        if !self.tree.get(id).is_some_and(|node| node.kind.is_camera()) {
            return false;
        }
        self.register_entity(id);
        self.current_camera = Some(id);
        true
    }

    /// Current camera entity
    pub const fn current_camera(&self) -> Option<EntityId> {
        self.current_camera
    }

    /// View of the current camera as of the last late update
    pub fn camera_view(&self) -> Option<CameraView> {
        let camera = self.tree.get(self.current_camera?)?.kind.as_camera()?;
        Some(camera.view())
    }

    /// Resolution the world is rendered at
    pub fn world_render_size(&self) -> Vec2 {
        self.current_camera
            .and_then(|id| self.tree.get(id))
            .and_then(|node| node.kind.as_camera())
            .map_or(self.window_size, |camera| camera.render_resolution())
    }

    /// Current window size
    pub const fn window_size(&self) -> Vec2 {
        self.window_size
    }

    /// Tell cameras the window changed size
    pub fn notify_window_resized(&mut self, width: f32, height: f32) {
        let size = Vec2::new(width, height);
        self.window_size = size;

        let cameras: Vec<EntityId> = self.cameras.iter().copied().collect();
        for id in cameras {
            if let Some(camera) = self.tree.get_mut(id).and_then(|node| node.kind.as_camera_mut()) {
                camera.on_window_resized(size);
            }
            self.with_behavior(id, |behavior, scene| behavior.on_window_resized(id, scene, size));
        }
        self.events.push(SceneEvent::WindowResized { size });
    }

    /// Registered lights
    pub fn lights(&self) -> impl Iterator<Item = (EntityId, &Light2D)> + '_ {
        self.lights
            .iter()
            .filter_map(|&id| Some((id, self.tree.get(id)?.kind.as_light()?)))
    }

    /// Interpolation fraction left over by the fixed-step accumulator
    pub const fn physics_fraction(&self) -> f32 {
        self.physics_fraction
    }

    /// Set the interpolation fraction
    pub fn set_physics_fraction(&mut self, fraction: f32) {
        self.physics_fraction = fraction;
    }

    /// Pause or resume the variable-rate update pass
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Whether the scene is paused
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Toggle Y-sorting within draw layers
    pub fn set_y_sort(&mut self, enabled: bool) {
        self.config.y_sort = enabled;
    }

    /// Toggle the perspective shift for sprite stacks without their own setting
    pub fn set_stack_perspective_shift(&mut self, enabled: bool) {
        self.config.stack_perspective_shift = enabled;
    }

    /// Ambient light color
    pub const fn ambient_color(&self) -> Color {
        self.config.ambient_color
    }

    /// Set the ambient light color
    pub fn set_ambient_color(&mut self, color: Color) {
        self.config.ambient_color = color;
    }

    /// Debug draw queue
    pub fn debug_draw(&mut self) -> &mut DebugDrawSystem {
        &mut self.debug
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl SceneServices for Scene {
    fn entity(&self, id: EntityId) -> Option<&EntityNode> {
        Self::entity(self, id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut EntityNode> {
        Self::entity_mut(self, id)
    }

    fn find_entity_by_name(&self, name: &str) -> Option<EntityId> {
        Self::find_entity_by_name(self, name)
    }

    fn global_position(&self, id: EntityId) -> Option<Vec2> {
        Self::global_position(self, id)
    }

    fn global_rotation(&self, id: EntityId) -> Option<f32> {
        Self::global_rotation(self, id)
    }

    fn spawn(&mut self, builder: EntityBuilder) -> EntityId {
        Self::spawn(self, builder)
    }

    fn register_entity(&mut self, id: EntityId) -> bool {
        Self::register_entity(self, id)
    }

    fn destroy_entity(&mut self, id: EntityId) -> bool {
        Self::destroy_entity(self, id)
    }

    fn resource(&self, name: &str) -> Option<&dyn Any> {
        self.resources.get_any(name)
    }

    fn resource_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
        self.resources.get_any_mut(name)
    }

    fn input(&self) -> SharedInputMap {
        Rc::clone(&self.services.input)
    }

    fn textures(&self) -> Option<SharedTextureCache> {
        self.services.textures.clone()
    }

    fn debug_draw(&mut self) -> &mut DebugDrawSystem {
        &mut self.debug
    }

    fn apply_force(&mut self, id: EntityId, force: Vec2) -> bool {
        Self::apply_force(self, id, force)
    }

    fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) -> bool {
        Self::apply_impulse(self, id, impulse)
    }

    fn set_linear_velocity(&mut self, id: EntityId, velocity: Vec2) -> bool {
        Self::set_linear_velocity(self, id, velocity)
    }

    fn linear_velocity(&self, id: EntityId) -> Option<Vec2> {
        Self::linear_velocity(self, id)
    }

    fn is_body_in_area(&self, trigger: EntityId, name: &str) -> bool {
        Self::is_body_in_area(self, trigger, name)
    }

    fn camera_view(&self) -> Option<CameraView> {
        Self::camera_view(self)
    }
}
