//! Entity nodes and their builder

use super::behavior::Behavior;
use super::kind::EntityKind;
use super::transform::Transform2D;
use super::EntityId;
use crate::foundation::math::Vec2;
use crate::physics::BodyKind;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Transform components that ignore the parent's contribution
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransformFlags: u8 {
        /// Rotation is absolute
        const ROTATION = 1 << 0;
        /// Position is absolute
        const POSITION = 1 << 1;
        /// Scale is absolute
        const SCALE = 1 << 2;
    }
}

impl Default for TransformFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A node of the entity tree
pub struct EntityNode {
    id: EntityId,
    name: String,
    /// Local transform, relative to the parent
    pub transform: Transform2D,
    draw_layer: i32,
    /// Added to the local Y when the scene sorts by Y
    pub y_sort_offset: f32,
    visible: bool,
    /// Components that ignore the parent
    pub flags: TransformFlags,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) registered: bool,
    /// Kind-specific data
    pub kind: EntityKind,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl EntityNode {
    /// Generic node with a fresh ID
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::next(),
            name: name.into(),
            transform: Transform2D::default(),
            draw_layer: 0,
            y_sort_offset: 0.0,
            visible: true,
            flags: TransformFlags::empty(),
            parent: None,
            children: Vec::new(),
            registered: false,
            kind: EntityKind::Generic,
            behavior: None,
        }
    }

    /// Identity
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Own draw layer, relative to the parent
    pub const fn local_draw_layer(&self) -> i32 {
        self.draw_layer
    }

    /// Set the own draw layer
    pub fn set_draw_layer(&mut self, layer: i32) {
        self.draw_layer = layer;
    }

    /// Own visibility flag
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible_flag(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Parent, or `None` for a root-level node
    pub const fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Whether a scene has registered this node
    pub const fn is_registered(&self) -> bool {
        self.registered
    }

    /// Whether a behavior is attached
    pub const fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// Attach or replace the behavior
    pub fn set_behavior(&mut self, behavior: Box<dyn Behavior>) {
        self.behavior = Some(behavior);
    }

    pub(crate) fn take_behavior(&mut self) -> Option<Box<dyn Behavior>> {
        self.behavior.take()
    }

    fn is_world_space_body(&self) -> bool {
        self.kind
            .as_physics()
            .is_some_and(|body| body.body_kind() == BodyKind::Dynamic)
    }

    /// Whether the parent's position is added in. A dynamic body lives in
    /// world space.
    pub fn inherits_position(&self) -> bool {
        !self.flags.contains(TransformFlags::POSITION) && !self.is_world_space_body()
    }

    /// Whether the parent's rotation is added in
    pub fn inherits_rotation(&self) -> bool {
        !self.flags.contains(TransformFlags::ROTATION) && !self.is_world_space_body()
    }

    /// Whether the parent's scale is multiplied in
    pub fn inherits_scale(&self) -> bool {
        !self.flags.contains(TransformFlags::SCALE)
    }
}

impl fmt::Debug for EntityNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityNode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("draw_layer", &self.draw_layer)
            .field("visible", &self.visible)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("registered", &self.registered)
            .field("kind", &self.kind.entity_type())
            .finish_non_exhaustive()
    }
}

/// Builder for entity nodes
///
/// # Example
/// ```
/// use stratum_engine::prelude::*;
///
/// let node = EntityBuilder::new("player")
///     .with_position(Vec2::new(10.0, 0.0))
///     .with_draw_layer(2)
///     .build();
/// assert_eq!(node.name(), "player");
/// assert_eq!(node.local_draw_layer(), 2);
/// ```
#[must_use]
pub struct EntityBuilder {
    node: EntityNode,
}

impl EntityBuilder {
    /// Start a generic node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            node: EntityNode::new(name),
        }
    }

    /// Local position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.node.transform.position = position;
        self
    }

    /// Local rotation in radians
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.node.transform.set_rotation(radians);
        self
    }

    /// Local scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.node.transform.scale = scale;
        self
    }

    /// Whole local transform
    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.node.transform = transform;
        self
    }

    /// Own draw layer
    pub fn with_draw_layer(mut self, layer: i32) -> Self {
        self.node.draw_layer = layer;
        self
    }

    /// Y-sort offset
    pub fn with_y_sort_offset(mut self, offset: f32) -> Self {
        self.node.y_sort_offset = offset;
        self
    }

    /// Independence flags
    pub fn with_flags(mut self, flags: TransformFlags) -> Self {
        self.node.flags = flags;
        self
    }

    /// Kind data
    pub fn with_kind(mut self, kind: impl Into<EntityKind>) -> Self {
        self.node.kind = kind.into();
        self
    }

    /// User behavior
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.node.behavior = Some(Box::new(behavior));
        self
    }

    /// Start hidden
    pub fn hidden(mut self) -> Self {
        self.node.visible = false;
        self
    }

    /// ID the built node will have
    pub const fn id(&self) -> EntityId {
        self.node.id
    }

    /// Finish
    pub fn build(self) -> EntityNode {
        self.node
    }
}
