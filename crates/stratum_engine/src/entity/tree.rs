//! Arena-backed entity hierarchy
//!
//! Nodes are stored by ID; parent and child links are IDs as well, so the
//! tree never holds references into itself. Global transforms are computed on
//! demand by walking the parent chain.

use super::node::EntityNode;
use super::EntityId;
use crate::foundation::math::{normalize_radians, rotate_vector, Vec2};
use crate::scene::SceneError;
use std::collections::HashMap;

/// Owns every entity node of a scene
#[derive(Debug)]
pub struct EntityTree {
    nodes: HashMap<EntityId, EntityNode>,
    root: EntityId,
}

impl EntityTree {
    /// Create a tree holding only the synthetic root
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = EntityNode::new(root_name);
        let root_id = root.id();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self { nodes, root: root_id }
    }

    /// The synthetic root. New nodes are not attached to it automatically.
    pub const fn root(&self) -> EntityId {
        self.root
    }

    /// Take ownership of a node as a root-level node
    pub fn insert(&mut self, mut node: EntityNode) -> EntityId {
        let id = node.id();
        node.parent = None;
        node.children.clear();
        self.nodes.insert(id, node);
        id
    }

    /// Look up a node
    pub fn get(&self, id: EntityId) -> Option<&EntityNode> {
        self.nodes.get(&id)
    }

    /// Look up a node mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityNode> {
        self.nodes.get_mut(&id)
    }

    /// Whether the node exists
    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root is left
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Every node ID, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.nodes.keys().copied()
    }

    /// Drop a node from the arena without touching its links
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<EntityNode> {
        self.nodes.remove(&id)
    }

    /// Whether `ancestor` appears on `node`'s parent chain
    pub fn is_ancestor(&self, ancestor: EntityId, node: EntityId) -> bool {
        let mut current = self.get(node).and_then(EntityNode::parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(EntityNode::parent);
        }
        false
    }

    /// Attach `child` under `parent`, detaching it from its old parent first.
    ///
    /// A no-op returning false if either node is missing, the child is already
    /// there, or the link would create a cycle.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        if parent == child || !self.contains(parent) || self.is_ancestor(child, parent) {
            return false;
        }
        let Some(node) = self.get(child) else {
            return false;
        };
        if node.parent() == Some(parent) {
            return false;
        }

        self.detach(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Move `child` under `parent`, or to root level for `None`
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> bool {
        match parent {
            Some(parent) => self.add_child(parent, child),
            None => self.detach(child),
        }
    }

    /// Detach `child` if it is a direct child of `parent`
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        if self.get(child).and_then(EntityNode::parent) != Some(parent) {
            return false;
        }
        self.detach(child)
    }

    /// Make a node root-level. Returns false if it already was.
    pub fn detach(&mut self, child: EntityId) -> bool {
        let Some(parent) = self.get_mut(child).and_then(|node| node.parent.take()) else {
            return false;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&id| id != child);
        }
        true
    }

    /// First direct child called `name`
    pub fn child_by_name(&self, parent: EntityId, name: &str) -> Option<EntityId> {
        self.get(parent)?
            .children()
            .iter()
            .copied()
            .find(|&id| self.get(id).is_some_and(|node| node.name() == name))
    }

    /// Direct child by position
    pub fn child_at(&self, parent: EntityId, index: usize) -> Result<EntityId, SceneError> {
        let node = self.get(parent).ok_or(SceneError::UnknownEntity(parent))?;
        node.children()
            .get(index)
            .copied()
            .ok_or(SceneError::ChildIndexOutOfBounds {
                entity: parent,
                index,
                len: node.children().len(),
            })
    }

    /// World position: the parent's global position plus the local position
    /// rotated by the parent's global rotation
    pub fn global_position(&self, id: EntityId) -> Option<Vec2> {
        let node = self.get(id)?;
        match node.parent().filter(|_| node.inherits_position()) {
            Some(parent) => {
                let origin = self.global_position(parent)?;
                let rotation = self.global_rotation(parent)?;
                Some(origin + rotate_vector(node.transform.position, rotation))
            }
            None => Some(node.transform.position),
        }
    }

    /// World rotation in radians, in `[0, 2π)`
    pub fn global_rotation(&self, id: EntityId) -> Option<f32> {
        let node = self.get(id)?;
        let local = node.transform.rotation();
        match node.parent().filter(|_| node.inherits_rotation()) {
            Some(parent) => Some(normalize_radians(self.global_rotation(parent)? + local)),
            None => Some(local),
        }
    }

    /// World rotation in degrees
    pub fn global_rotation_degrees(&self, id: EntityId) -> Option<f32> {
        self.global_rotation(id).map(f32::to_degrees)
    }

    /// World scale
    pub fn global_scale(&self, id: EntityId) -> Option<Vec2> {
        let node = self.get(id)?;
        match node.parent().filter(|_| node.inherits_scale()) {
            Some(parent) => Some(self.global_scale(parent)?.component_mul(&node.transform.scale)),
            None => Some(node.transform.scale),
        }
    }

    /// Effective draw layer: own layer plus every ancestor's
    pub fn draw_layer(&self, id: EntityId) -> Option<i32> {
        let mut node = self.get(id)?;
        let mut layer = node.local_draw_layer();
        while let Some(parent) = node.parent().and_then(|p| self.get(p)) {
            layer += parent.local_draw_layer();
            node = parent;
        }
        Some(layer)
    }

    /// Set a node's own draw layer
    pub fn set_draw_layer(&mut self, id: EntityId, layer: i32) -> bool {
        self.get_mut(id).map(|node| node.set_draw_layer(layer)).is_some()
    }

    /// Set visibility on a node and every current descendant
    pub fn set_visible(&mut self, id: EntityId, visible: bool) -> bool {
        if !self.contains(id) {
            return false;
        }
        for target in std::iter::once(id).chain(self.descendants(id)) {
            if let Some(node) = self.get_mut(target) {
                node.set_visible_flag(visible);
            }
        }
        true
    }

    /// Own visibility flag; false for unknown nodes
    pub fn is_visible(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(EntityNode::is_visible)
    }

    /// Names from the root-level ancestor down to the node, joined by `/`
    pub fn path(&self, id: EntityId) -> Option<String> {
        let mut names = vec![self.get(id)?.name()];
        let mut current = self.get(id).and_then(EntityNode::parent);
        while let Some(parent) = current.and_then(|p| self.get(p)) {
            names.push(parent.name());
            current = parent.parent();
        }
        names.reverse();
        Some(names.join("/"))
    }

    /// Every descendant, depth-first, parents before children
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityId> = self
            .get(id)
            .map(|node| node.children().iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.get(next) {
                stack.extend(node.children().iter().rev().copied());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityBuilder;
    use approx::assert_relative_eq;
    use rand::Rng;
    use std::f32::consts::{FRAC_PI_2, TAU};

    fn spawn(tree: &mut EntityTree, name: &str, position: Vec2) -> EntityId {
        tree.insert(EntityBuilder::new(name).with_position(position).build())
    }

    #[test]
    fn test_reparenting_moves_child() {
        let mut tree = EntityTree::new("root");
        let a = spawn(&mut tree, "a", Vec2::zeros());
        let b = spawn(&mut tree, "b", Vec2::zeros());
        let c = spawn(&mut tree, "c", Vec2::zeros());

        assert!(tree.add_child(a, c));
        assert!(!tree.add_child(a, c));
        assert!(tree.add_child(b, c));

        assert!(tree.get(a).unwrap().children().is_empty());
        assert_eq!(tree.get(b).unwrap().children(), &[c]);
        assert_eq!(tree.get(c).unwrap().parent(), Some(b));

        assert!(tree.set_parent(c, None));
        assert!(tree.get(b).unwrap().children().is_empty());
        assert!(!tree.remove_child(b, c));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut tree = EntityTree::new("root");
        let a = spawn(&mut tree, "a", Vec2::zeros());
        let b = spawn(&mut tree, "b", Vec2::zeros());
        tree.add_child(a, b);

        assert!(!tree.add_child(b, a));
        assert!(!tree.add_child(a, a));
        assert_eq!(tree.get(a).unwrap().parent(), None);
        assert!(tree.is_ancestor(a, b));
    }

    #[test]
    fn test_global_position_quarter_turn() {
        let mut tree = EntityTree::new("root");
        let parent = spawn(&mut tree, "parent", Vec2::new(10.0, 0.0));
        tree.get_mut(parent).unwrap().transform.set_rotation_degrees(90.0);
        let child = spawn(&mut tree, "child", Vec2::new(5.0, 0.0));
        tree.add_child(parent, child);

        let global = tree.global_position(child).unwrap();
        assert_relative_eq!(global.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(global.y, 5.0, epsilon = 1e-4);
        assert_relative_eq!(tree.global_rotation(child).unwrap(), FRAC_PI_2, epsilon = 1e-5);
    }

    #[test]
    fn test_global_position_random_rotations() {
        let mut rng = rand::thread_rng();
        let mut tree = EntityTree::new("root");
        for _ in 0..200 {
            let parent_position = Vec2::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
            let parent_rotation = rng.gen_range(-TAU..TAU);
            let local = Vec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
            let child_rotation = rng.gen_range(0.0..TAU);

            let parent = spawn(&mut tree, "parent", parent_position);
            tree.get_mut(parent).unwrap().transform.set_rotation(parent_rotation);
            let child = spawn(&mut tree, "child", local);
            tree.get_mut(child).unwrap().transform.set_rotation(child_rotation);
            tree.add_child(parent, child);

            let (sin, cos) = parent_rotation.sin_cos();
            let expected = parent_position + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
            let global = tree.global_position(child).unwrap();
            assert_relative_eq!(global.x, expected.x, epsilon = 1e-2);
            assert_relative_eq!(global.y, expected.y, epsilon = 1e-2);

            let rotation = tree.global_rotation(child).unwrap();
            assert!((0.0..TAU).contains(&rotation));
            let expected_rotation = (parent_rotation + child_rotation).rem_euclid(TAU);
            let diff = (rotation - expected_rotation).abs();
            assert!(diff < 1e-3 || (TAU - diff) < 1e-3);
        }
    }

    #[test]
    fn test_position_independent_child_ignores_parent() {
        let mut tree = EntityTree::new("root");
        let parent = spawn(&mut tree, "parent", Vec2::new(10.0, 10.0));
        let child = tree.insert(
            EntityBuilder::new("hud")
                .with_position(Vec2::new(1.0, 2.0))
                .with_flags(crate::entity::TransformFlags::POSITION)
                .build(),
        );
        tree.add_child(parent, child);
        assert_eq!(tree.global_position(child), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_global_scale_multiplies() {
        let mut tree = EntityTree::new("root");
        let parent = tree.insert(EntityBuilder::new("p").with_scale(Vec2::new(2.0, 3.0)).build());
        let child = tree.insert(EntityBuilder::new("c").with_scale(Vec2::new(0.5, 2.0)).build());
        tree.add_child(parent, child);
        assert_eq!(tree.global_scale(child), Some(Vec2::new(1.0, 6.0)));
    }

    #[test]
    fn test_visibility_propagates_down() {
        let mut tree = EntityTree::new("root");
        let a = spawn(&mut tree, "a", Vec2::zeros());
        let b = spawn(&mut tree, "b", Vec2::zeros());
        let c = spawn(&mut tree, "c", Vec2::zeros());
        tree.add_child(a, b);
        tree.add_child(b, c);

        tree.set_visible(a, false);
        assert!(!tree.is_visible(a) && !tree.is_visible(b) && !tree.is_visible(c));

        tree.set_visible(b, true);
        assert!(!tree.is_visible(a));
        assert!(tree.is_visible(b) && tree.is_visible(c));
    }

    #[test]
    fn test_draw_layer_accumulates() {
        let mut tree = EntityTree::new("root");
        let map = tree.insert(EntityBuilder::new("map").with_draw_layer(-100).build());
        let layer = tree.insert(EntityBuilder::new("layer").with_draw_layer(2).build());
        tree.add_child(map, layer);
        assert_eq!(tree.draw_layer(layer), Some(-98));
    }

    #[test]
    fn test_lookup_by_name_index_and_path() {
        let mut tree = EntityTree::new("root");
        let level = spawn(&mut tree, "level", Vec2::zeros());
        let first = spawn(&mut tree, "enemy", Vec2::zeros());
        let second = spawn(&mut tree, "enemy", Vec2::zeros());
        tree.add_child(level, first);
        tree.add_child(level, second);

        assert_eq!(tree.child_by_name(level, "enemy"), Some(first));
        assert_eq!(tree.child_at(level, 1).unwrap(), second);
        assert!(matches!(
            tree.child_at(level, 2),
            Err(SceneError::ChildIndexOutOfBounds { index: 2, len: 2, .. })
        ));
        assert_eq!(tree.path(second).as_deref(), Some("level/enemy"));
        assert_eq!(tree.descendants(level), vec![first, second]);
    }
}
