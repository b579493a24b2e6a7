//! Per-frame passes and contact dispatch

use super::events::SceneEvent;
use super::scene_graph::Scene;
use crate::entity::{EntityId, EntityKind};
use crate::physics::{BodyKind, Collision, ContactEvent};

impl Scene {
    fn registered_snapshot(&self) -> Vec<EntityId> {
        self.registry.iter().copied().collect()
    }

    /// Variable-rate pass. Animated sprites advance, then behaviors run, in
    /// ID order. Skipped while paused.
    pub fn update(&mut self, delta_time: f32) {
        if self.is_paused() {
            return;
        }
        for id in self.registered_snapshot() {
            if let Some(sprite) = self
                .tree
                .get_mut(id)
                .and_then(|node| node.kind.as_animated_sprite_mut())
            {
                sprite.advance(delta_time);
            }
            self.with_behavior(id, |behavior, scene| behavior.update(id, scene, delta_time));
        }
    }

    /// One physics step: simulate, route contacts, sync poses, then run the
    /// behaviors' fixed update. Runs whether or not the scene is paused.
    pub fn fixed_update(&mut self, step: f32) {
        self.physics.step(step);
        for event in self.physics.drain_events() {
            self.dispatch_contact(event);
        }
        self.sync_physics();

        for id in self.registered_snapshot() {
            self.with_behavior(id, |behavior, scene| behavior.fixed_update(id, scene, step));
        }
    }

    /// Cameras follow their entities, then behaviors run their late update
    pub fn late_update(&mut self, delta_time: f32) {
        let cameras: Vec<EntityId> = self.cameras.iter().copied().collect();
        for id in cameras {
            let position = self.tree.global_position(id).unwrap_or_default();
            let rotation = self.tree.global_rotation_degrees(id).unwrap_or_default();
            if let Some(camera) = self.tree.get_mut(id).and_then(|node| node.kind.as_camera_mut()) {
                camera.resolve(position, rotation);
            }
        }

        for id in self.registered_snapshot() {
            self.with_behavior(id, |behavior, scene| behavior.late_update(id, scene, delta_time));
        }
    }

    /// Route one contact report to the entities involved
    pub fn dispatch_contact(&mut self, event: ContactEvent) {
        let (collisions, began) = match event {
            ContactEvent::Begin(contact) => (self.tracker.begin_contact(&contact, &self.bridge), true),
            ContactEvent::End(contact) => (self.tracker.end_contact(&contact, &self.bridge), false),
        };

        for collision in collisions {
            self.track_overlap(&collision, began);
            self.with_behavior(collision.entity, |behavior, scene| {
                if began {
                    behavior.on_collision_start(&collision, scene);
                } else {
                    behavior.on_collision_end(&collision, scene);
                }
            });
        }
    }

    fn track_overlap(&mut self, collision: &Collision, began: bool) {
        let trigger = collision.entity;
        let Some(body) = self
            .tree
            .get_mut(trigger)
            .and_then(|node| node.kind.as_physics_mut())
            .filter(|body| body.is_trigger())
        else {
            return;
        };

        if began {
            let Some(name) = collision.other_name.as_deref() else {
                return;
            };
            if body.record_overlap_begin(name, collision.other_body) {
                log::trace!("{name} entered trigger {trigger}");
                self.events.push(SceneEvent::BodyEntered {
                    trigger,
                    other: collision.other_entity,
                    name: name.to_owned(),
                });
            }
        } else if let Some(name) = body.record_overlap_end(collision.other_name.as_deref(), collision.other_body) {
            log::trace!("{name} left trigger {trigger}");
            self.events.push(SceneEvent::BodyExited {
                trigger,
                other: collision.other_entity,
                name,
            });
        }
    }

    /// Dynamic bodies drive their entities; static and kinematic bodies
    /// follow theirs
    fn sync_physics(&mut self) {
        for id in self.registered_snapshot() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let EntityKind::Physics(physics) = &node.kind else {
                continue;
            };
            let Some(handle) = physics.handle() else {
                continue;
            };

            if physics.body_kind() == BodyKind::Dynamic {
                let Some(body) = self.physics.body(handle) else {
                    continue;
                };
                let (position, angle) = (body.position(), body.angle());
                if let Some(node) = self.tree.get_mut(id) {
                    node.transform.position = position;
                    node.transform.set_rotation(angle);
                }
            } else {
                let position = self.tree.global_position(id).unwrap_or_default();
                let angle = self.tree.global_rotation(id).unwrap_or_default();
                self.physics.set_transform(handle, position, angle);
            }
        }
    }
}
