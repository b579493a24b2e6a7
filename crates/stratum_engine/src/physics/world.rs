//! Rigid-body world
//!
//! Each step integrates velocities and positions, then finds overlapping
//! fixture pairs in two phases: a broad phase on axis-aligned bounds and a
//! narrow phase on the exact shapes. Solid contacts get a simple impulse
//! response. Begin and end events come from diffing this step's touching pairs
//! against the previous step's, and are queued until drained.

use super::body::{BodyDef, BodyHandle, BodyKind, Fixture, FixtureDef, FixtureHandle, RigidBody};
use super::contact::{Contact, ContactEvent, FixturePair};
use super::filter::CollisionFilter;
use super::shape::{self, Manifold, WorldShape};
use crate::foundation::math::{cross, Rect, Vec2};
use slotmap::SlotMap;
use std::collections::BTreeMap;

/// Penetration allowed before positional correction kicks in
const LINEAR_SLOP: f32 = 0.005;

/// Share of the remaining penetration removed per step
const CORRECTION_PERCENT: f32 = 0.8;

/// One fixture crossed by a ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Body owning the fixture
    pub body: BodyHandle,
    /// Fixture hit
    pub fixture: FixtureHandle,
    /// World point of the hit
    pub point: Vec2,
    /// Surface normal at the hit
    pub normal: Vec2,
    /// Fraction along the cast segment
    pub fraction: f32,
}

/// The physics simulation
pub struct PhysicsWorld {
    gravity: Vec2,
    bodies: SlotMap<BodyHandle, RigidBody>,
    fixtures: SlotMap<FixtureHandle, Fixture>,
    touching: BTreeMap<FixturePair, Contact>,
    events: Vec<ContactEvent>,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: SlotMap::with_key(),
            fixtures: SlotMap::with_key(),
            touching: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// World gravity
    pub const fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Change world gravity
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Create a body with no fixtures
    pub fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        self.bodies.insert(RigidBody::from_def(def))
    }

    /// Destroy a body and its fixtures. Contacts it was part of end.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> bool {
        let Some(body) = self.bodies.remove(handle) else {
            return false;
        };
        for fixture in body.fixtures {
            self.fixtures.remove(fixture);
            self.end_contacts_of(fixture);
        }
        true
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Attach a fixture and recompute the body's mass
    pub fn create_fixture(&mut self, body: BodyHandle, def: FixtureDef) -> Option<FixtureHandle> {
        if !self.bodies.contains_key(body) {
            return None;
        }
        let fixture = self.fixtures.insert(Fixture::from_def(body, def));
        if let Some(owner) = self.bodies.get_mut(body) {
            owner.fixtures.push(fixture);
        }
        self.update_mass(body);
        Some(fixture)
    }

    /// Detach a fixture. Contacts it was part of end.
    pub fn destroy_fixture(&mut self, fixture: FixtureHandle) -> bool {
        let Some(removed) = self.fixtures.remove(fixture) else {
            return false;
        };
        if let Some(owner) = self.bodies.get_mut(removed.body) {
            owner.fixtures.retain(|&f| f != fixture);
        }
        self.update_mass(removed.body);
        self.end_contacts_of(fixture);
        true
    }

    /// Look up a fixture
    pub fn fixture(&self, fixture: FixtureHandle) -> Option<&Fixture> {
        self.fixtures.get(fixture)
    }

    /// Replace a fixture's filter
    pub fn set_fixture_filter(&mut self, fixture: FixtureHandle, filter: CollisionFilter) -> bool {
        self.fixtures.get_mut(fixture).map(|f| f.filter = filter).is_some()
    }

    /// Teleport a body
    pub fn set_transform(&mut self, handle: BodyHandle, position: Vec2, angle: f32) -> bool {
        self.bodies
            .get_mut(handle)
            .map(|body| {
                body.position = position;
                body.angle = angle;
            })
            .is_some()
    }

    /// Overwrite a body's linear velocity
    pub fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> bool {
        self.bodies
            .get_mut(handle)
            .filter(|body| body.kind != BodyKind::Static)
            .map(|body| body.linear_velocity = velocity)
            .is_some()
    }

    /// Overwrite a body's angular velocity
    pub fn set_angular_velocity(&mut self, handle: BodyHandle, velocity: f32) -> bool {
        self.bodies
            .get_mut(handle)
            .filter(|body| body.kind != BodyKind::Static)
            .map(|body| body.angular_velocity = velocity)
            .is_some()
    }

    /// Accumulate a force at a world point until the next step
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec2, point: Vec2) -> bool {
        self.dynamic_body_mut(handle)
            .map(|body| {
                body.force += force;
                body.torque += cross(point - body.position, force);
            })
            .is_some()
    }

    /// Accumulate a force through the body origin until the next step
    pub fn apply_force_to_center(&mut self, handle: BodyHandle, force: Vec2) -> bool {
        self.dynamic_body_mut(handle).map(|body| body.force += force).is_some()
    }

    /// Accumulate a torque until the next step
    pub fn apply_torque(&mut self, handle: BodyHandle, torque: f32) -> bool {
        self.dynamic_body_mut(handle).map(|body| body.torque += torque).is_some()
    }

    /// Change velocity immediately by an impulse at a world point
    pub fn apply_linear_impulse(&mut self, handle: BodyHandle, impulse: Vec2, point: Vec2) -> bool {
        self.dynamic_body_mut(handle)
            .map(|body| {
                body.linear_velocity += impulse * body.inv_mass;
                body.angular_velocity += body.inv_inertia * cross(point - body.position, impulse);
            })
            .is_some()
    }

    fn dynamic_body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies
            .get_mut(handle)
            .filter(|body| body.kind == BodyKind::Dynamic)
    }

    fn update_mass(&mut self, handle: BodyHandle) {
        let Some(body) = self.bodies.get(handle) else {
            return;
        };
        let (mut mass, mut inertia) = (0.0, 0.0);
        for fixture in body.fixtures.iter().filter_map(|&f| self.fixtures.get(f)) {
            if fixture.is_sensor || fixture.density <= 0.0 {
                continue;
            }
            let fixture_mass = fixture.density * fixture.shape.area();
            mass += fixture_mass;
            inertia += fixture.shape.inertia(fixture_mass);
        }

        if let Some(body) = self.bodies.get_mut(handle) {
            if body.kind == BodyKind::Dynamic {
                // a dynamic body without solid fixtures still needs a finite mass
                body.inv_mass = if mass > 0.0 { 1.0 / mass } else { 1.0 };
                body.inv_inertia = if inertia > 0.0 && !body.fixed_rotation {
                    1.0 / inertia
                } else {
                    0.0
                };
            } else {
                body.inv_mass = 0.0;
                body.inv_inertia = 0.0;
            }
        }
    }

    fn end_contacts_of(&mut self, fixture: FixtureHandle) {
        let ended: Vec<FixturePair> = self
            .touching
            .keys()
            .filter(|pair| pair.contains(fixture))
            .copied()
            .collect();
        for pair in ended {
            if let Some(contact) = self.touching.remove(&pair) {
                self.events.push(ContactEvent::End(contact));
            }
        }
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integrate(dt);

        let placed: Vec<(FixtureHandle, WorldShape, Rect)> = self
            .fixtures
            .iter()
            .filter_map(|(handle, fixture)| {
                let body = self.bodies.get(fixture.body)?;
                let world = fixture.shape.to_world(body.position, body.angle);
                let bounds = world.aabb();
                Some((handle, world, bounds))
            })
            .collect();

        let mut touching = BTreeMap::new();
        for (i, (handle_a, shape_a, bounds_a)) in placed.iter().enumerate() {
            for (handle_b, shape_b, bounds_b) in &placed[i + 1..] {
                // Broad phase
                if !bounds_a.intersects(bounds_b) || !self.may_touch(*handle_a, *handle_b) {
                    continue;
                }
                // Narrow phase
                let Some(manifold) = shape::collide(shape_a, shape_b) else {
                    continue;
                };
                let (Some(fixture_a), Some(fixture_b)) =
                    (self.fixtures.get(*handle_a), self.fixtures.get(*handle_b))
                else {
                    continue;
                };

                let contact = Contact {
                    fixture_a: *handle_a,
                    fixture_b: *handle_b,
                    body_a: fixture_a.body,
                    body_b: fixture_b.body,
                    normal: manifold.normal,
                    is_sensor: fixture_a.is_sensor || fixture_b.is_sensor,
                };
                if !contact.is_sensor {
                    let restitution = fixture_a.restitution.max(fixture_b.restitution);
                    let friction = (fixture_a.friction * fixture_b.friction).sqrt();
                    self.resolve(&contact, manifold, restitution, friction);
                }
                touching.insert(FixturePair::new(*handle_a, *handle_b), contact);
            }
        }

        for (pair, contact) in &touching {
            if !self.touching.contains_key(pair) {
                self.events.push(ContactEvent::Begin(*contact));
            }
        }
        for (pair, contact) in &self.touching {
            if !touching.contains_key(pair) {
                self.events.push(ContactEvent::End(*contact));
            }
        }
        self.touching = touching;
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            match body.kind {
                BodyKind::Static => {}
                BodyKind::Kinematic => {
                    body.position += body.linear_velocity * dt;
                    body.angle += body.angular_velocity * dt;
                }
                BodyKind::Dynamic => {
                    body.linear_velocity += (gravity * body.gravity_scale + body.force * body.inv_mass) * dt;
                    body.angular_velocity += body.torque * body.inv_inertia * dt;
                    body.linear_velocity *= 1.0 / (1.0 + dt * body.linear_damping);
                    body.angular_velocity *= 1.0 / (1.0 + dt * body.angular_damping);
                    if body.fixed_rotation {
                        body.angular_velocity = 0.0;
                    }

                    body.position += body.linear_velocity * dt;
                    body.angle += body.angular_velocity * dt;
                }
            }
            body.force = Vec2::zeros();
            body.torque = 0.0;
        }
    }

    fn may_touch(&self, a: FixtureHandle, b: FixtureHandle) -> bool {
        let (Some(fa), Some(fb)) = (self.fixtures.get(a), self.fixtures.get(b)) else {
            return false;
        };
        if fa.body == fb.body || !fa.filter.should_collide(&fb.filter) {
            return false;
        }
        let is_dynamic = |handle| {
            self.bodies
                .get(handle)
                .is_some_and(|body: &RigidBody| body.kind == BodyKind::Dynamic)
        };
        // at least one side has to be simulated for a contact to exist
        is_dynamic(fa.body) || is_dynamic(fb.body)
    }

    fn resolve(&mut self, contact: &Contact, manifold: Manifold, restitution: f32, friction: f32) {
        let Some([a, b]) = self.bodies.get_disjoint_mut([contact.body_a, contact.body_b]) else {
            return;
        };
        let inv_mass_sum = a.inv_mass + b.inv_mass;
        if inv_mass_sum <= 0.0 {
            return;
        }
        let normal = manifold.normal;

        let correction =
            normal * ((manifold.depth - LINEAR_SLOP).max(0.0) / inv_mass_sum * CORRECTION_PERCENT);
        a.position -= correction * a.inv_mass;
        b.position += correction * b.inv_mass;

        let relative = b.linear_velocity - a.linear_velocity;
        let normal_speed = relative.dot(&normal);
        if normal_speed >= 0.0 {
            return;
        }
        let j = -(1.0 + restitution) * normal_speed / inv_mass_sum;
        a.linear_velocity -= normal * (j * a.inv_mass);
        b.linear_velocity += normal * (j * b.inv_mass);

        let relative = b.linear_velocity - a.linear_velocity;
        let tangential = relative - normal * relative.dot(&normal);
        let tangent_speed = tangential.norm();
        if tangent_speed > f32::EPSILON {
            let tangent = tangential / tangent_speed;
            let jt = (-relative.dot(&tangent) / inv_mass_sum).clamp(-j * friction, j * friction);
            a.linear_velocity -= tangent * (jt * a.inv_mass);
            b.linear_velocity += tangent * (jt * b.inv_mass);
        }
    }

    /// Take the contact events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of fixture pairs currently touching
    pub fn touching_count(&self) -> usize {
        self.touching.len()
    }

    /// Every fixture placed at its body's current pose
    pub fn world_shapes(&self) -> impl Iterator<Item = (FixtureHandle, WorldShape)> + '_ {
        self.fixtures.iter().filter_map(|(handle, fixture)| {
            let body = self.bodies.get(fixture.body)?;
            Some((handle, fixture.shape.to_world(body.position, body.angle)))
        })
    }

    /// Cast a segment and report every fixture in a `mask` category it
    /// crosses, nearest first
    pub fn ray_cast(&self, start: Vec2, end: Vec2, mask: u16) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .fixtures
            .iter()
            .filter(|(_, fixture)| fixture.filter.category & mask != 0)
            .filter_map(|(handle, fixture)| {
                let body = self.bodies.get(fixture.body)?;
                let world = fixture.shape.to_world(body.position, body.angle);
                let (fraction, normal) = shape::ray_cast(&world, start, end)?;
                Some(RayHit {
                    body: fixture.body,
                    fixture: handle,
                    point: start + (end - start) * fraction,
                    normal,
                    fraction,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        hits
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec2::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn ground(world: &mut PhysicsWorld) -> BodyHandle {
        let body = world.create_body(&BodyDef::new(BodyKind::Static).at(Vec2::new(0.0, 10.0), 0.0));
        world.create_fixture(body, FixtureDef::rect(Vec2::zeros(), Vec2::new(40.0, 2.0), 0.0));
        body
    }

    fn ball(world: &mut PhysicsWorld, position: Vec2) -> BodyHandle {
        let body = world.create_body(&BodyDef::new(BodyKind::Dynamic).at(position, 0.0));
        world.create_fixture(body, FixtureDef::circle(Vec2::zeros(), 0.5));
        body
    }

    fn count_begins(events: &[ContactEvent]) -> usize {
        events.iter().filter(|e| matches!(e, ContactEvent::Begin(_))).count()
    }

    #[test]
    fn test_ball_lands_on_ground() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 9.8));
        ground(&mut world);
        let ball = ball(&mut world, Vec2::new(0.0, 5.0));

        let mut events = Vec::new();
        for _ in 0..240 {
            world.step(DT);
            events.extend(world.drain_events());
        }

        assert_eq!(count_begins(&events), 1);
        let body = world.body(ball).unwrap();
        // ground top is at y = 9, ball radius 0.5
        assert_relative_eq!(body.position().y, 8.5, epsilon = 0.05);
        assert!(body.linear_velocity().norm() < 0.5);
        assert_eq!(world.touching_count(), 1);
    }

    #[test]
    fn test_sensor_reports_without_response() {
        let mut world = PhysicsWorld::new(Vec2::zeros());
        let zone = world.create_body(&BodyDef::new(BodyKind::Kinematic));
        world.create_fixture(zone, FixtureDef::rect(Vec2::zeros(), Vec2::new(2.0, 2.0), 0.0).as_sensor());

        let mover = ball(&mut world, Vec2::new(-3.0, 0.0));
        world.set_linear_velocity(mover, Vec2::new(6.0, 0.0));

        let mut events = Vec::new();
        for _ in 0..120 {
            world.step(DT);
            events.extend(world.drain_events());
        }

        assert_eq!(count_begins(&events), 1);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], ContactEvent::End(c) if c.is_sensor));
        // passed straight through
        assert_relative_eq!(world.body(mover).unwrap().linear_velocity().x, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_filter_blocks_contact() {
        let mut world = PhysicsWorld::new(Vec2::zeros());
        let a = ball(&mut world, Vec2::zeros());
        let b = ball(&mut world, Vec2::new(0.5, 0.0));
        for body in [a, b] {
            let fixture = world.body(body).unwrap().fixtures()[0];
            world.set_fixture_filter(fixture, CollisionFilter::default().with_group(-1));
        }

        world.step(DT);
        assert!(world.drain_events().is_empty());
        assert_eq!(world.touching_count(), 0);
    }

    #[test]
    fn test_static_bodies_never_touch() {
        let mut world = PhysicsWorld::new(Vec2::zeros());
        ground(&mut world);
        ground(&mut world);
        world.step(DT);
        assert_eq!(world.touching_count(), 0);
    }

    #[test]
    fn test_destroying_body_ends_its_contacts() {
        let mut world = PhysicsWorld::new(Vec2::zeros());
        let a = ball(&mut world, Vec2::zeros());
        ball(&mut world, Vec2::new(0.8, 0.0));
        world.step(DT);
        assert_eq!(count_begins(&world.drain_events()), 1);

        assert!(world.destroy_body(a));
        assert!(!world.destroy_body(a));
        let events = world.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ContactEvent::End(c) if c.body_a == a || c.body_b == a));
        assert_eq!(world.touching_count(), 0);
    }

    #[test]
    fn test_impulse_and_kinematic_motion() {
        let mut world = PhysicsWorld::new(Vec2::zeros());
        let body = ball(&mut world, Vec2::zeros());
        let mass = world.body(body).unwrap().mass();
        assert_relative_eq!(mass, std::f32::consts::PI * 0.25, epsilon = 1e-5);

        world.apply_linear_impulse(body, Vec2::new(mass * 2.0, 0.0), Vec2::zeros());
        assert_relative_eq!(world.body(body).unwrap().linear_velocity().x, 2.0, epsilon = 1e-5);

        let platform = world.create_body(&BodyDef::new(BodyKind::Kinematic));
        world.set_linear_velocity(platform, Vec2::new(0.0, -3.0));
        assert!(!world.apply_force_to_center(platform, Vec2::new(1.0, 0.0)));
        world.step(0.5);
        assert_relative_eq!(world.body(platform).unwrap().position().y, -1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_cast_orders_and_filters() {
        let mut world = PhysicsWorld::new(Vec2::zeros());
        let near = ball(&mut world, Vec2::new(3.0, 0.0));
        let far = ball(&mut world, Vec2::new(6.0, 0.0));
        let far_fixture = world.body(far).unwrap().fixtures()[0];
        world.set_fixture_filter(far_fixture, CollisionFilter::default().with_category(0b100));

        let hits = world.ray_cast(Vec2::zeros(), Vec2::new(10.0, 0.0), CollisionFilter::ALL);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].body, near);
        assert_relative_eq!(hits[0].point.x, 2.5, epsilon = 1e-4);

        let filtered = world.ray_cast(Vec2::zeros(), Vec2::new(10.0, 0.0), 0b100);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].body, far);
    }
}
