//! Body and fixture definitions

use super::filter::CollisionFilter;
use super::shape::Shape;
use crate::foundation::math::Vec2;
use slotmap::new_key_type;

new_key_type! {
    /// Opaque handle to a rigid body in a [`PhysicsWorld`](super::PhysicsWorld)
    pub struct BodyHandle;

    /// Opaque handle to a fixture attached to a body
    pub struct FixtureHandle;
}

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyKind {
    /// Never moves; infinite mass
    #[default]
    Static,
    /// Fully simulated
    Dynamic,
    /// Moved by velocity only; infinite mass
    Kinematic,
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDef {
    /// Simulation kind
    pub kind: BodyKind,
    /// Initial world position
    pub position: Vec2,
    /// Initial angle in radians
    pub angle: f32,
    /// Initial linear velocity
    pub linear_velocity: Vec2,
    /// Initial angular velocity
    pub angular_velocity: f32,
    /// Linear velocity damping per second
    pub linear_damping: f32,
    /// Angular velocity damping per second
    pub angular_damping: f32,
    /// Never rotate under contact or torque
    pub fixed_rotation: bool,
    /// Multiplier on world gravity
    pub gravity_scale: f32,
}

impl BodyDef {
    /// Definition of the given kind at the origin
    pub fn new(kind: BodyKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Builder for the initial pose
    #[must_use]
    pub fn at(mut self, position: Vec2, angle: f32) -> Self {
        self.position = position;
        self.angle = angle;
        self
    }
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            kind: BodyKind::Static,
            position: Vec2::zeros(),
            angle: 0.0,
            linear_velocity: Vec2::zeros(),
            angular_velocity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            fixed_rotation: false,
            gravity_scale: 1.0,
        }
    }
}

/// Everything needed to attach a fixture to a body
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureDef {
    /// Shape in body-local coordinates
    pub shape: Shape,
    /// Mass per unit area
    pub density: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Bounciness in `[0, 1]`
    pub restitution: f32,
    /// Contact filter
    pub filter: CollisionFilter,
    /// Report overlaps without any physical response
    pub is_sensor: bool,
}

impl FixtureDef {
    /// Default density
    pub const DEFAULT_DENSITY: f32 = 1.0;
    /// Default friction
    pub const DEFAULT_FRICTION: f32 = 0.3;
    /// Default restitution
    pub const DEFAULT_RESTITUTION: f32 = 0.0;

    /// Fixture with default material
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            density: Self::DEFAULT_DENSITY,
            friction: Self::DEFAULT_FRICTION,
            restitution: Self::DEFAULT_RESTITUTION,
            filter: CollisionFilter::default(),
            is_sensor: false,
        }
    }

    /// Box collider of `size` centred at `center`, turned by `angle` radians
    pub fn rect(center: Vec2, size: Vec2, angle: f32) -> Self {
        Self::new(Shape::rect(center, size, angle))
    }

    /// Circle collider
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::new(Shape::circle(center, radius))
    }

    /// Convex polygon collider; `None` for degenerate outlines
    pub fn polygon(points: &[Vec2]) -> Option<Self> {
        Shape::polygon(points).map(Self::new)
    }

    /// Builder for the material
    #[must_use]
    pub const fn with_material(mut self, density: f32, friction: f32, restitution: f32) -> Self {
        self.density = density;
        self.friction = friction;
        self.restitution = restitution;
        self
    }

    /// Builder for the sensor flag
    #[must_use]
    pub const fn as_sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }
}

/// A simulated body
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub(crate) kind: BodyKind,
    pub(crate) position: Vec2,
    pub(crate) angle: f32,
    pub(crate) linear_velocity: Vec2,
    pub(crate) angular_velocity: f32,
    pub(crate) force: Vec2,
    pub(crate) torque: f32,
    pub(crate) inv_mass: f32,
    pub(crate) inv_inertia: f32,
    pub(crate) linear_damping: f32,
    pub(crate) angular_damping: f32,
    pub(crate) fixed_rotation: bool,
    pub(crate) gravity_scale: f32,
    pub(crate) fixtures: Vec<FixtureHandle>,
}

impl RigidBody {
    pub(crate) fn from_def(def: &BodyDef) -> Self {
        Self {
            kind: def.kind,
            position: def.position,
            angle: def.angle,
            linear_velocity: def.linear_velocity,
            angular_velocity: def.angular_velocity,
            force: Vec2::zeros(),
            torque: 0.0,
            inv_mass: 0.0,
            inv_inertia: 0.0,
            linear_damping: def.linear_damping,
            angular_damping: def.angular_damping,
            fixed_rotation: def.fixed_rotation,
            gravity_scale: def.gravity_scale,
            fixtures: Vec::new(),
        }
    }

    /// Simulation kind
    pub const fn kind(&self) -> BodyKind {
        self.kind
    }

    /// World position
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Angle in radians
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Linear velocity
    pub const fn linear_velocity(&self) -> Vec2 {
        self.linear_velocity
    }

    /// Angular velocity in radians per second
    pub const fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Mass; zero for static and kinematic bodies
    pub fn mass(&self) -> f32 {
        if self.inv_mass > 0.0 {
            1.0 / self.inv_mass
        } else {
            0.0
        }
    }

    /// Attached fixtures
    pub fn fixtures(&self) -> &[FixtureHandle] {
        &self.fixtures
    }
}

/// A shape attached to a body
#[derive(Debug, Clone)]
pub struct Fixture {
    pub(crate) body: BodyHandle,
    pub(crate) shape: Shape,
    pub(crate) density: f32,
    pub(crate) friction: f32,
    pub(crate) restitution: f32,
    pub(crate) filter: CollisionFilter,
    pub(crate) is_sensor: bool,
}

impl Fixture {
    pub(crate) fn from_def(body: BodyHandle, def: FixtureDef) -> Self {
        Self {
            body,
            shape: def.shape,
            density: def.density,
            friction: def.friction,
            restitution: def.restitution,
            filter: def.filter,
            is_sensor: def.is_sensor,
        }
    }

    /// Owning body
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Shape in body-local coordinates
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Current filter
    pub const fn filter(&self) -> CollisionFilter {
        self.filter
    }

    /// Whether the fixture only reports overlaps
    pub const fn is_sensor(&self) -> bool {
        self.is_sensor
    }
}
