//! 2D physics
//!
//! A small rigid-body world plus the glue that ties its bodies back to
//! entities: the [`CollisionBridge`] records body ownership and the
//! [`CollisionTracker`] turns contact reports into per-entity notifications.

pub mod body;
pub mod bridge;
pub mod contact;
pub mod filter;
pub mod shape;
pub mod tracker;
pub mod world;

pub use body::{BodyDef, BodyHandle, BodyKind, Fixture, FixtureDef, FixtureHandle, RigidBody};
pub use bridge::{BodyUserData, CollisionBridge};
pub use contact::{Contact, ContactEvent, FixturePair};
pub use filter::CollisionFilter;
pub use shape::{Shape, WorldShape};
pub use tracker::{Collision, CollisionTracker};
pub use world::{PhysicsWorld, RayHit};
