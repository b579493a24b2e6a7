//! Contact reports produced by the physics world

use super::body::{BodyHandle, FixtureHandle};
use crate::foundation::math::Vec2;

/// Two fixtures touching, as reported by the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// First fixture
    pub fixture_a: FixtureHandle,
    /// Second fixture
    pub fixture_b: FixtureHandle,
    /// Body owning `fixture_a`
    pub body_a: BodyHandle,
    /// Body owning `fixture_b`
    pub body_b: BodyHandle,
    /// Unit normal from A towards B when the contact was last evaluated
    pub normal: Vec2,
    /// Whether either fixture is a sensor
    pub is_sensor: bool,
}

impl Contact {
    /// The body on the other side from `body`, if `body` takes part
    pub fn other_body(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Begin/end notification drained from the world after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    /// Fixtures started touching
    Begin(Contact),
    /// Fixtures stopped touching
    End(Contact),
}

/// Unordered fixture pair (always stores the smaller handle first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixturePair {
    /// Smaller handle
    pub a: FixtureHandle,
    /// Larger handle
    pub b: FixtureHandle,
}

impl FixturePair {
    /// Create a new pair in canonical order
    pub fn new(a: FixtureHandle, b: FixtureHandle) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// Whether the pair involves `fixture`
    pub fn contains(&self, fixture: FixtureHandle) -> bool {
        self.a == fixture || self.b == fixture
    }
}
