//! Named resources shared through a scene

use std::any::Any;
use std::collections::HashMap;

/// String-keyed store of arbitrary values
#[derive(Default)]
pub struct ResourceLocator {
    entries: HashMap<String, Box<dyn Any>>,
}

impl ResourceLocator {
    /// Create an empty locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource. Registering a name twice is a logic error: it is
    /// logged, asserted in debug builds, and ignored otherwise.
    pub fn register<T: Any>(&mut self, name: impl Into<String>, value: T) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            log::error!("Resource '{name}' is already registered");
            debug_assert!(false, "resource '{name}' registered twice");
            return false;
        }
        self.entries.insert(name, Box::new(value));
        true
    }

    /// Resource of a concrete type
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.entries.get(name)?.downcast_ref()
    }

    /// Resource of a concrete type, mutably
    pub fn get_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)?.downcast_mut()
    }

    /// Resource without a type
    pub fn get_any(&self, name: &str) -> Option<&dyn Any> {
        self.entries.get(name).map(|value| &**value)
    }

    /// Resource without a type, mutably
    pub fn get_any_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
        self.entries.get_mut(name).map(|value| &mut **value)
    }

    /// Whether a name is taken
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no resources
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
