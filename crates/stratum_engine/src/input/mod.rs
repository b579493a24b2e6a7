//! Named input actions
//!
//! The platform layer feeds raw presses and releases into [`InputMap`];
//! gameplay code only ever asks about actions by name.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A physical input an action can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key by platform key code
    Key(u32),
    /// Mouse button by index
    MouseButton(u32),
    /// Gamepad button
    GamepadButton {
        /// Gamepad index
        pad: u32,
        /// Button index
        button: u32,
    },
}

/// Input errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// Action name already taken
    #[error("input action already exists: {0}")]
    ActionExists(String),

    /// No action of that name
    #[error("unknown input action: {0}")]
    UnknownAction(String),
}

/// Raw binding state for the current frame
#[derive(Debug, Default)]
pub struct InputState {
    down: HashSet<InputBinding>,
    pressed: HashSet<InputBinding>,
}

impl InputState {
    /// Whether the binding is held
    pub fn is_down(&self, binding: InputBinding) -> bool {
        self.down.contains(&binding)
    }

    /// Whether the binding went down this frame
    pub fn is_pressed(&self, binding: InputBinding) -> bool {
        self.pressed.contains(&binding)
    }
}

/// Action name to bindings, over an externally fed [`InputState`]
#[derive(Debug, Default)]
pub struct InputMap {
    actions: HashMap<String, Vec<InputBinding>>,
    state: InputState,
}

impl InputMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Define an action with no bindings
    pub fn add_action(&mut self, name: impl Into<String>) -> Result<(), InputError> {
        let name = name.into();
        if self.actions.contains_key(&name) {
            return Err(InputError::ActionExists(name));
        }
        self.actions.insert(name, Vec::new());
        Ok(())
    }

    /// Remove an action and its bindings
    pub fn remove_action(&mut self, name: &str) -> Result<(), InputError> {
        self.actions
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| InputError::UnknownAction(name.to_owned()))
    }

    /// Bind an input to an existing action
    pub fn add_binding(&mut self, name: &str, binding: InputBinding) -> Result<(), InputError> {
        let bindings = self
            .actions
            .get_mut(name)
            .ok_or_else(|| InputError::UnknownAction(name.to_owned()))?;
        if !bindings.contains(&binding) {
            bindings.push(binding);
        }
        Ok(())
    }

    /// Whether the action is defined
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Whether any binding of the action is held
    pub fn is_action_down(&self, name: &str) -> bool {
        self.actions
            .get(name)
            .is_some_and(|bindings| bindings.iter().any(|&b| self.state.is_down(b)))
    }

    /// Whether any binding of the action went down this frame
    pub fn is_action_pressed(&self, name: &str) -> bool {
        self.actions
            .get(name)
            .is_some_and(|bindings| bindings.iter().any(|&b| self.state.is_pressed(b)))
    }

    /// -1, 0 or 1 from a pair of opposing actions
    pub fn axis(&self, negative: &str, positive: &str) -> f32 {
        for name in [negative, positive] {
            if !self.has_action(name) {
                log::error!("Axis queried with undefined action '{name}'");
                debug_assert!(false, "undefined input action '{name}'");
                return 0.0;
            }
        }
        let mut value = 0.0;
        if self.is_action_down(negative) {
            value -= 1.0;
        }
        if self.is_action_down(positive) {
            value += 1.0;
        }
        value
    }

    /// Record a binding going down
    pub fn press(&mut self, binding: InputBinding) {
        if self.state.down.insert(binding) {
            self.state.pressed.insert(binding);
        }
    }

    /// Record a binding going up
    pub fn release(&mut self, binding: InputBinding) {
        self.state.down.remove(&binding);
    }

    /// Forget this frame's fresh presses
    pub fn end_frame(&mut self) {
        self.state.pressed.clear();
    }

    /// Raw state
    pub const fn state(&self) -> &InputState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: InputBinding = InputBinding::Key(263);
    const RIGHT: InputBinding = InputBinding::Key(262);

    fn movement() -> InputMap {
        let mut map = InputMap::new();
        map.add_action("left").unwrap();
        map.add_action("right").unwrap();
        map.add_binding("left", LEFT).unwrap();
        map.add_binding("right", RIGHT).unwrap();
        map.add_binding("right", InputBinding::GamepadButton { pad: 0, button: 14 }).unwrap();
        map
    }

    #[test]
    fn test_action_management_errors() {
        let mut map = movement();
        assert_eq!(map.add_action("left"), Err(InputError::ActionExists("left".into())));
        assert_eq!(map.remove_action("jump"), Err(InputError::UnknownAction("jump".into())));
        assert!(map.add_binding("jump", InputBinding::Key(32)).is_err());
        assert!(map.remove_action("left").is_ok());
        assert!(!map.has_action("left"));
    }

    #[test]
    fn test_pressed_lasts_one_frame() {
        let mut map = movement();
        map.press(RIGHT);
        assert!(map.is_action_down("right"));
        assert!(map.is_action_pressed("right"));

        map.end_frame();
        map.press(RIGHT);
        assert!(map.is_action_down("right"));
        assert!(!map.is_action_pressed("right"));

        map.release(RIGHT);
        assert!(!map.is_action_down("right"));
    }

    #[test]
    fn test_axis_combines_actions() {
        let mut map = movement();
        assert_eq!(map.axis("left", "right"), 0.0);
        map.press(LEFT);
        assert_eq!(map.axis("left", "right"), -1.0);
        map.press(InputBinding::GamepadButton { pad: 0, button: 14 });
        assert_eq!(map.axis("left", "right"), 0.0);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "undefined input action"))]
    fn test_axis_with_undefined_action() {
        let map = movement();
        assert_eq!(map.axis("left", "jump"), 0.0);
    }
}
