//! Polled input state: held keys and the last pointer position.
//!
//! Updated by [`route_input`](crate::systems::input::route_input) before the
//! matching event is published, so handlers reacting to a key event already
//! see it in the table.

use rustc_hash::FxHashSet;

use crate::components::vector::Vector;

/// Logical key name as stored and published. A literal space becomes `"space"`.
pub fn normalize_key(key: &str) -> String {
    if key == " " {
        "space".to_string()
    } else {
        key.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct InputState {
    held: FxHashSet<String>,
    pointer: Vector,
    focused: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            held: FxHashSet::default(),
            pointer: Vector::ZERO,
            focused: true,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.held.insert(normalize_key(key));
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(&normalize_key(key));
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&normalize_key(key))
    }

    pub fn held_keys(&self) -> impl Iterator<Item = &str> {
        self.held.iter().map(String::as_str)
    }

    pub fn pointer(&self) -> Vector {
        self.pointer
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Vector::xy(x, y);
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Losing focus also releases every held key, since key-up events for
    /// them will never arrive.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.held.clear();
        }
    }
}
