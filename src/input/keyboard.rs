//! Edge-triggered key state.

use std::collections::HashSet;

use super::modifiers::Modifiers;
use crate::config::KeyBinding;

/// Held keys plus the keys that went down since the last [`begin_frame`](Self::begin_frame).
#[derive(Debug, Default, Clone)]
pub struct KeyTracker {
    held: HashSet<String>,
    pressed_this_frame: HashSet<String>,
    modifiers: Modifiers,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets last frame's presses. Call once per update tick, before feeding events.
    pub fn begin_frame(&mut self) {
        self.pressed_this_frame.clear();
    }

    /// Records a key-down event. Auto-repeat of a held key is not a new press.
    pub fn key_down(&mut self, key: &str) {
        if self.modifiers.apply(key, true) {
            return;
        }
        let key = normalize(key);
        if self.held.insert(key.clone()) {
            self.pressed_this_frame.insert(key);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if self.modifiers.apply(key, false) {
            return;
        }
        self.held.remove(&normalize(key));
    }

    /// Presses and releases `key` within the current frame.
    pub fn tap(&mut self, key: &str) {
        self.key_down(key);
        self.key_up(key);
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&normalize(key))
    }

    /// `true` if `binding` transitioned to pressed during the current frame.
    pub fn was_pressed_this_frame(&self, binding: &KeyBinding) -> bool {
        let Modifiers { shift, ctrl, alt } = self.modifiers;
        self.pressed_this_frame
            .iter()
            .any(|key| binding.matches(key, ctrl, shift, alt))
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_uppercase()
}
