//! Keyboard modifier state tracking.

/// Keyboard modifier state.
///
/// Tracks which modifier keys (Shift, Ctrl, Alt) are currently held so the
/// trigger key can be matched together with its modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key held
    pub shift: bool,
    /// Ctrl key held
    pub ctrl: bool,
    /// Alt key held
    pub alt: bool,
}

impl Modifiers {
    /// Updates the flag for `key` if it names a modifier.
    ///
    /// Returns `true` when `key` was a modifier.
    pub fn apply(&mut self, key: &str, held: bool) -> bool {
        let slot = match key.to_ascii_lowercase().as_str() {
            "shift" | "lshift" | "rshift" => &mut self.shift,
            "ctrl" | "control" | "lctrl" | "rctrl" => &mut self.ctrl,
            "alt" | "lalt" | "ralt" => &mut self.alt,
            _ => return false,
        };
        *slot = held;
        true
    }
}
