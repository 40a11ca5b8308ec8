//! Keyboard input polling.
//!
//! The host feeds raw key events into a [`KeyTracker`] and starts a new frame
//! before each update tick; the screenshot tool then asks whether its
//! binding went down during that tick.

pub mod keyboard;
pub mod modifiers;

pub use keyboard::KeyTracker;
pub use modifiers::Modifiers;
