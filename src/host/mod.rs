//! Software host for running the screenshot tool outside a game engine.

mod runner;
mod software;

pub use runner::{RunOptions, RunSummary, Runner};
pub use software::{HUD_COLOR, SoftwareHost};
