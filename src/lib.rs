//! In-game screenshot tool.
//!
//! Captures a centered region of a rendered frame with the UI hidden,
//! optionally converts it to greyscale and writes a timestamped PNG. Host
//! engine services are traits; [`host`] provides a software implementation
//! used by the `framesnap` binary and the tests.

pub mod capture;
pub mod config;
pub mod host;
pub mod input;
pub mod settings;
pub mod tool;

pub use config::Config;
pub use tool::{Scene, SceneService, ScreenshotTool};
