//! Data types for screenshot capture.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::file::FileSaveConfig;
use crate::config::{CaptureMode, Config, DEFAULT_STALL_TIMEOUT_SECS, GreyscaleMode};

/// How the host draws its UI overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// World plus HUD and overlays.
    Normal,
    /// Full-screen map or menu view.
    Menu,
    /// World only; used while capturing.
    Hidden,
}

/// Immutable snapshot of the capture settings taken when a capture is triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub mode: CaptureMode,
    pub custom_width: i32,
    pub custom_height: i32,
    pub adjust_field_of_view: bool,
    pub target_field_of_view: f32,
    pub greyscale: GreyscaleMode,
    pub stall_timeout_secs: f64,
    pub save_config: FileSaveConfig,
}

impl CaptureRequest {
    pub fn from_config(config: &Config) -> Self {
        let capture = &config.capture;
        Self {
            mode: capture.mode,
            custom_width: capture.custom_width,
            custom_height: capture.custom_height,
            adjust_field_of_view: capture.change_field_of_view,
            target_field_of_view: capture.field_of_view,
            greyscale: capture.greyscale_mode,
            stall_timeout_secs: capture.stall_timeout_secs,
            save_config: FileSaveConfig::for_storage_root(&config.storage_root()),
        }
    }

    /// How long after the trigger an unfinished capture is abandoned.
    ///
    /// `None` when the configured value is too large to represent (including
    /// infinity). Negative and NaN values fall back to the default.
    pub fn stall_timeout(&self) -> Option<Duration> {
        let secs = self.stall_timeout_secs;
        match Duration::try_from_secs_f64(secs) {
            Ok(timeout) => Some(timeout),
            Err(_) if secs > 0.0 => None,
            Err(_) => {
                log::warn!(
                    "Invalid stall timeout {secs}, using {DEFAULT_STALL_TIMEOUT_SECS:.1}s"
                );
                Some(Duration::from_secs_f64(DEFAULT_STALL_TIMEOUT_SECS))
            }
        }
    }
}

/// Region of the rendered frame to read back, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Result of a trigger attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    /// A capture is already in flight; the trigger was ignored.
    Busy,
}

/// Where an in-flight capture is currently suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    /// Waiting for the camera to settle on the capture field of view.
    AwaitingFieldOfView,
    /// Waiting for the next update tick.
    AwaitingNextFrame,
    /// Waiting for the current frame to finish rendering.
    AwaitingEndOfFrame,
}

/// Status of the capture orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    Idle,
    InProgress(CapturePhase),
}

/// Outcome of a finished capture.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Saved(PathBuf),
    Failed(String),
}

/// Errors that can occur during screenshot capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Invalid capture region {width}x{height} for a {screen_width}x{screen_height} screen")]
    InvalidRegion {
        width: i32,
        height: i32,
        screen_width: i32,
        screen_height: i32,
    },

    #[error("Pixel readback failed: {0}")]
    Readback(String),

    #[error("Image encoding error: {0}")]
    EncodeError(String),

    #[error("Failed to save screenshot: {0}")]
    SaveError(#[from] std::io::Error),

    #[error("Capture stalled for {0:.1?} before readback")]
    Stalled(Duration),
}
