//! Frame capture for framesnap.
//!
//! This module provides:
//! - The capture orchestrator that hides the UI, optionally changes the field
//!   of view, waits for a clean frame and restores the host afterwards
//! - Centered capture region resolution
//! - Greyscale pixel transforms
//! - PNG encoding and timestamped file saving

pub mod dependencies;
pub mod encode;
pub mod file;
pub mod region;
pub mod transform;
pub mod types;

mod guard;
mod orchestrator;

pub use dependencies::{
    AudioService, CameraService, CaptureDependencies, CaptureFileSaver, FrameSource, ImageEncoder,
    RenderModeService,
};
pub use guard::FIELD_OF_VIEW_TRANSITION_SECS;
pub use orchestrator::CaptureOrchestrator;
pub use transform::{PixelBuffer, Rgb};
pub use types::{
    CaptureError, CaptureOutcome, CapturePhase, CaptureRect, CaptureRequest, CaptureStatus,
    RenderMode, TriggerOutcome,
};
