use std::{path::PathBuf, rc::Rc};

use crate::capture::{
    encode,
    file::{self, FileSaveConfig},
    transform::PixelBuffer,
    types::{CaptureError, CaptureRect, RenderMode},
};

/// Host render-mode switch (UI overlay visibility).
pub trait RenderModeService {
    fn current_mode(&self) -> RenderMode;
    fn set_mode(&self, mode: RenderMode);
}

/// Host camera controller. Transitions run asynchronously on the host side.
pub trait CameraService {
    fn snap_to_field_of_view(&self, field_of_view: f32, duration_secs: f32);
    fn snap_to_initial_field_of_view(&self, duration_secs: f32);
}

/// Host audio feedback.
pub trait AudioService {
    fn play_capture_cue(&self);
}

/// Read access to the most recently completed frame.
pub trait FrameSource {
    /// Current screen size in pixels.
    fn screen_size(&self) -> (i32, i32);
    /// Reads `rect` from the rendered frame as 8-bit RGB.
    fn read_pixels(&self, rect: CaptureRect) -> Result<PixelBuffer, CaptureError>;
}

/// Abstraction over image encoding for captured frames.
pub trait ImageEncoder {
    fn encode_png(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, CaptureError>;
}

/// Abstraction over file saving for captured screenshots.
pub trait CaptureFileSaver {
    fn save(&self, image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, CaptureError>;
}

/// Bundle of services used by the capture orchestrator. Each component can be mocked in tests.
///
/// Everything runs on the host's update loop, so the handles are `Rc`.
#[derive(Clone)]
pub struct CaptureDependencies {
    pub render: Rc<dyn RenderModeService>,
    pub camera: Rc<dyn CameraService>,
    pub audio: Rc<dyn AudioService>,
    pub frames: Rc<dyn FrameSource>,
    pub encoder: Rc<dyn ImageEncoder>,
    pub saver: Rc<dyn CaptureFileSaver>,
}

impl CaptureDependencies {
    /// Host services plus the default PNG encoder and file saver.
    pub fn new(
        render: Rc<dyn RenderModeService>,
        camera: Rc<dyn CameraService>,
        audio: Rc<dyn AudioService>,
        frames: Rc<dyn FrameSource>,
    ) -> Self {
        Self {
            render,
            camera,
            audio,
            frames,
            encoder: Rc::new(CairoPngEncoder),
            saver: Rc::new(DefaultFileSaver),
        }
    }

    /// Creates dependencies where one host object provides every host service.
    pub fn from_host<H>(host: Rc<H>) -> Self
    where
        H: RenderModeService + CameraService + AudioService + FrameSource + 'static,
    {
        Self::new(host.clone(), host.clone(), host.clone(), host)
    }
}

struct CairoPngEncoder;
struct DefaultFileSaver;

impl ImageEncoder for CairoPngEncoder {
    fn encode_png(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, CaptureError> {
        encode::encode_png(buffer)
    }
}

impl CaptureFileSaver for DefaultFileSaver {
    fn save(&self, image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, CaptureError> {
        file::save_screenshot(image_data, config)
    }
}
