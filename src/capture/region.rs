//! Capture rectangle resolution.

use super::types::{CaptureError, CaptureRect, CaptureRequest};
use crate::config::CaptureMode;

/// Resolves the centered rectangle to read back for `request` on a
/// `screen_width` × `screen_height` frame.
///
/// Regions with non-positive dimensions or larger than the screen are
/// rejected rather than handed to the readback.
pub fn resolve_capture_rect(
    request: &CaptureRequest,
    screen_width: i32,
    screen_height: i32,
) -> Result<CaptureRect, CaptureError> {
    let (width, height) = match request.mode {
        CaptureMode::Full => (screen_width, screen_height),
        CaptureMode::ShipLog | CaptureMode::SlideReel => {
            let edge = request.mode.fixed_size().unwrap_or(screen_height);
            (edge, edge)
        }
        CaptureMode::Custom => (request.custom_width, request.custom_height),
    };

    if width <= 0 || height <= 0 || width > screen_width || height > screen_height {
        return Err(CaptureError::InvalidRegion {
            width,
            height,
            screen_width,
            screen_height,
        });
    }

    Ok(CaptureRect {
        x: (screen_width - width) / 2,
        y: (screen_height - height) / 2,
        width,
        height,
    })
}
