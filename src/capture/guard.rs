//! Scoped ownership of the host's render mode and field of view.

use std::rc::Rc;

use log::{debug, warn};

use super::dependencies::{CameraService, RenderModeService};
use super::types::RenderMode;

/// Duration of the camera transition into and out of the capture field of view.
pub const FIELD_OF_VIEW_TRANSITION_SECS: f32 = 0.5;

/// Hides the UI for the lifetime of a capture and puts everything back exactly once.
///
/// [`restore`](Self::restore) is the normal exit. Dropping an unrestored guard
/// (early return, abort, panic unwinding) performs the same restoration.
pub(crate) struct RenderStateGuard {
    render: Rc<dyn RenderModeService>,
    camera: Rc<dyn CameraService>,
    previous_mode: RenderMode,
    field_of_view_overridden: bool,
    restored: bool,
}

impl RenderStateGuard {
    /// Records the current render mode and switches the host to [`RenderMode::Hidden`].
    pub(crate) fn hide_ui(
        render: Rc<dyn RenderModeService>,
        camera: Rc<dyn CameraService>,
    ) -> Self {
        let previous_mode = render.current_mode();
        render.set_mode(RenderMode::Hidden);
        debug!("Render mode {:?} -> Hidden for capture", previous_mode);
        Self {
            render,
            camera,
            previous_mode,
            field_of_view_overridden: false,
            restored: false,
        }
    }

    /// Starts the camera transition to `field_of_view`; reverted on restore.
    pub(crate) fn override_field_of_view(&mut self, field_of_view: f32) {
        self.camera
            .snap_to_field_of_view(field_of_view, FIELD_OF_VIEW_TRANSITION_SECS);
        self.field_of_view_overridden = true;
    }

    #[cfg(test)]
    pub(crate) fn previous_mode(&self) -> RenderMode {
        self.previous_mode
    }

    /// Reverts the field of view (without waiting) and restores the render mode.
    pub(crate) fn restore(mut self) {
        self.restore_once();
    }

    fn restore_once(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        if self.field_of_view_overridden {
            self.camera
                .snap_to_initial_field_of_view(FIELD_OF_VIEW_TRANSITION_SECS);
        }
        self.render.set_mode(self.previous_mode);
        debug!("Render mode restored to {:?}", self.previous_mode);
    }
}

impl Drop for RenderStateGuard {
    fn drop(&mut self) {
        if !self.restored {
            warn!("Capture ended without restoring host state; restoring now");
            self.restore_once();
        }
    }
}
