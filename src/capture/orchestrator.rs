//! Capture sequencing across host frames.
//!
//! A capture cannot complete inside the tick that triggers it: the UI has to
//! disappear from a rendered frame first, and an optional camera transition
//! has to settle. The orchestrator is therefore a small state machine that
//! the host advances from two callbacks:
//!
//! - [`CaptureOrchestrator::update`] once per update tick, before rendering
//! - [`CaptureOrchestrator::end_of_frame`] once rendering of that tick has finished
//!
//! Readback, greyscale conversion, encoding and saving all happen inside the
//! `end_of_frame` call that follows the frame rendered with the UI hidden.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, error, info, warn};

use super::dependencies::CaptureDependencies;
use super::guard::{FIELD_OF_VIEW_TRANSITION_SECS, RenderStateGuard};
use super::region::resolve_capture_rect;
use super::transform::transform;
use super::types::{
    CaptureError, CaptureOutcome, CapturePhase, CaptureRequest, CaptureStatus, TriggerOutcome,
};

struct InFlight {
    request: CaptureRequest,
    guard: RenderStateGuard,
    phase: Phase,
    started_at: Duration,
    stall_after: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    AwaitingFieldOfView { until: Duration },
    AwaitingNextFrame,
    AwaitingEndOfFrame,
}

impl Phase {
    fn public(self) -> CapturePhase {
        match self {
            Phase::AwaitingFieldOfView { .. } => CapturePhase::AwaitingFieldOfView,
            Phase::AwaitingNextFrame => CapturePhase::AwaitingNextFrame,
            Phase::AwaitingEndOfFrame => CapturePhase::AwaitingEndOfFrame,
        }
    }
}

/// Runs at most one capture at a time across host frames.
pub struct CaptureOrchestrator {
    dependencies: CaptureDependencies,
    in_flight: Option<InFlight>,
    last_outcome: Option<CaptureOutcome>,
}

impl CaptureOrchestrator {
    pub fn new(dependencies: CaptureDependencies) -> Self {
        Self {
            dependencies,
            in_flight: None,
            last_outcome: None,
        }
    }

    /// `true` while a capture is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn status(&self) -> CaptureStatus {
        match &self.in_flight {
            Some(in_flight) => CaptureStatus::InProgress(in_flight.phase.public()),
            None => CaptureStatus::Idle,
        }
    }

    /// Outcome of the most recent finished capture.
    pub fn last_outcome(&self) -> Option<&CaptureOutcome> {
        self.last_outcome.as_ref()
    }

    /// Returns the last outcome and clears it.
    pub fn take_outcome(&mut self) -> Option<CaptureOutcome> {
        self.last_outcome.take()
    }

    /// Starts a capture for `request` at host time `now`.
    ///
    /// Ignored while another capture is in flight. Hides the UI immediately
    /// and, if requested, starts the camera transition.
    pub fn trigger(&mut self, request: CaptureRequest, now: Duration) -> TriggerOutcome {
        if self.is_busy() {
            debug!("Capture already in progress, ignoring trigger");
            return TriggerOutcome::Busy;
        }

        info!(
            "Starting capture: {:?}, greyscale {}",
            request.mode, request.greyscale
        );

        let mut guard = RenderStateGuard::hide_ui(
            self.dependencies.render.clone(),
            self.dependencies.camera.clone(),
        );

        let phase = if request.adjust_field_of_view {
            guard.override_field_of_view(request.target_field_of_view);
            Phase::AwaitingFieldOfView {
                until: now + Duration::from_secs_f32(FIELD_OF_VIEW_TRANSITION_SECS),
            }
        } else {
            Phase::AwaitingNextFrame
        };

        let stall_after = request.stall_timeout();
        self.in_flight = Some(InFlight {
            request,
            guard,
            phase,
            started_at: now,
            stall_after,
        });
        TriggerOutcome::Started
    }

    /// Advances the capture on an update tick at host time `now`.
    ///
    /// Each call moves at most one step forward, so the frame rendered after
    /// the camera settles is never the one read back.
    pub fn update(&mut self, now: Duration) {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return;
        };

        if let Some(timeout) = in_flight.stall_after {
            if now.saturating_sub(in_flight.started_at) >= timeout {
                warn!("Capture stalled in {:?}, aborting", in_flight.phase);
                self.abort(CaptureError::Stalled(timeout));
                return;
            }
        }

        in_flight.phase = match in_flight.phase {
            Phase::AwaitingFieldOfView { until } if now >= until => Phase::AwaitingNextFrame,
            Phase::AwaitingNextFrame => Phase::AwaitingEndOfFrame,
            other => other,
        };
    }

    /// Completes the capture if the frame that just finished rendering is the
    /// one it was waiting for.
    pub fn end_of_frame(&mut self) {
        let ready = matches!(
            self.in_flight.as_ref().map(|f| f.phase),
            Some(Phase::AwaitingEndOfFrame)
        );
        if !ready {
            return;
        }
        let Some(InFlight { request, guard, .. }) = self.in_flight.take() else {
            return;
        };

        let outcome = match self.capture_and_save(&request) {
            Ok(path) => {
                info!("Saved screenshot to {}", path.display());
                self.dependencies.audio.play_capture_cue();
                CaptureOutcome::Saved(path)
            }
            Err(err) => {
                error!("Screenshot failed: {}", err);
                CaptureOutcome::Failed(err.to_string())
            }
        };

        guard.restore();
        self.last_outcome = Some(outcome);
    }

    fn abort(&mut self, err: CaptureError) {
        if let Some(InFlight { guard, .. }) = self.in_flight.take() {
            error!("Screenshot failed: {}", err);
            guard.restore();
            self.last_outcome = Some(CaptureOutcome::Failed(err.to_string()));
        }
    }

    fn capture_and_save(&self, request: &CaptureRequest) -> Result<PathBuf, CaptureError> {
        let (screen_width, screen_height) = self.dependencies.frames.screen_size();
        let rect = resolve_capture_rect(request, screen_width, screen_height)?;
        debug!("Reading back {:?} from {}x{}", rect, screen_width, screen_height);

        let mut buffer = self.dependencies.frames.read_pixels(rect)?;
        transform(&mut buffer, request.greyscale);

        let png = self.dependencies.encoder.encode_png(&buffer)?;
        self.dependencies.saver.save(&png, &request.save_config)
    }
}
