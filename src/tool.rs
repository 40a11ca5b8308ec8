//! Per-frame glue between the host, the settings and the capture orchestrator.

use std::rc::Rc;
use std::time::Duration;

use crate::capture::{
    CaptureDependencies, CaptureOrchestrator, CaptureOutcome, CaptureRequest, CaptureStatus,
    TriggerOutcome,
};
use crate::input::KeyTracker;
use crate::settings::{
    EditOutcome, QuickSettingsPanel, QuickSettingsView, SettingError, SettingsEditor,
};

/// Coarse game state reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    TitleScreen,
    SolarSystem,
    EyeOfTheUniverse,
    Credits,
}

impl Scene {
    pub const ALL: [Scene; 4] = [
        Scene::TitleScreen,
        Scene::SolarSystem,
        Scene::EyeOfTheUniverse,
        Scene::Credits,
    ];

    /// Scenes in which screenshots may be taken.
    pub fn is_play_scene(self) -> bool {
        matches!(self, Scene::SolarSystem | Scene::EyeOfTheUniverse)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "titlescreen" | "title" => Some(Scene::TitleScreen),
            "solarsystem" => Some(Scene::SolarSystem),
            "eyeoftheuniverse" | "eye" => Some(Scene::EyeOfTheUniverse),
            "credits" => Some(Scene::Credits),
            _ => None,
        }
    }
}

/// Host query for the current scene.
pub trait SceneService {
    fn current_scene(&self) -> Scene;
}

/// The screenshot tool as the host sees it.
///
/// Call [`update`](Self::update) once per update tick and
/// [`end_of_frame`](Self::end_of_frame) once the tick's frame has rendered.
pub struct ScreenshotTool {
    settings: SettingsEditor,
    panel: QuickSettingsPanel,
    orchestrator: CaptureOrchestrator,
    scene: Rc<dyn SceneService>,
}

impl ScreenshotTool {
    pub fn new(
        settings: SettingsEditor,
        dependencies: CaptureDependencies,
        scene: Rc<dyn SceneService>,
    ) -> Self {
        Self {
            settings,
            panel: QuickSettingsPanel::new(),
            orchestrator: CaptureOrchestrator::new(dependencies),
            scene,
        }
    }

    pub fn settings(&self) -> &SettingsEditor {
        &self.settings
    }

    pub fn status(&self) -> CaptureStatus {
        self.orchestrator.status()
    }

    pub fn is_busy(&self) -> bool {
        self.orchestrator.is_busy()
    }

    /// Advances any in-flight capture, then starts a new one if the trigger
    /// key went down this tick.
    ///
    /// Returns `None` when nothing was triggered. Presses while busy or
    /// outside a play scene are dropped without logging.
    pub fn update(&mut self, now: Duration, keys: &KeyTracker) -> Option<TriggerOutcome> {
        self.orchestrator.update(now);

        if self.orchestrator.is_busy() || !self.scene.current_scene().is_play_scene() {
            return None;
        }
        if !keys.was_pressed_this_frame(&self.settings.config().screenshot_binding()) {
            return None;
        }

        let request = CaptureRequest::from_config(self.settings.config());
        Some(self.orchestrator.trigger(request, now))
    }

    /// Finishes a capture waiting on this frame. Returns its outcome, if any.
    pub fn end_of_frame(&mut self) -> Option<CaptureOutcome> {
        self.orchestrator.end_of_frame();
        self.orchestrator.take_outcome()
    }

    /// Applies a settings edit made at host time `now`.
    pub fn edit_setting(
        &mut self,
        name: &str,
        raw: &str,
        now: Duration,
    ) -> Result<EditOutcome, SettingError> {
        let outcome = self.settings.apply(name, raw)?;
        self.panel.on_edit(&outcome, now);
        Ok(outcome)
    }

    /// Quick settings overlay for the frame at `now`. Hidden while capturing
    /// and outside play scenes.
    pub fn quick_settings(&self, now: Duration) -> QuickSettingsView {
        if self.orchestrator.is_busy() || !self.scene.current_scene().is_play_scene() {
            return QuickSettingsView::Hidden;
        }
        self.panel.view(&self.settings, now)
    }
}
