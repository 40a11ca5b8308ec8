//! Fixed-rate frame loop around [`SoftwareHost`].
//!
//! SIGUSR1 presses the screenshot key on the next tick; SIGINT and SIGTERM
//! stop the loop.

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGUSR1};
use signal_hook::iterator::Signals;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use super::software::SoftwareHost;
use crate::capture::{CaptureDependencies, CaptureOutcome};
use crate::config::KeyBinding;
use crate::input::KeyTracker;
use crate::settings::SettingsEditor;
use crate::tool::{Scene, ScreenshotTool};

/// Frame loop parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub width: i32,
    pub height: i32,
    pub fps: u32,
    pub scene: Scene,
    pub field_of_view: f32,
    /// Press the screenshot key on the first tick and stop once that capture finishes.
    pub capture_on_start: bool,
    /// Stop after this much host time.
    pub duration: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 60,
            scene: Scene::SolarSystem,
            field_of_view: 90.0,
            capture_on_start: false,
            duration: None,
        }
    }
}

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub saved: Vec<PathBuf>,
    pub failed: Vec<String>,
}

pub struct Runner {
    options: RunOptions,
    should_quit: Arc<AtomicBool>,
    capture_requested: Arc<AtomicBool>,
}

impl Runner {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            should_quit: Arc::new(AtomicBool::new(false)),
            capture_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting this presses the screenshot key on the next tick.
    pub fn capture_flag(&self) -> Arc<AtomicBool> {
        self.capture_requested.clone()
    }

    pub fn quit_flag(&self) -> Arc<AtomicBool> {
        self.should_quit.clone()
    }

    /// Installs signal handlers, then runs the frame loop.
    pub fn run(&mut self, settings: SettingsEditor) -> Result<RunSummary> {
        info!("Starting framesnap host loop");
        info!("Send SIGUSR1 to take a screenshot (e.g., pkill -SIGUSR1 framesnap)");

        let mut signals = Signals::new([SIGUSR1, SIGTERM, SIGINT])
            .context("Failed to register signal handler")?;

        let capture_flag = self.capture_requested.clone();
        let quit_flag = self.should_quit.clone();

        // Lives until process exit; the iterator has no shutdown hook.
        thread::spawn(move || {
            for sig in signals.forever() {
                match sig {
                    SIGUSR1 => {
                        info!("Received SIGUSR1 - pressing screenshot key");
                        capture_flag.store(true, Ordering::Release);
                    }
                    SIGTERM | SIGINT => {
                        info!(
                            "Received {} - stopping",
                            if sig == SIGTERM { "SIGTERM" } else { "SIGINT" }
                        );
                        quit_flag.store(true, Ordering::Release);
                    }
                    _ => {
                        warn!("Received unexpected signal: {}", sig);
                    }
                }
            }
        });

        self.run_loop(settings)
    }

    /// Runs update, render and end-of-frame once per tick until asked to stop.
    pub fn run_loop(&mut self, settings: SettingsEditor) -> Result<RunSummary> {
        let options = &self.options;
        let host = Rc::new(SoftwareHost::new(
            options.width,
            options.height,
            options.field_of_view,
        ));
        host.set_scene(options.scene);

        let mut tool = ScreenshotTool::new(
            settings,
            CaptureDependencies::from_host(host.clone()),
            host.clone(),
        );
        let mut keys = KeyTracker::new();
        let frame_time = Duration::from_secs_f64(1.0 / f64::from(options.fps.max(1)));
        let mut now = Duration::ZERO;
        let mut summary = RunSummary::default();
        let mut press_on_start = options.capture_on_start;

        info!(
            "Host ready: {}x{} at {} fps in {:?}",
            options.width, options.height, options.fps, options.scene
        );

        loop {
            if self.should_quit.load(Ordering::Acquire) {
                info!("Quit requested - leaving host loop");
                break;
            }
            if let Some(limit) = options.duration
                && now >= limit
            {
                info!("Run duration of {:?} reached", limit);
                break;
            }

            keys.begin_frame();
            let start_press = std::mem::take(&mut press_on_start);
            let requested = self.capture_requested.swap(false, Ordering::Acquire) || start_press;
            let binding = requested.then(|| tool.settings().config().screenshot_binding());
            if let Some(binding) = &binding {
                debug!("Pressing {}", binding);
                hold_modifiers(&mut keys, binding, true);
                keys.tap(&binding.key);
            }

            host.advance(frame_time);
            let triggered = tool.update(now, &keys);

            if let Some(binding) = &binding {
                hold_modifiers(&mut keys, binding, false);
            }
            if start_press && triggered.is_none() {
                bail!(
                    "Screenshot key ignored: {:?} is not a play scene",
                    options.scene
                );
            }

            host.render_frame().context("Failed to render frame")?;

            if let Some(outcome) = tool.end_of_frame() {
                match outcome {
                    CaptureOutcome::Saved(path) => summary.saved.push(path),
                    CaptureOutcome::Failed(reason) => summary.failed.push(reason),
                }
                if options.capture_on_start {
                    info!("Capture finished - leaving host loop");
                    summary.frames += 1;
                    break;
                }
            }

            summary.frames += 1;
            now += frame_time;
            thread::sleep(frame_time);
        }

        Ok(summary)
    }
}

fn hold_modifiers(keys: &mut KeyTracker, binding: &KeyBinding, held: bool) {
    let modifiers = [
        (binding.ctrl, "Ctrl"),
        (binding.shift, "Shift"),
        (binding.alt, "Alt"),
    ];
    for (wanted, name) in modifiers {
        if !wanted {
            continue;
        }
        if held {
            keys.key_down(name);
        } else {
            keys.key_up(name);
        }
    }
}
