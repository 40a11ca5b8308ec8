//! Cairo-rendered stand-in for a game engine.
//!
//! Draws a small star field with a planet whose apparent size follows the
//! camera's field of view, plus a magenta HUD that is only visible in
//! [`RenderMode::Normal`]. Every host service the screenshot tool needs is
//! implemented on [`SoftwareHost`].

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::time::Duration;

use cairo::{Context, Format, ImageSurface};
use log::debug;

use crate::capture::encode::unpack_rgb24;
use crate::capture::{
    AudioService, CameraService, CaptureError, CaptureRect, FrameSource, PixelBuffer,
    RenderMode, RenderModeService, Rgb,
};
use crate::tool::{Scene, SceneService};

/// HUD color; never appears in the world or the map.
pub const HUD_COLOR: [u8; 3] = [255, 0, 255];

const SKY: (f64, f64, f64) = (0.02, 0.03, 0.10);
const PLANET: (f64, f64, f64) = (0.25, 0.55, 0.35);
const STAR: (f64, f64, f64) = (0.90, 0.90, 0.80);
const MAP: (f64, f64, f64) = (0.35, 0.25, 0.15);
const STAR_COUNT: u32 = 48;

#[derive(Debug, Clone, Copy)]
struct Camera {
    initial: f32,
    current: f32,
    from: f32,
    target: f32,
    elapsed: f32,
    duration: f32,
}

impl Camera {
    fn new(field_of_view: f32) -> Self {
        Self {
            initial: field_of_view,
            current: field_of_view,
            from: field_of_view,
            target: field_of_view,
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    fn snap_to(&mut self, target: f32, duration: f32) {
        self.from = self.current;
        self.target = target;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        if self.duration == 0.0 {
            self.current = target;
        }
    }

    fn advance(&mut self, dt: f32) {
        if self.elapsed >= self.duration {
            self.current = self.target;
            return;
        }
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = self.elapsed / self.duration;
        self.current = self.from + (self.target - self.from) * t;
    }

    /// Apparent size relative to the initial field of view.
    fn zoom(&self) -> f64 {
        let half = |fov: f32| (f64::from(fov).to_radians() / 2.0).tan();
        half(self.initial) / half(self.current)
    }
}

/// Software implementation of every host service.
pub struct SoftwareHost {
    width: i32,
    height: i32,
    mode: Cell<RenderMode>,
    scene: Cell<Scene>,
    camera: RefCell<Camera>,
    frame: RefCell<Option<ImageSurface>>,
    cues: Cell<u32>,
}

impl SoftwareHost {
    pub fn new(width: i32, height: i32, field_of_view: f32) -> Self {
        Self {
            width,
            height,
            mode: Cell::new(RenderMode::Normal),
            scene: Cell::new(Scene::SolarSystem),
            camera: RefCell::new(Camera::new(field_of_view)),
            frame: RefCell::new(None),
            cues: Cell::new(0),
        }
    }

    pub fn set_scene(&self, scene: Scene) {
        debug!("Scene -> {:?}", scene);
        self.scene.set(scene);
    }

    pub fn render_mode(&self) -> RenderMode {
        self.mode.get()
    }

    pub fn field_of_view(&self) -> f32 {
        self.camera.borrow().current
    }

    /// Number of capture cues played so far.
    pub fn cue_count(&self) -> u32 {
        self.cues.get()
    }

    /// Moves camera transitions forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.camera.borrow_mut().advance(dt.as_secs_f32());
    }

    /// Renders one frame and keeps it as the readback source.
    pub fn render_frame(&self) -> Result<(), cairo::Error> {
        let surface = ImageSurface::create(Format::Rgb24, self.width, self.height)?;
        {
            let ctx = Context::new(&surface)?;
            let (w, h) = (f64::from(self.width), f64::from(self.height));

            match self.mode.get() {
                RenderMode::Menu => fill(&ctx, MAP)?,
                RenderMode::Normal => {
                    self.draw_world(&ctx, w, h)?;
                    draw_hud(&ctx, w, h)?;
                }
                RenderMode::Hidden => self.draw_world(&ctx, w, h)?,
            }
        }
        surface.flush();
        *self.frame.borrow_mut() = Some(surface);
        Ok(())
    }

    fn draw_world(&self, ctx: &Context, w: f64, h: f64) -> Result<(), cairo::Error> {
        fill(ctx, SKY)?;

        ctx.set_source_rgb(STAR.0, STAR.1, STAR.2);
        let mut seed: u32 = 0x9E37_79B9;
        for _ in 0..STAR_COUNT {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let x = f64::from(seed >> 16) / 65_536.0 * w;
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let y = f64::from(seed >> 16) / 65_536.0 * h;
            ctx.rectangle(x.floor(), y.floor(), 1.0, 1.0);
        }
        ctx.fill()?;

        let radius = w.min(h) * 0.2 * self.camera.borrow().zoom();
        ctx.set_source_rgb(PLANET.0, PLANET.1, PLANET.2);
        ctx.arc(w / 2.0, h / 2.0, radius, 0.0, TAU);
        ctx.fill()
    }
}

fn fill(ctx: &Context, (r, g, b): (f64, f64, f64)) -> Result<(), cairo::Error> {
    ctx.set_source_rgb(r, g, b);
    ctx.paint()
}

/// Center reticle plus a status bar along the bottom edge.
fn draw_hud(ctx: &Context, w: f64, h: f64) -> Result<(), cairo::Error> {
    let [r, g, b] = HUD_COLOR.map(|c| f64::from(c) / 255.0);
    ctx.set_source_rgb(r, g, b);

    let (cx, cy) = ((w / 2.0).floor(), (h / 2.0).floor());
    let arm = (w.min(h) / 16.0).max(2.0).floor();
    ctx.rectangle(cx - arm, cy - 1.0, arm * 2.0, 2.0);
    ctx.rectangle(cx - 1.0, cy - arm, 2.0, arm * 2.0);

    let bar = (h / 12.0).max(1.0).floor();
    ctx.rectangle(0.0, h - bar, w, bar);
    ctx.fill()
}

impl RenderModeService for SoftwareHost {
    fn current_mode(&self) -> RenderMode {
        self.mode.get()
    }

    fn set_mode(&self, mode: RenderMode) {
        debug!("Render mode -> {:?}", mode);
        self.mode.set(mode);
    }
}

impl CameraService for SoftwareHost {
    fn snap_to_field_of_view(&self, field_of_view: f32, duration_secs: f32) {
        self.camera.borrow_mut().snap_to(field_of_view, duration_secs);
    }

    fn snap_to_initial_field_of_view(&self, duration_secs: f32) {
        let mut camera = self.camera.borrow_mut();
        let initial = camera.initial;
        camera.snap_to(initial, duration_secs);
    }
}

impl AudioService for SoftwareHost {
    fn play_capture_cue(&self) {
        self.cues.set(self.cues.get() + 1);
        debug!("Capture cue played");
    }
}

impl SceneService for SoftwareHost {
    fn current_scene(&self) -> Scene {
        self.scene.get()
    }
}

impl FrameSource for SoftwareHost {
    fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn read_pixels(&self, rect: CaptureRect) -> Result<PixelBuffer, CaptureError> {
        let inside = rect.x >= 0
            && rect.y >= 0
            && rect.width > 0
            && rect.height > 0
            && rect.x + rect.width <= self.width
            && rect.y + rect.height <= self.height;
        if !inside {
            return Err(CaptureError::Readback(format!(
                "{:?} outside {}x{} frame",
                rect, self.width, self.height
            )));
        }

        let mut frame = self.frame.borrow_mut();
        let surface = frame
            .as_mut()
            .ok_or_else(|| CaptureError::Readback("no frame rendered yet".to_string()))?;
        let stride = surface.stride() as usize;
        let data = surface
            .data()
            .map_err(|e| CaptureError::Readback(format!("Surface data unavailable: {e}")))?;

        let (x0, width) = (rect.x as usize, rect.width as usize);
        let mut pixels = Vec::with_capacity(width * rect.height as usize);
        for y in rect.y as usize..(rect.y + rect.height) as usize {
            let line = &data[y * stride + x0 * 4..y * stride + (x0 + width) * 4];
            pixels.extend(
                line.chunks_exact(4)
                    .map(|p| Rgb::from_rgb8(unpack_rgb24([p[0], p[1], p[2], p[3]]))),
            );
        }

        PixelBuffer::new(rect.width as u32, rect.height as u32, pixels)
    }
}
