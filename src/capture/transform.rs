//! Greyscale conversion of captured pixel buffers.
//!
//! Every policy maps a single pixel independently, so [`transform`] is a plain
//! loop over the buffer with no state carried between pixels.

use super::types::CaptureError;
use crate::config::GreyscaleMode;

/// BT.601 channel weights used by [`GreyscaleMode::Luminance`].
pub const LUMINANCE_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// RGB sample with normalized channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(value: f32) -> Self {
        Self::new(value, value, value)
    }

    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Quantizes back to 8 bits per channel, rounding to nearest.
    pub fn to_rgb8(self) -> [u8; 3] {
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    fn is_grey(self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Row-major RGB image without alpha.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    /// Wraps `pixels`, which must hold exactly `width * height` samples.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(CaptureError::Readback(format!(
                "expected {} pixels for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a buffer from packed 8-bit RGB triples.
    pub fn from_rgb8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, CaptureError> {
        if bytes.len() % 3 != 0 {
            return Err(CaptureError::Readback(format!(
                "RGB byte count {} is not a multiple of 3",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::from_rgb8([c[0], c[1], c[2]]))
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }
}

/// Maps one pixel through `mode`.
///
/// Pixels that are already grey come back unchanged for every policy, which
/// keeps repeated conversion exact instead of drifting by float rounding.
pub fn transform_pixel(color: Rgb, mode: GreyscaleMode) -> Rgb {
    if color.is_grey() {
        return color;
    }

    let value = match mode {
        GreyscaleMode::None => return color,
        GreyscaleMode::Luminance => {
            let [wr, wg, wb] = LUMINANCE_WEIGHTS;
            wr * color.r + wg * color.g + wb * color.b
        }
        GreyscaleMode::Average => (color.r + color.g + color.b) / 3.0,
        GreyscaleMode::Maximum => color.r.max(color.g).max(color.b),
    };

    Rgb::grey(value)
}

/// Applies `mode` to every pixel of `buffer` in place.
pub fn transform(buffer: &mut PixelBuffer, mode: GreyscaleMode) {
    if mode == GreyscaleMode::None {
        return;
    }
    for pixel in &mut buffer.pixels {
        *pixel = transform_pixel(*pixel, mode);
    }
}
