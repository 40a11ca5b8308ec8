//! PNG encoding through cairo image surfaces.

use cairo::{Format, ImageSurface};

use super::transform::{PixelBuffer, Rgb};
use super::types::CaptureError;

/// Packs an 8-bit RGB triple into cairo's `Rgb24` pixel (`0x00RRGGBB`, native endian).
pub(crate) fn pack_rgb24([r, g, b]: [u8; 3]) -> [u8; 4] {
    u32::from_be_bytes([0, r, g, b]).to_ne_bytes()
}

/// Inverse of [`pack_rgb24`]; the unused high byte is ignored.
pub(crate) fn unpack_rgb24(pixel: [u8; 4]) -> [u8; 3] {
    let [_, r, g, b] = u32::from_ne_bytes(pixel).to_be_bytes();
    [r, g, b]
}

/// Encodes `buffer` as an opaque 8-bit RGB PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, CaptureError> {
    let width = i32::try_from(buffer.width())
        .map_err(|_| CaptureError::EncodeError(format!("width {} too large", buffer.width())))?;
    let height = i32::try_from(buffer.height())
        .map_err(|_| CaptureError::EncodeError(format!("height {} too large", buffer.height())))?;

    let mut surface = ImageSurface::create(Format::Rgb24, width, height).map_err(|e| {
        CaptureError::EncodeError(format!("Failed to create {width}x{height} surface: {e}"))
    })?;
    let stride = surface.stride() as usize;

    {
        let mut data = surface
            .data()
            .map_err(|e| CaptureError::EncodeError(format!("Surface data unavailable: {e}")))?;
        for (y, row) in buffer.rows().enumerate() {
            let line = &mut data[y * stride..y * stride + row.len() * 4];
            for (pixel, out) in row.iter().zip(line.chunks_exact_mut(4)) {
                out.copy_from_slice(&pack_rgb24(pixel.to_rgb8()));
            }
        }
    }

    let mut png = Vec::new();
    surface
        .write_to_png(&mut png)
        .map_err(|e| CaptureError::EncodeError(format!("PNG write failed: {e}")))?;

    log::debug!("Encoded {}x{} PNG ({} bytes)", width, height, png.len());
    Ok(png)
}

/// Decodes a PNG into an RGB buffer. Alpha, if present, is discarded.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, CaptureError> {
    let mut reader = bytes;
    let mut surface = ImageSurface::create_from_png(&mut reader)
        .map_err(|e| CaptureError::EncodeError(format!("PNG read failed: {e}")))?;

    let width = surface.width().max(0) as u32;
    let height = surface.height().max(0) as u32;
    let stride = surface.stride() as usize;
    let data = surface
        .data()
        .map_err(|e| CaptureError::EncodeError(format!("Surface data unavailable: {e}")))?;

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as usize {
        let line = &data[y * stride..y * stride + width as usize * 4];
        for chunk in line.chunks_exact(4) {
            pixels.push(Rgb::from_rgb8(unpack_rgb24([
                chunk[0], chunk[1], chunk[2], chunk[3],
            ])));
        }
    }

    PixelBuffer::new(width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb24_packing_is_reversible() {
        for rgb in [[0, 0, 0], [255, 128, 1], [12, 34, 56]] {
            assert_eq!(unpack_rgb24(pack_rgb24(rgb)), rgb);
        }
    }

    #[test]
    fn encoded_png_has_signature_and_decodes_to_same_pixels() {
        let buffer =
            PixelBuffer::from_rgb8(2, 2, &[255, 0, 0, 0, 255, 0, 0, 0, 255, 40, 40, 40]).unwrap();

        let png = encode_png(&buffer).unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

        let decoded = decode_png(&png).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 2);
        assert_eq!(decoded.get(0, 0).unwrap().to_rgb8(), [255, 0, 0]);
        assert_eq!(decoded.get(1, 0).unwrap().to_rgb8(), [0, 255, 0]);
        assert_eq!(decoded.get(0, 1).unwrap().to_rgb8(), [0, 0, 255]);
        assert_eq!(decoded.get(1, 1).unwrap().to_rgb8(), [40, 40, 40]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_png(b"definitely not a png"),
            Err(CaptureError::EncodeError(_))
        ));
    }
}
