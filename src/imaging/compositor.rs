//! Border compositing.
//!
//! [`render`] turns a decoded [`ImageHandle`] into a [`BorderedResult`]:
//!
//! 1. [`compute_canvas`] with the fixed 4:5 [`TARGET_RATIO`]
//! 2. allocate an RGBA canvas filled with the border colour
//! 3. overlay the source at its native size, centred
//! 4. encode the canvas as PNG
//!
//! The encoded bytes are always PNG, whatever the source format. Output
//! filenames keep the source extension (see [`naming`](crate::naming)), so a
//! `.jpg` source is written as PNG data under a `.jpg` name. Viewers sniff the
//! content and open it fine; the mismatch is kept deliberately so output names
//! line up with their sources.
//!
//! The source is never resized into the base rectangle. For sources whose
//! ratio differs from 4:5 the visible margin is therefore uneven between the
//! two axes.
//!
//! A thin strip can decode within the decoder's limits and still need a huge
//! canvas (a 100000x1 source needs 110000x137500). Canvases over
//! [`max_canvas_bytes`] are refused with [`BackendError::CanvasTooLarge`]
//! before anything is allocated.

use super::backend::{BackendError, ImageHandle};
use super::geometry::{compute_canvas, fit_display};
use super::params::{BorderSpec, TARGET_RATIO};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Limits, RgbaImage};
use std::io::Cursor;

/// A rendered bordered image.
///
/// Carries the [`BorderSpec`] it was rendered with, so later changes to the
/// "current" border never affect an existing result.
#[derive(Debug, Clone)]
pub struct BorderedResult {
    pub width: u32,
    pub height: u32,
    pub surface: RgbaImage,
    /// Lossless PNG encoding of `surface`.
    pub encoded: Vec<u8>,
    pub border: BorderSpec,
}

/// Composite `handle` onto a 4:5 canvas with the given border.
pub fn render(handle: &ImageHandle, spec: &BorderSpec) -> Result<BorderedResult, BackendError> {
    let surface = compose(handle, spec)?;
    let encoded = encode_png(&surface)?;

    Ok(BorderedResult {
        width: surface.width(),
        height: surface.height(),
        surface,
        encoded,
        border: *spec,
    })
}

/// Largest RGBA canvas [`compose`] will allocate, in bytes.
///
/// Same cap the `image` crate applies to decoding by default.
pub fn max_canvas_bytes() -> u64 {
    Limits::default().max_alloc.unwrap_or(u64::MAX)
}

/// Allocate, fill and draw; no encoding.
pub fn compose(handle: &ImageHandle, spec: &BorderSpec) -> Result<RgbaImage, BackendError> {
    let source = handle.dimensions();
    let geometry = compute_canvas(source, TARGET_RATIO, spec.percentage());
    let (width, height) = geometry.pixel_size();
    let (x, y) = geometry.pixel_offset(source);

    let limit = max_canvas_bytes();
    if u64::from(width) * u64::from(height) * 4 > limit {
        return Err(BackendError::CanvasTooLarge {
            width,
            height,
            limit,
        });
    }

    let mut canvas = RgbaImage::from_pixel(width, height, spec.color().to_rgba());
    let pixels = handle.image().to_rgba8();
    imageops::overlay(&mut canvas, &pixels, x, y);
    Ok(canvas)
}

/// Encode a surface as PNG.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, BackendError> {
    let mut buf = Cursor::new(Vec::new());
    surface
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| BackendError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Downscale a surface to fit the preview box (never upscales).
pub fn preview(surface: &RgbaImage, max: (u32, u32)) -> RgbaImage {
    let (w, h) = fit_display(surface.dimensions(), max);
    let w = (w.round() as u32).max(1);
    let h = (h.round() as u32).max(1);
    if (w, h) == surface.dimensions() {
        return surface.clone();
    }
    imageops::resize(surface, w, h, FilterType::Triangle)
}

/// Decode encoded bytes back into an image (used to verify outputs).
pub fn decode_png(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| {
        BackendError::Decode {
            name: "bordered output".to_string(),
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{FailureKind, Rgb};
    use image::Rgba;

    fn solid_handle(w: u32, h: u32, px: [u8; 4]) -> ImageHandle {
        let img = RgbaImage::from_pixel(w, h, Rgba(px));
        ImageHandle::new(DynamicImage::ImageRgba8(img), "solid").unwrap()
    }

    #[test]
    fn render_produces_expected_size() {
        // 80x100 is exactly 4:5; 10% → 96x120
        let handle = solid_handle(80, 100, [0, 0, 0, 255]);
        let spec = BorderSpec::new(10.0, Rgb::WHITE).unwrap();
        let result = render(&handle, &spec).unwrap();
        assert_eq!((result.width, result.height), (96, 120));
        assert_eq!(result.surface.dimensions(), (96, 120));
    }

    #[test]
    fn border_is_filled_and_source_centred() {
        let handle = solid_handle(80, 100, [0, 0, 255, 255]);
        let spec = BorderSpec::new(10.0, Rgb::new(255, 0, 0)).unwrap();
        let result = render(&handle, &spec).unwrap();

        // Corners are border colour
        assert_eq!(result.surface.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(result.surface.get_pixel(95, 119), &Rgba([255, 0, 0, 255]));
        // Source occupies [8, 88) x [10, 110)
        assert_eq!(result.surface.get_pixel(8, 10), &Rgba([0, 0, 255, 255]));
        assert_eq!(result.surface.get_pixel(87, 109), &Rgba([0, 0, 255, 255]));
        assert_eq!(result.surface.get_pixel(7, 10), &Rgba([255, 0, 0, 255]));
        assert_eq!(result.surface.get_pixel(88, 109), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn wide_source_is_not_scaled() {
        // 200x50 → base 200x250, canvas 200x250 at 0%
        let handle = solid_handle(200, 50, [0, 255, 0, 255]);
        let spec = BorderSpec::new(0.0, Rgb::WHITE).unwrap();
        let result = render(&handle, &spec).unwrap();
        assert_eq!((result.width, result.height), (200, 250));
        // Source rows 100..150
        assert_eq!(result.surface.get_pixel(0, 99), &Rgba([255, 255, 255, 255]));
        assert_eq!(result.surface.get_pixel(0, 100), &Rgba([0, 255, 0, 255]));
        assert_eq!(result.surface.get_pixel(199, 149), &Rgba([0, 255, 0, 255]));
        assert_eq!(result.surface.get_pixel(0, 150), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn output_grows_with_border() {
        let handle = solid_handle(300, 200, [0, 0, 0, 255]);
        let small = render(&handle, &BorderSpec::new(2.0, Rgb::WHITE).unwrap()).unwrap();
        let large = render(&handle, &BorderSpec::new(20.0, Rgb::WHITE).unwrap()).unwrap();
        assert!(large.width > small.width);
        assert!(large.height > small.height);
    }

    #[test]
    fn encoded_bytes_decode_to_result_dimensions() {
        let handle = solid_handle(33, 17, [9, 9, 9, 255]);
        let result = render(&handle, &BorderSpec::default()).unwrap();
        let decoded = decode_png(&result.encoded).unwrap();
        assert_eq!(decoded.width(), result.width);
        assert_eq!(decoded.height(), result.height);
    }

    #[test]
    fn result_keeps_border_it_was_rendered_with() {
        let handle = solid_handle(10, 10, [0, 0, 0, 255]);
        let spec = BorderSpec::new(7.0, Rgb::BLACK).unwrap();
        let result = render(&handle, &spec).unwrap();
        assert_eq!(result.border, spec);
    }

    #[test]
    fn transparent_source_shows_border_through() {
        let handle = solid_handle(8, 10, [0, 0, 0, 0]);
        let spec = BorderSpec::new(0.0, Rgb::new(0, 128, 0)).unwrap();
        let result = render(&handle, &spec).unwrap();
        assert_eq!(result.surface.get_pixel(4, 5), &Rgba([0, 128, 0, 255]));
    }

    #[test]
    fn oversized_canvas_is_refused() {
        // 100000x1 → base 100000x125000, 10% → 120000x150000 RGBA, far over the cap
        let handle = solid_handle(100_000, 1, [0, 0, 0, 255]);
        let spec = BorderSpec::new(10.0, Rgb::WHITE).unwrap();
        let err = render(&handle, &spec).unwrap_err();
        assert!(matches!(
            err,
            BackendError::CanvasTooLarge {
                width: 120_000,
                height: 150_000,
                ..
            }
        ));
        assert_eq!(err.kind(), FailureKind::Encode);
    }

    #[test]
    fn canvas_cap_matches_decoder_default() {
        assert_eq!(max_canvas_bytes(), 512 * 1024 * 1024);
    }

    #[test]
    fn preview_fits_box() {
        let surface = RgbaImage::new(1000, 4000);
        let small = preview(&surface, (400, 300));
        assert_eq!(small.dimensions(), (75, 300));
    }

    #[test]
    fn preview_never_upscales() {
        let surface = RgbaImage::new(40, 50);
        assert_eq!(preview(&surface, (400, 300)).dimensions(), (40, 50));
    }
}
