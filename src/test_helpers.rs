//! Shared test utilities for the simple-border test suite.
//!
//! Generates small real images, either as encoded bytes for blob sources or
//! as files on disk for path sources.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_test_image(&tmp.path().join("photo.jpg"), 16, 9);
//!
//! let blob = ImageSource::blob("drop.png", png_bytes(5, 3, [0, 0, 0, 255]));
//! ```

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

// =========================================================================
// Fixture images
// =========================================================================

/// Encode a solid `width`×`height` RGBA image as PNG bytes.
pub fn png_bytes(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(pixel));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Write a small gradient image to `path`, format taken from the extension.
///
/// RGB rather than RGBA so the JPEG encoder accepts it.
pub fn write_test_image(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    img.save(path)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}
