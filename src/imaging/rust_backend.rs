//! Pure Rust loader backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode from path (JPEG, PNG, GIF, BMP, WebP) | `image::ImageReader::open` + `with_guessed_format` |
//! | Decode from blob | `image::ImageReader::new(Cursor)` + `with_guessed_format` |
//!
//! Formats are sniffed from content, not trusted from the extension, so a
//! PNG saved as `.jpg` still loads.

use super::backend::{BackendError, ImageHandle, ImageLoader, ImageSource};
use image::{ImageFormat, ImageReader};
use std::io::{Cursor, ErrorKind};
use std::path::Path;
use std::sync::LazyLock;

const DECODER_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    DECODER_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the image file extensions that have working decoders compiled in.
///
/// This is the filter used by the pickers and the drop surface.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether a file name carries a supported image extension (case-insensitive).
pub fn has_image_extension(name: &Path) -> bool {
    name.extension().and_then(|e| e.to_str()).is_some_and(|ext| {
        supported_input_extensions()
            .iter()
            .any(|e| ext.eq_ignore_ascii_case(e))
    })
}

/// Pure Rust loader using the `image` crate's decoders.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustLoader;

impl RustLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(name: &str, err: impl std::fmt::Display) -> BackendError {
    BackendError::Decode {
        name: name.to_string(),
        message: err.to_string(),
    }
}

/// Load and decode an image from disk.
fn load_path(path: &Path) -> Result<ImageHandle, BackendError> {
    let name = path.display().to_string();
    let reader = ImageReader::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BackendError::NotFound(path.to_path_buf()),
        _ => BackendError::Io(e),
    })?;
    let image = reader
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| decode_error(&name, e))?;
    ImageHandle::new(image, &name)
}

/// Decode an image already held in memory.
fn load_blob(name: &str, bytes: &[u8]) -> Result<ImageHandle, BackendError> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| decode_error(name, e))?;
    ImageHandle::new(image, name)
}

impl ImageLoader for RustLoader {
    fn load(&self, source: &ImageSource) -> Result<ImageHandle, BackendError> {
        match source {
            ImageSource::Path(path) => load_path(path),
            ImageSource::Blob { name, bytes } => load_blob(name, bytes),
        }
    }
}
