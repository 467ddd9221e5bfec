//! Image loading trait and shared types.
//!
//! The [`ImageLoader`] trait is the single capability the rest of the crate
//! uses to turn an [`ImageSource`] into decoded pixels. Sources come in two
//! origins: a filesystem path, or an in-memory blob with its original file
//! name (stdin, drag-and-drop style intake).
//!
//! The production implementation is
//! [`RustLoader`](super::rust_backend::RustLoader) — pure Rust decoders from
//! the `image` crate, statically linked.

use image::DynamicImage;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Image not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {name}: {message}")]
    Decode { name: String, message: String },
    #[error("Decoded {0} has zero width or height")]
    EmptySource(String),
    #[error("Failed to encode bordered image: {0}")]
    Encode(String),
    #[error("Bordered canvas {width}x{height} exceeds the {limit}-byte allocation limit")]
    CanvasTooLarge { width: u32, height: u32, limit: u64 },
}

/// Coarse failure category, as reported to users and in batch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    Load,
    Decode,
    Encode,
}

impl BackendError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) | Self::Io(_) => FailureKind::Load,
            Self::Decode { .. } | Self::EmptySource(_) => FailureKind::Decode,
            Self::Encode(_) | Self::CanvasTooLarge { .. } => FailureKind::Encode,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Load => "load error",
            Self::Decode => "decode error",
            Self::Encode => "encode error",
        };
        f.write_str(label)
    }
}

/// Where an image comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on disk, read lazily by the loader.
    Path(PathBuf),
    /// Bytes already in memory, with the file name they arrived under.
    Blob { name: String, bytes: Vec<u8> },
}

impl ImageSource {
    pub fn blob(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Blob {
            name: name.into(),
            bytes,
        }
    }

    /// Short name for progress lines: the file name of a path, or the blob name.
    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Blob { name, .. } => name.clone(),
        }
    }

    /// Name used to derive output filenames: the full path or the blob name.
    pub fn original_name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Blob { name, .. } => name.clone(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Blob { .. } => None,
        }
    }
}

// Blobs can be megabytes; show their size instead of their bytes.
impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Blob { name, bytes } => f
                .debug_struct("Blob")
                .field("name", name)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

/// Decoded pixel data. Never mutated once decoded.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    image: DynamicImage,
}

impl ImageHandle {
    /// Wrap a decoded image, rejecting zero-sized results.
    pub fn new(image: DynamicImage, name: &str) -> Result<Self, BackendError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(BackendError::EmptySource(name.to_string()));
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Capability to decode an [`ImageSource`].
///
/// Implementations must report a missing file as [`BackendError::NotFound`],
/// distinct from [`BackendError::Decode`] for bytes that are not an image.
pub trait ImageLoader: Sync {
    fn load(&self, source: &ImageSource) -> Result<ImageHandle, BackendError>;
}
