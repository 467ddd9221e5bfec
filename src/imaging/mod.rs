//! Image processing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, GIF, BMP, WebP) |
//! | **Composite** | `RgbaImage::from_pixel` + `imageops::overlay` |
//! | **Encode** | `image` PNG encoder (lossless) |
//! | **Preview** | `imageops::resize` (Triangle) |
//!
//! The module is split into:
//! - **Geometry**: Pure functions for canvas and preview math (unit testable)
//! - **Parameters**: Border value types ([`Rgb`], [`BorderSpec`])
//! - **Backend**: [`ImageLoader`] trait + [`RustLoader`]
//! - **Compositor**: [`render`] combining geometry with pixel work

pub mod backend;
pub mod compositor;
mod geometry;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, FailureKind, ImageHandle, ImageLoader, ImageSource};
pub use compositor::{BorderedResult, render};
pub use geometry::{CanvasGeometry, compute_canvas, fit_display};
pub use params::{BorderSpec, ParamError, Rgb, TARGET_RATIO};
pub use rust_backend::{RustLoader, has_image_extension, supported_input_extensions};
