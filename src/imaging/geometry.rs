//! Pure calculation functions for canvas and preview dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Arithmetic stays in `f64` throughout; rounding to whole pixels happens
//! only in [`CanvasGeometry::pixel_size`] and [`CanvasGeometry::pixel_offset`],
//! at surface-allocation time.

/// Canvas size and source placement produced by [`compute_canvas`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Width of the base rectangle (target ratio, before the border).
    pub base_width: f64,
    /// Height of the base rectangle (target ratio, before the border).
    pub base_height: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Left edge of the source, drawn at its native size.
    pub offset_x: f64,
    /// Top edge of the source, drawn at its native size.
    pub offset_y: f64,
}

impl CanvasGeometry {
    /// Canvas size in whole pixels, never smaller than 1x1.
    pub fn pixel_size(&self) -> (u32, u32) {
        (to_pixels(self.canvas_width), to_pixels(self.canvas_height))
    }

    /// Source placement in whole pixels, re-centred on the rounded canvas so
    /// rounding never shifts the image by more than half a pixel.
    pub fn pixel_offset(&self, source: (u32, u32)) -> (i64, i64) {
        let (canvas_w, canvas_h) = self.pixel_size();
        let x = (f64::from(canvas_w) - f64::from(source.0)) / 2.0;
        let y = (f64::from(canvas_h) - f64::from(source.1)) / 2.0;
        (x.round() as i64, y.round() as i64)
    }
}

fn to_pixels(value: f64) -> u32 {
    value.round().clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Compute the bordered canvas for a source image.
///
/// # Arguments
/// * `source` - Source dimensions (width, height), both non-zero
/// * `target_ratio` - Target aspect ratio as width / height (e.g. `0.8` for 4:5)
/// * `border_pct` - Border thickness as a percentage of the base rectangle
///
/// The base rectangle is the smallest `target_ratio` rectangle containing the
/// source: a source wider than the target keeps its width and grows in height,
/// anything else keeps its height and grows in width. Border thickness is
/// taken per axis from the base rectangle, so horizontal and vertical borders
/// are equal in percent, not in pixels.
///
/// The source is never scaled; it is centred at native size.
///
/// # Examples
/// ```
/// # use simple_border::imaging::compute_canvas;
/// // 800x1000 is already 4:5; 10% border on each side
/// let g = compute_canvas((800, 1000), 0.8, 10.0);
/// assert_eq!(g.pixel_size(), (960, 1200));
/// assert_eq!(g.pixel_offset((800, 1000)), (80, 100));
/// ```
pub fn compute_canvas(source: (u32, u32), target_ratio: f64, border_pct: f64) -> CanvasGeometry {
    let src_w = f64::from(source.0);
    let src_h = f64::from(source.1);

    let (base_width, base_height) = if src_w / src_h > target_ratio {
        // Too wide: keep width, grow height
        (src_w, src_w / target_ratio)
    } else {
        // Too tall or exact: keep height, grow width
        (src_h * target_ratio, src_h)
    };

    let border_x = base_width * border_pct / 100.0;
    let border_y = base_height * border_pct / 100.0;

    let canvas_width = base_width + border_x * 2.0;
    let canvas_height = base_height + border_y * 2.0;

    CanvasGeometry {
        base_width,
        base_height,
        canvas_width,
        canvas_height,
        offset_x: (canvas_width - src_w) / 2.0,
        offset_y: (canvas_height - src_h) / 2.0,
    }
}

/// Fit dimensions inside a preview box, scaling down only.
///
/// Width is clamped first, then the resulting height. For extreme aspect
/// ratios the second pass can leave the width slightly off the cap; that is
/// acceptable for previews.
///
/// # Arguments
/// * `size` - Original dimensions (width, height)
/// * `max` - Preview box (max width, max height)
///
/// # Returns
/// * `(width, height)` - Display dimensions, unrounded
pub fn fit_display(size: (u32, u32), max: (u32, u32)) -> (f64, f64) {
    let aspect = f64::from(size.0) / f64::from(size.1);
    let (max_w, max_h) = (f64::from(max.0), f64::from(max.1));

    let mut width = f64::from(size.0);
    let mut height = f64::from(size.1);

    if width > max_w {
        width = max_w;
        height = width / aspect;
    }

    if height > max_h {
        height = max_h;
        width = height * aspect;
    }

    (width, height)
}
