//! Output filename convention for bordered images.
//!
//! ```text
//! bordered_<base>_4x5_<pct>pct_<colour><ext>
//! ```
//!
//! - `<base>`: source file name without its extension
//! - `<pct>`: border percentage, printed without a trailing `.0` (`10`, `2.5`)
//! - `<colour>`: `white` for pure white, otherwise six hex digits (`ff0000`)
//! - `<ext>`: the source extension with its original case, `.png` if it has none
//!
//! Examples:
//! - `/a/b/photo.JPG`, 10%, white → `bordered_photo_4x5_10pct_white.JPG`
//! - `img`, 5%, `#ff0000` → `bordered_img_4x5_5pct_ff0000.png`

use crate::imaging::BorderSpec;
use std::path::Path;

const DEFAULT_EXTENSION: &str = "png";

/// Split a source name into `(base, extension)`, extension without the dot.
pub fn split_source_name(original: &str) -> (String, String) {
    let path = Path::new(original);
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    let base = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| original.to_string());
    (base, ext)
}

/// Build the output filename for `original` rendered with `border`.
///
/// `original` may be a full path or a bare file name; only its last
/// component is used.
pub fn bordered_file_name(original: &str, border: &BorderSpec) -> String {
    let (base, ext) = split_source_name(original);
    format!(
        "bordered_{}_4x5_{}pct_{}.{}",
        base,
        border.percentage(),
        border.color().color_token(),
        ext
    )
}
