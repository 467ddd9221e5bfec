//! Value types describing a border.
//!
//! These structs describe *what* border to draw, not *how*. They are the
//! interface between the callers that own the "current" border settings
//! (CLI flags, config files) and the [`compositor`](super::compositor), which
//! does the pixel work.
//!
//! ## Types
//!
//! - [`Rgb`] — An opaque 8-bit colour, parsed from and displayed as `#rrggbb`.
//! - [`BorderSpec`] — Border thickness (percent of the base rectangle) and colour.
//!   Validated on construction, immutable afterwards.
//! - [`TARGET_RATIO`] — The fixed 4:5 output aspect ratio (width / height).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output aspect ratio as width / height (4:5 portrait).
pub const TARGET_RATIO: f64 = 4.0 / 5.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("Invalid colour '{0}': expected #rrggbb or #rgb")]
    InvalidColor(String),
    #[error("Border percentage must be between 0 and 100, got {0}")]
    InvalidPercentage(f64),
}

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Token used in output filenames: `white` for pure white, otherwise the
    /// six lowercase hex digits without the leading `#`.
    pub fn color_token(self) -> String {
        if self == Self::WHITE {
            "white".to_string()
        } else {
            format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }

    /// The colour as an opaque RGBA pixel.
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParamError;

    /// Accepts `#rrggbb`, `rrggbb`, `#rgb` and `rgb`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParamError::InvalidColor(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());

        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc → #aabbcc
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Border thickness and colour applied to every image rendered while it is
/// current.
///
/// `percentage` is measured against the base rectangle, independently per
/// axis (see [`compute_canvas`](super::geometry::compute_canvas)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorderSpec {
    percentage: f64,
    color: Rgb,
}

impl BorderSpec {
    pub fn new(percentage: f64, color: Rgb) -> Result<Self, ParamError> {
        if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
            return Err(ParamError::InvalidPercentage(percentage));
        }
        Ok(Self { percentage, color })
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self {
            percentage: 5.0,
            color: Rgb::WHITE,
        }
    }
}
