//! Configuration module.
//!
//! Handles loading, validating, and merging `simple-border.toml`.
//! Configuration is layered: stock defaults are overridden by a config file,
//! which is in turn overridden by command-line flags.
//!
//! ## Config File Location
//!
//! Passed with `--config <file>`, or picked up from `simple-border.toml` in
//! the working directory when present.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [border]
//! percentage = 5            # Border thickness, percent of the 4:5 base (0-100)
//! color = "#ffffff"         # Border colour (#rrggbb or #rgb)
//!
//! [preview]
//! max_width = 400           # Preview box, in pixels
//! max_height = 300
//!
//! [batch]
//! item_delay_ms = 0         # Pause between bulk items (progress readability)
//!
//! [processing]
//! max_processes = 4         # Max parallel writers for bulk save (omit for auto)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [border]
//! color = "#000000"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{BorderSpec, Rgb};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "simple-border.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Border applied to every image.
    pub border: BorderConfig,
    /// Preview box for the single-image flow.
    pub preview: PreviewConfig,
    /// Bulk batch pacing.
    pub batch: BatchConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.border_spec()?;
        if self.preview.max_width == 0 || self.preview.max_height == 0 {
            return Err(ConfigError::Validation(
                "preview.max_width and preview.max_height must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// The configured border as a validated [`BorderSpec`].
    pub fn border_spec(&self) -> Result<BorderSpec, ConfigError> {
        let color: Rgb = self
            .border
            .color
            .parse()
            .map_err(|e| ConfigError::Validation(format!("border.color: {e}")))?;
        BorderSpec::new(self.border.percentage, color)
            .map_err(|e| ConfigError::Validation(format!("border.percentage: {e}")))
    }

    pub fn preview_box(&self) -> (u32, u32) {
        (self.preview.max_width, self.preview.max_height)
    }
}

/// Border settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderConfig {
    /// Border thickness as a percentage of the 4:5 base rectangle (0-100).
    pub percentage: f64,
    /// Border colour as `#rrggbb` or `#rgb`.
    pub color: String,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            percentage: 5.0,
            color: "#ffffff".to_string(),
        }
    }
}

/// Preview box settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_width: 400,
            max_height: 300,
        }
    }
}

/// Bulk batch settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Milliseconds to pause between items. 0 disables pacing.
    pub item_delay_ms: u64,
}

impl BatchConfig {
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel writers during bulk save.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that file and flag overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Command-line overrides, applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub percentage: Option<f64>,
    pub color: Option<String>,
}

impl Overrides {
    fn to_value(&self) -> toml::Value {
        let mut border = toml::map::Map::new();
        if let Some(pct) = self.percentage {
            border.insert("percentage".into(), toml::Value::Float(pct));
        }
        if let Some(color) = &self.color {
            border.insert("color".into(), toml::Value::String(color.clone()));
        }
        let mut root = toml::map::Map::new();
        if !border.is_empty() {
            root.insert("border".into(), toml::Value::Table(border));
        }
        toml::Value::Table(root)
    }
}

/// Load config: stock defaults → `path` (if it exists) → `overrides`.
pub fn load_config(path: &Path, overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let file = load_raw_config(path)?;
    resolve_config(base, file.into_iter().chain([overrides.to_value()]))
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Border Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Loaded from --config <file>, or ./simple-border.toml when present.
# Command-line flags (--border, --color) override this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Border
# ---------------------------------------------------------------------------
[border]
# Thickness as a percentage of the 4:5 base rectangle, per axis (0-100).
# Practical values are 1-50.
percentage = 5.0

# Border colour as #rrggbb or #rgb. Pure white is named "white" in output
# filenames; other colours use their hex digits.
color = "#ffffff"

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Box that previews are scaled down into (never up), in pixels.
max_width = 400
max_height = 300

# ---------------------------------------------------------------------------
# Bulk batches
# ---------------------------------------------------------------------------
[batch]
# Pause between items, in milliseconds. Only makes progress easier to follow.
item_delay_ms = 0

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel writers when saving a batch.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
