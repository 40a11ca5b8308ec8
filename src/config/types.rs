//! Configuration type definitions.

use super::enums::{CaptureMode, GreyscaleMode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Seconds a capture may take from trigger to readback before it is abandoned.
pub const DEFAULT_STALL_TIMEOUT_SECS: f64 = 5.0;

/// Screenshot settings.
///
/// A snapshot of this section is taken every time a capture is triggered, so
/// edits made while a capture is in flight only affect the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptureConfig {
    /// Key that triggers a screenshot, e.g. "K" or "Ctrl+F12"
    #[serde(default = "default_screenshot_key")]
    pub screenshot_key: String,

    /// Region to capture (full, ship-log, slide-reel, custom)
    #[serde(default = "default_capture_mode")]
    pub mode: CaptureMode,

    /// Width in pixels when `mode = "custom"` (valid range: 1 - 16384)
    #[serde(default = "default_custom_size")]
    pub custom_width: i32,

    /// Height in pixels when `mode = "custom"` (valid range: 1 - 16384)
    #[serde(default = "default_custom_size")]
    pub custom_height: i32,

    /// Narrow or widen the camera before capturing, then restore it
    #[serde(default = "default_change_field_of_view")]
    pub change_field_of_view: bool,

    /// Field of view in degrees used while capturing (valid range: 1.0 - 179.0)
    #[serde(default = "default_field_of_view")]
    pub field_of_view: f32,

    /// Greyscale policy (none, luminance, average, maximum)
    #[serde(default = "default_greyscale_mode")]
    pub greyscale_mode: GreyscaleMode,

    /// Abort a capture that has not reached readback after this many seconds
    /// (valid range: 1.0 - 60.0)
    #[serde(default = "default_stall_timeout")]
    pub stall_timeout_secs: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            screenshot_key: default_screenshot_key(),
            mode: default_capture_mode(),
            custom_width: default_custom_size(),
            custom_height: default_custom_size(),
            change_field_of_view: default_change_field_of_view(),
            field_of_view: default_field_of_view(),
            greyscale_mode: default_greyscale_mode(),
            stall_timeout_secs: default_stall_timeout(),
        }
    }
}

/// In-game UI preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UiConfig {
    /// Show the quick settings panel while playing
    #[serde(default = "default_show_quick_settings")]
    pub show_quick_settings: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_quick_settings: default_show_quick_settings(),
        }
    }
}

/// Where screenshots are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    /// Storage root; screenshots land in `<root>/Screenshots`. Supports `~/`.
    #[serde(default = "default_storage_root")]
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_screenshot_key() -> String {
    "K".to_string()
}

fn default_capture_mode() -> CaptureMode {
    CaptureMode::ShipLog
}

fn default_custom_size() -> i32 {
    512
}

fn default_change_field_of_view() -> bool {
    true
}

fn default_field_of_view() -> f32 {
    120.0
}

fn default_greyscale_mode() -> GreyscaleMode {
    GreyscaleMode::Maximum
}

fn default_stall_timeout() -> f64 {
    DEFAULT_STALL_TIMEOUT_SECS
}

fn default_show_quick_settings() -> bool {
    true
}

fn default_storage_root() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("framesnap").to_string_lossy().into_owned())
        .unwrap_or_else(|| "~/.local/share/framesnap".to_string())
}
