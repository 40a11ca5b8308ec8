//! Configuration file support for framesnap.
//!
//! Settings are loaded from `~/.config/framesnap/config.toml`. Every section
//! falls back to defaults when missing, and out-of-range values are clamped
//! with a warning instead of failing the load.

pub mod enums;
pub mod keybindings;
pub mod types;

pub use enums::{CaptureMode, GreyscaleMode};
pub use keybindings::KeyBinding;
pub use types::{CaptureConfig, DEFAULT_STALL_TIMEOUT_SECS, StorageConfig, UiConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MAX_CUSTOM_DIMENSION: i32 = 16_384;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [capture]
/// screenshot_key = "K"
/// mode = "ship-log"
/// change_field_of_view = true
/// field_of_view = 120.0
/// greyscale_mode = "maximum"
///
/// [ui]
/// show_quick_settings = true
///
/// [storage]
/// root = "~/.local/share/framesnap"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Screenshot trigger, region, field of view, and color settings
    #[serde(default)]
    pub capture: CaptureConfig,

    /// In-game UI preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Output location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Validates and clamps configuration values to acceptable ranges.
    ///
    /// Validated ranges:
    /// - `custom_width`, `custom_height`: 1 - 16384
    /// - `field_of_view`: 1.0 - 179.0
    /// - `stall_timeout_secs`: 1.0 - 60.0
    /// - `screenshot_key`: must parse, falls back to "K"
    pub fn validate_and_clamp(&mut self) {
        let capture = &mut self.capture;

        if !(1..=MAX_CUSTOM_DIMENSION).contains(&capture.custom_width) {
            log::warn!(
                "Invalid custom_width {}, clamping to 1-{} range",
                capture.custom_width,
                MAX_CUSTOM_DIMENSION
            );
            capture.custom_width = capture.custom_width.clamp(1, MAX_CUSTOM_DIMENSION);
        }

        if !(1..=MAX_CUSTOM_DIMENSION).contains(&capture.custom_height) {
            log::warn!(
                "Invalid custom_height {}, clamping to 1-{} range",
                capture.custom_height,
                MAX_CUSTOM_DIMENSION
            );
            capture.custom_height = capture.custom_height.clamp(1, MAX_CUSTOM_DIMENSION);
        }

        if !(1.0..=179.0).contains(&capture.field_of_view) {
            log::warn!(
                "Invalid field_of_view {:.1}°, clamping to 1.0-179.0° range",
                capture.field_of_view
            );
            capture.field_of_view = if capture.field_of_view.is_nan() {
                120.0
            } else {
                capture.field_of_view.clamp(1.0, 179.0)
            };
        }

        if !(1.0..=60.0).contains(&capture.stall_timeout_secs) {
            log::warn!(
                "Invalid stall_timeout_secs {:.1}, clamping to 1.0-60.0 range",
                capture.stall_timeout_secs
            );
            capture.stall_timeout_secs = if capture.stall_timeout_secs.is_nan() {
                DEFAULT_STALL_TIMEOUT_SECS
            } else {
                capture.stall_timeout_secs.clamp(1.0, 60.0)
            };
        }

        if let Err(err) = KeyBinding::parse(&capture.screenshot_key) {
            log::warn!(
                "Invalid screenshot_key '{}' ({}), falling back to 'K'",
                capture.screenshot_key,
                err
            );
            capture.screenshot_key = "K".to_string();
        }
    }

    /// Parsed screenshot key. Falls back to `K` if the stored string is invalid.
    pub fn screenshot_binding(&self) -> KeyBinding {
        KeyBinding::parse(&self.capture.screenshot_key).unwrap_or_else(|err| {
            log::warn!("Invalid screenshot key, using 'K': {}", err);
            KeyBinding {
                key: "K".to_string(),
                ctrl: false,
                shift: false,
                alt: false,
            }
        })
    }

    /// Storage root with `~/` expanded.
    pub fn storage_root(&self) -> PathBuf {
        expand_tilde(&self.storage.root)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("framesnap");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `config_path`, or returns defaults if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the config to TOML and writes it to `config_path`,
    /// creating the parent directory if needed.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        debug!("Saved config to {}", config_path.display());
        Ok(())
    }
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_shipped_settings() {
        let config = Config::default();
        assert_eq!(config.capture.screenshot_key, "K");
        assert_eq!(config.capture.mode, CaptureMode::ShipLog);
        assert_eq!(config.capture.custom_width, 512);
        assert_eq!(config.capture.custom_height, 512);
        assert!(config.capture.change_field_of_view);
        assert_eq!(config.capture.field_of_view, 120.0);
        assert_eq!(config.capture.greyscale_mode, GreyscaleMode::Maximum);
        assert!(config.ui.show_quick_settings);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[capture]\nmode = \"full\"\n").unwrap();
        assert_eq!(config.capture.mode, CaptureMode::Full);
        assert_eq!(config.capture.greyscale_mode, GreyscaleMode::Maximum);
        assert!(config.ui.show_quick_settings);
    }

    #[test]
    fn validate_clamps_out_of_range_values() {
        let mut config = Config::default();
        config.capture.custom_width = 0;
        config.capture.custom_height = 1_000_000;
        config.capture.field_of_view = 400.0;
        config.capture.stall_timeout_secs = 0.0;
        config.capture.screenshot_key = "Ctrl+".to_string();

        config.validate_and_clamp();

        assert_eq!(config.capture.custom_width, 1);
        assert_eq!(config.capture.custom_height, MAX_CUSTOM_DIMENSION);
        assert_eq!(config.capture.field_of_view, 179.0);
        assert_eq!(config.capture.stall_timeout_secs, 1.0);
        assert_eq!(config.capture.screenshot_key, "K");
    }

    #[test]
    fn save_then_load_preserves_edits() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.capture.mode = CaptureMode::Custom;
        config.capture.custom_width = 300;
        config.capture.greyscale_mode = GreyscaleMode::Average;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[capture]\nmode = 7\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }
}
